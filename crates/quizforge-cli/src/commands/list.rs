//! The `quizforge list` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizforge_catalog::{load_config_from, open_catalog};

pub async fn execute(catalog: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let location = catalog.unwrap_or_else(|| config.catalog.clone());
    let source = open_catalog(&location, &config)?;

    let quizzes = source
        .list()
        .await
        .with_context(|| format!("failed to list quizzes in {}", source.name()))?;

    if quizzes.is_empty() {
        println!("No quizzes in {}. Run `quizforge init` to create a sample catalog.", source.name());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Description"]);
    for meta in &quizzes {
        let title = if meta.icon.is_empty() {
            meta.title.clone()
        } else {
            format!("{} {}", meta.icon, meta.title)
        };
        table.add_row(vec![
            Cell::new(&meta.id),
            Cell::new(title),
            Cell::new(&meta.description),
        ]);
    }

    println!("{table}");
    println!("{} quiz(zes) in {}", quizzes.len(), source.name());

    Ok(())
}
