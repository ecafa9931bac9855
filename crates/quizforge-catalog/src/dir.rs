//! Catalog stored in a local directory.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use quizforge_core::model::{Quiz, QuizMeta};
use quizforge_core::parser;

use crate::error::CatalogError;
use crate::{find_meta, CatalogSource, INDEX_FILE};

/// Reads `index.json` and quiz files from a directory.
pub struct DirectoryCatalog {
    root: PathBuf,
    name: String,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        Self { root, name }
    }

    async fn read(&self, relative: &str) -> anyhow::Result<(PathBuf, String)> {
        ensure_relative(relative)?;
        let path = self.root.join(relative);
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok((path, content))
    }
}

/// Quiz files must stay inside the catalog root.
pub(crate) fn ensure_relative(file: &str) -> Result<(), CatalogError> {
    let inside = Path::new(file)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if file.is_empty() || !inside {
        return Err(CatalogError::Malformed(format!(
            "quiz file '{file}' must be a relative path inside the catalog"
        )));
    }
    Ok(())
}

#[async_trait]
impl CatalogSource for DirectoryCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(catalog = %self.name))]
    async fn list(&self) -> anyhow::Result<Vec<QuizMeta>> {
        let (path, content) = self.read(INDEX_FILE).await?;
        let index = parser::parse_index_str(&content, &path)?;
        for warning in parser::validate_index(&index) {
            tracing::warn!("{}: {}", path.display(), warning.message);
        }
        Ok(index)
    }

    #[instrument(skip(self), fields(catalog = %self.name))]
    async fn load(&self, id: &str) -> anyhow::Result<Quiz> {
        let meta = find_meta(self.list().await?, id)?;
        let (path, content) = self.read(&meta.file).await?;
        let questions = parser::parse_questions_str(&content, &path)?;
        tracing::debug!(quiz = %meta.id, questions = questions.len(), "quiz loaded");
        Ok(Quiz::from_meta(&meta, questions))
    }
}
