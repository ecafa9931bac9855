//! Configuration loading and catalog selection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dir::DirectoryCatalog;
use crate::http::HttpCatalog;
use crate::CatalogSource;

/// Environment variable that overrides the configured catalog location.
pub const CATALOG_ENV: &str = "QUIZFORGE_CATALOG";

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Directory path or `http(s)://` base URL of the quiz catalog.
    #[serde(default = "default_catalog")]
    pub catalog: String,
    /// Timeout for each catalog request.
    #[serde(default = "default_timeout")]
    pub http_timeout_secs: u64,
    /// Ask before leaving a quiz in progress.
    #[serde(default = "default_true")]
    pub confirm_exit: bool,
    /// Ask before finishing with unanswered questions.
    #[serde(default = "default_true")]
    pub confirm_incomplete: bool,
}

fn default_catalog() -> String {
    "./quizzes".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            http_timeout_secs: default_timeout(),
            confirm_exit: true,
            confirm_incomplete: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// `QUIZFORGE_CATALOG` overrides the catalog location.
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => default_config_path(),
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::default(),
    };

    if let Ok(catalog) = std::env::var(CATALOG_ENV) {
        if !catalog.trim().is_empty() {
            config.catalog = catalog;
        }
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<QuizforgeConfig> {
    let mut config = toml::from_str::<QuizforgeConfig>(content)?;
    config.catalog = resolve_env_vars(&config.catalog);
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("quizforge.toml");
    if local.exists() {
        return Some(local);
    }
    dirs_path()
        .map(|dir| dir.join("config.toml"))
        .filter(|p| p.exists())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Pick a catalog source for `location`: `http(s)://` URLs are fetched,
/// anything else is a directory.
pub fn open_catalog(location: &str, config: &QuizforgeConfig) -> Result<Box<dyn CatalogSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpCatalog::new(location, config.http_timeout_secs)?))
    } else {
        Ok(Box::new(DirectoryCatalog::new(location)))
    }
}
