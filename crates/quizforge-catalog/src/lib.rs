//! quizforge-catalog — Quiz catalog sources.
//!
//! A catalog is an `index.json` listing quizzes plus one JSON file per quiz.
//! Catalogs can live in a local directory or behind an HTTP base URL; both
//! implement [`CatalogSource`]. Loading always completes before a session is
//! started.

use async_trait::async_trait;

use quizforge_core::model::{Quiz, QuizMeta};

pub mod config;
pub mod dir;
pub mod error;
pub mod http;

pub use config::{load_config, load_config_from, open_catalog, QuizforgeConfig};
pub use dir::DirectoryCatalog;
pub use error::CatalogError;
pub use http::HttpCatalog;

/// Name of the index document at the root of every catalog.
pub const INDEX_FILE: &str = "index.json";

/// A place quizzes can be listed and loaded from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location of the catalog (path or URL).
    fn name(&self) -> &str;

    /// List the quizzes in the catalog index.
    async fn list(&self) -> anyhow::Result<Vec<QuizMeta>>;

    /// Load one quiz, including its questions.
    async fn load(&self, id: &str) -> anyhow::Result<Quiz>;
}

/// Find `id` in an index.
pub(crate) fn find_meta(index: Vec<QuizMeta>, id: &str) -> Result<QuizMeta, CatalogError> {
    index
        .into_iter()
        .find(|meta| meta.id == id)
        .ok_or_else(|| CatalogError::QuizNotFound(id.to_string()))
}
