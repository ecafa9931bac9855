//! Catalog served over HTTP.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::instrument;

use quizforge_core::model::{Quiz, QuizMeta};
use quizforge_core::parser;

use crate::dir::ensure_relative;
use crate::error::CatalogError;
use crate::{find_meta, CatalogSource, INDEX_FILE};

/// Fetches `index.json` and quiz files relative to a base URL.
pub struct HttpCatalog {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, file: &str) -> Result<(String, String), CatalogError> {
        ensure_relative(file)?;
        let url = format!("{}/{}", self.base_url, file);
        tracing::debug!(%url, "fetching");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout(self.timeout_secs)
            } else {
                CatalogError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok((url, body))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    fn name(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(catalog = %self.base_url))]
    async fn list(&self) -> anyhow::Result<Vec<QuizMeta>> {
        let (url, body) = self.fetch(INDEX_FILE).await?;
        let index = parser::parse_index_str(&body, Path::new(&url))?;
        for warning in parser::validate_index(&index) {
            tracing::warn!("{url}: {}", warning.message);
        }
        Ok(index)
    }

    #[instrument(skip(self), fields(catalog = %self.base_url))]
    async fn load(&self, id: &str) -> anyhow::Result<Quiz> {
        let meta = find_meta(self.list().await?, id)?;
        let (url, body) = self.fetch(&meta.file).await?;
        let questions = parser::parse_questions_str(&body, Path::new(&url))?;
        tracing::debug!(quiz = %meta.id, questions = questions.len(), "quiz loaded");
        Ok(Quiz::from_meta(&meta, questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index_body() -> serde_json::Value {
        serde_json::json!([
            {"id": "rust", "title": "Rust basics", "file": "rust.json"}
        ])
    }

    fn quiz_body() -> serde_json::Value {
        serde_json::json!({"questions": [
            {
                "type": "multiple_choice",
                "question": "Which keyword declares a mutable binding?",
                "options": {"A": "let", "B": "let mut", "C": "var"},
                "correctAnswer": "B"
            },
            {
                "type": "multiple_response",
                "question": "Which are smart pointers?",
                "options": {"A": "Box", "B": "Rc", "C": "u8"},
                "correctAnswers": ["A", "B"]
            }
        ]})
    }

    #[tokio::test]
    async fn loads_quiz_from_server() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quizzes/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(index_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/quizzes/rust.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quiz_body()))
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(&format!("{}/quizzes/", server.uri()), 5).unwrap();
        assert_eq!(catalog.base_url(), format!("{}/quizzes", server.uri()));

        let index = catalog.list().await.unwrap();
        assert_eq!(index.len(), 1);

        let quiz = catalog.load("rust").await.unwrap();
        assert_eq!(quiz.title, "Rust basics");
        assert_eq!(quiz.questions.len(), 2);
    }

    #[tokio::test]
    async fn missing_index_maps_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(&server.uri(), 5).unwrap();
        let err = catalog.list().await.unwrap_err();
        match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::Http { status, url }) => {
                assert_eq!(*status, 404);
                assert!(url.ends_with("/index.json"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_quiz_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(index_body()))
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(&server.uri(), 5).unwrap();
        let err = catalog.load("python").await.unwrap_err();
        assert!(err.downcast_ref::<CatalogError>().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn server_error_on_quiz_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(index_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rust.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(&server.uri(), 5).unwrap();
        let err = catalog.load("rust").await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"), "{err}");
    }

    #[tokio::test]
    async fn malformed_quiz_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(index_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rust.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let catalog = HttpCatalog::new(&server.uri(), 5).unwrap();
        assert!(catalog.load("rust").await.is_err());
    }
}
