//! Question API client
//!
//! This module abstracts the two collaborator endpoints the question page
//! talks to:
//! - `GET /api/question/{id}` - question with author, tags and answers
//! - `POST /api/answer` - new answer
//!
//! Two drivers are available, selected by configuration:
//! - HTTP (reqwest) - default, talks to the real API
//! - Memory - in-process store, seeded from a fixtures file
//!
//! # Usage
//!
//! ```rust,ignore
//! use qa_page::client::create_client;
//! use qa_page::config::ApiConfig;
//!
//! let api = create_client(&ApiConfig::default())?;
//! let question = api.fetch_question("q1").await?;
//! ```

pub mod http;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ApiConfig, ApiDriver};
use crate::models::{NewAnswer, QuestionDetail};

pub use http::HttpQuestionApi;
pub use memory::{ApiRequest, MemoryQuestionApi};

/// Errors raised while talking to the question API
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Base URL could not be parsed
    #[error("Invalid API base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Network or protocol failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-success status on a mutation
    #[error("API responded with status {status}")]
    Status { status: u16 },

    /// Backend refused the request
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Question API trait
///
/// `fetch_question` yields `None` when the API answers with JSON `null`,
/// which is how a missing question comes back.
#[async_trait]
pub trait QuestionApi: Send + Sync {
    /// Fetch a question with its relations
    async fn fetch_question(&self, question_id: &str) -> Result<Option<QuestionDetail>, ClientError>;

    /// Post a new answer. The response body is not inspected.
    async fn post_answer(&self, answer: &NewAnswer) -> Result<(), ClientError>;
}

/// Create a question API client based on configuration
pub fn create_client(config: &ApiConfig) -> Result<Arc<dyn QuestionApi>> {
    match config.driver {
        ApiDriver::Http => {
            let timeout = Duration::from_secs(config.timeout_seconds);
            let api = HttpQuestionApi::with_timeout(&config.base_url, timeout)?;
            tracing::info!("Question API: {}", api.base_url());
            Ok(Arc::new(api))
        }
        ApiDriver::Memory => {
            let api = match &config.fixtures {
                Some(path) => MemoryQuestionApi::from_fixtures(path)?,
                None => MemoryQuestionApi::new(),
            };
            tracing::info!("Question API: in-memory ({} questions)", api.question_count());
            Ok(Arc::new(api))
        }
    }
}
