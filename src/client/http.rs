//! HTTP question API client using reqwest

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::{ClientError, QuestionApi};
use crate::models::{NewAnswer, QuestionDetail};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type sent with a new answer
const ANSWER_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Question API over HTTP
///
/// The base URL is injected; nothing is read from the process environment.
#[derive(Debug, Clone)]
pub struct HttpQuestionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuestionApi {
    /// Create a client for the API at `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        reqwest::Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn question_url(&self, question_id: &str) -> String {
        format!(
            "{}/api/question/{}",
            self.base_url,
            urlencoding::encode(question_id)
        )
    }

    fn answer_url(&self) -> String {
        format!("{}/api/answer", self.base_url)
    }
}

#[async_trait]
impl QuestionApi for HttpQuestionApi {
    async fn fetch_question(&self, question_id: &str) -> Result<Option<QuestionDetail>, ClientError> {
        let url = self.question_url(question_id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Status is not a signal here; whatever JSON comes back is the answer.
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn post_answer(&self, answer: &NewAnswer) -> Result<(), ClientError> {
        let url = self.answer_url();
        tracing::debug!("POST {} for question {}", url, answer.question_id);

        let body = serde_json::to_vec(answer)?;
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, ANSWER_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Router,
    };
    use std::sync::{Arc, Mutex};

    /// Requests seen by the fake backend: (method, path, content type, body)
    type Seen = Arc<Mutex<Vec<(String, String, Option<String>, String)>>>;

    async fn fake_question(State(seen): State<Seen>, Path(id): Path<String>) -> (StatusCode, String) {
        seen.lock()
            .unwrap()
            .push(("GET".into(), format!("/api/question/{}", id), None, String::new()));
        match id.as_str() {
            "q1" => (
                StatusCode::OK,
                r#"{"id":"q1","title":"T","content":"C","tags":[{"tagId":"x"}],
                    "author":{"id":"u1","firstName":"A","lastName":"B"},"answers":[]}"#
                    .to_string(),
            ),
            "gone" => (StatusCode::NOT_FOUND, "null".to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>".to_string()),
        }
    }

    async fn fake_answer(State(seen): State<Seen>, headers: HeaderMap, body: String) -> StatusCode {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let rejected = body.contains("\"content\":\"forbidden\"");
        seen.lock()
            .unwrap()
            .push(("POST".into(), "/api/answer".into(), content_type, body));
        if rejected {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::CREATED
        }
    }

    /// Serve the fake API on an ephemeral port and return its base URL
    async fn spawn_backend() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/api/question/{id}", get(fake_question))
            .route("/api/answer", post(fake_answer))
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpQuestionApi::new("http://localhost:3000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.question_url("q1"), "http://localhost:3000/api/question/q1");
        assert_eq!(api.answer_url(), "http://localhost:3000/api/answer");
    }

    #[test]
    fn test_question_id_is_percent_encoded() {
        let api = HttpQuestionApi::new("http://localhost:3000").unwrap();
        assert_eq!(
            api.question_url("a/b c"),
            "http://localhost:3000/api/question/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpQuestionApi::new("localhost without scheme");
        assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn test_fetch_question() {
        let (base_url, seen) = spawn_backend().await;
        let api = HttpQuestionApi::new(&base_url).unwrap();

        let question = api.fetch_question("q1").await.unwrap().unwrap();

        assert_eq!(question.question.title, "T");
        assert_eq!(question.author.full_name(), "A B");
        assert_eq!(question.tags[0].label(), "x");
        assert!(question.answers.is_empty());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "GET");
        assert_eq!(seen[0].1, "/api/question/q1");
    }

    #[tokio::test]
    async fn test_fetch_null_body_ignores_status() {
        let (base_url, _seen) = spawn_backend().await;
        let api = HttpQuestionApi::new(&base_url).unwrap();

        let question = api.fetch_question("gone").await.unwrap();
        assert!(question.is_none());
    }

    #[tokio::test]
    async fn test_fetch_non_json_is_decode_error() {
        let (base_url, _seen) = spawn_backend().await;
        let api = HttpQuestionApi::new(&base_url).unwrap();

        let result = api.fetch_question("broken").await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpQuestionApi::new(&format!("http://{}", addr)).unwrap();
        let result = api.fetch_question("q1").await;
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn test_post_answer_body_and_headers() {
        let (base_url, seen) = spawn_backend().await;
        let api = HttpQuestionApi::new(&base_url).unwrap();

        let answer = NewAnswer::new("hello", Some("u1".to_string()), "q1");
        api.post_answer(&answer).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (method, path, content_type, body) = &seen[0];
        assert_eq!(method, "POST");
        assert_eq!(path, "/api/answer");
        assert_eq!(content_type.as_deref(), Some("application/json; charset=UTF-8"));
        assert_eq!(body, r#"{"content":"hello","authorId":"u1","questionId":"q1"}"#);
    }

    #[tokio::test]
    async fn test_post_answer_rejected_status() {
        let (base_url, _seen) = spawn_backend().await;
        let api = HttpQuestionApi::new(&base_url).unwrap();

        let answer = NewAnswer::new("forbidden", None, "q1");
        let result = api.post_answer(&answer).await;

        assert!(matches!(result, Err(ClientError::Status { status: 401 })));
    }
}
