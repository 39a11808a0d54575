//! In-memory question API
//!
//! Serves questions from a process-local store, optionally seeded from a JSON
//! fixtures file. Posting an answer appends it to the question, the way the
//! real API would, so a reload shows it. Every call is recorded in a request
//! log.
//!
//! Like the real API, posts without an author or with blank content are
//! rejected.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use super::{ClientError, QuestionApi};
use crate::models::{Answer, AnswerWithAuthor, NewAnswer, QuestionDetail, User};

/// One call made against the in-memory API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// `GET /api/question/{id}`
    FetchQuestion(String),
    /// `POST /api/answer`
    PostAnswer(NewAnswer),
}

/// Fixtures file layout
#[derive(Debug, Default, Deserialize)]
struct Fixtures {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    questions: Vec<QuestionDetail>,
}

/// In-memory question API
#[derive(Default)]
pub struct MemoryQuestionApi {
    questions: RwLock<HashMap<String, QuestionDetail>>,
    users: RwLock<HashMap<String, User>>,
    requests: Mutex<Vec<ApiRequest>>,
    /// Reason every post is refused with, when set
    refuse_answers: RwLock<Option<String>>,
}

impl std::fmt::Debug for MemoryQuestionApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryQuestionApi")
            .field("question_count", &self.question_count())
            .finish()
    }
}

impl MemoryQuestionApi {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load users and questions from a JSON fixtures file
    ///
    /// Authors of seeded questions and answers are registered as users too.
    pub fn from_fixtures(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures: {:?}", path))?;
        let fixtures: Fixtures = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixtures: {:?}", path))?;

        let api = Self::new();
        for user in fixtures.users {
            api.insert_user(user);
        }
        for question in fixtures.questions {
            api.insert_question(question);
        }
        Ok(api)
    }

    /// Register a user that answers can be attributed to
    pub fn insert_user(&self, user: User) {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.insert(user.id.clone(), user);
    }

    /// Store (or replace) a question
    pub fn insert_question(&self, question: QuestionDetail) {
        {
            let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
            let authors = std::iter::once(&question.author)
                .chain(question.answers.iter().map(|a| &a.author));
            for author in authors {
                if !author.id.is_empty() {
                    users.entry(author.id.clone()).or_insert_with(|| author.clone());
                }
            }
        }

        let mut questions = self.questions.write().unwrap_or_else(|e| e.into_inner());
        questions.insert(question.id().to_string(), question);
    }

    /// Make every subsequent post fail with `reason`, or accept again with `None`
    pub fn refuse_answers(&self, reason: Option<&str>) {
        let mut refuse = self.refuse_answers.write().unwrap_or_else(|e| e.into_inner());
        *refuse = reason.map(str::to_string);
    }

    /// Number of stored questions
    pub fn question_count(&self) -> usize {
        self.questions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Snapshot of the request log, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, request: ApiRequest) {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
    }
}

#[async_trait]
impl QuestionApi for MemoryQuestionApi {
    async fn fetch_question(&self, question_id: &str) -> Result<Option<QuestionDetail>, ClientError> {
        self.record(ApiRequest::FetchQuestion(question_id.to_string()));

        let questions = self.questions.read().unwrap_or_else(|e| e.into_inner());
        Ok(questions.get(question_id).cloned())
    }

    async fn post_answer(&self, answer: &NewAnswer) -> Result<(), ClientError> {
        self.record(ApiRequest::PostAnswer(answer.clone()));

        if let Some(reason) = self
            .refuse_answers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(ClientError::Rejected(reason));
        }

        let author_id = answer
            .author_id
            .as_deref()
            .ok_or_else(|| ClientError::Rejected("authentication required".to_string()))?;
        if answer.content.trim().is_empty() {
            return Err(ClientError::Rejected("content is required".to_string()));
        }

        let author = self
            .users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(author_id)
            .cloned()
            .ok_or_else(|| ClientError::Rejected(format!("unknown author: {}", author_id)))?;

        let mut questions = self.questions.write().unwrap_or_else(|e| e.into_inner());
        let question = questions.get_mut(&answer.question_id).ok_or_else(|| {
            ClientError::Rejected(format!("question not found: {}", answer.question_id))
        })?;

        question.answers.push(AnswerWithAuthor {
            answer: Answer {
                id: uuid::Uuid::new_v4().to_string(),
                content: answer.content.clone(),
                created_at: Some(Utc::now()),
                author_id: Some(author_id.to_string()),
                question_id: Some(answer.question_id.clone()),
            },
            author,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, Tag};

    fn seeded() -> MemoryQuestionApi {
        let api = MemoryQuestionApi::new();
        let question = QuestionDetail::new(
            Question {
                id: "q1".to_string(),
                title: "T".to_string(),
                content: "C".to_string(),
                created_at: None,
                author_id: Some("u1".to_string()),
            },
            User::new("u1", "A", "B"),
        )
        .with_tags(vec![Tag::new("x")]);
        api.insert_question(question);
        api
    }

    #[tokio::test]
    async fn test_fetch_known_and_unknown() {
        let api = seeded();

        assert!(api.fetch_question("q1").await.unwrap().is_some());
        assert!(api.fetch_question("nope").await.unwrap().is_none());
        assert_eq!(
            api.requests(),
            vec![
                ApiRequest::FetchQuestion("q1".to_string()),
                ApiRequest::FetchQuestion("nope".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_post_appends_answer_with_author() {
        let api = seeded();

        api.post_answer(&NewAnswer::new("hello", Some("u1".to_string()), "q1"))
            .await
            .unwrap();

        let question = api.fetch_question("q1").await.unwrap().unwrap();
        assert_eq!(question.answers.len(), 1);
        assert_eq!(question.answers[0].answer.content, "hello");
        assert_eq!(question.answers[0].author.full_name(), "A B");
        assert!(question.answers[0].answer.created_at.is_some());
    }

    #[tokio::test]
    async fn test_post_without_author_is_rejected() {
        let api = seeded();

        let result = api.post_answer(&NewAnswer::new("hello", None, "q1")).await;

        assert!(matches!(result, Err(ClientError::Rejected(_))));
        let question = api.fetch_question("q1").await.unwrap().unwrap();
        assert!(question.answers.is_empty());
    }

    #[tokio::test]
    async fn test_post_to_unknown_question_is_rejected() {
        let api = seeded();

        let result = api
            .post_answer(&NewAnswer::new("hello", Some("u1".to_string()), "q9"))
            .await;

        assert!(matches!(result, Err(ClientError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_refuse_answers_toggle() {
        let api = seeded();
        let answer = NewAnswer::new("hello", Some("u1".to_string()), "q1");

        api.refuse_answers(Some("read only"));
        let result = api.post_answer(&answer).await;
        assert!(matches!(result, Err(ClientError::Rejected(ref r)) if r == "read only"));

        api.refuse_answers(None);
        assert!(api.post_answer(&answer).await.is_ok());
    }

    #[tokio::test]
    async fn test_sample_fixtures_load() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample.json");
        let api = MemoryQuestionApi::from_fixtures(&path).unwrap();

        assert_eq!(api.question_count(), 1);
        let question = api.fetch_question("q1").await.unwrap().unwrap();
        assert_eq!(question.tags.len(), 2);
        assert_eq!(question.answers[0].author.full_name(), "Bruno Costa");

        api.post_answer(&NewAnswer::new("Obrigada!", Some("u1".to_string()), "q1"))
            .await
            .unwrap();
        assert_eq!(api.fetch_question("q1").await.unwrap().unwrap().answers.len(), 2);
    }

    #[test]
    fn test_insert_question_registers_authors() {
        let api = seeded();
        let users = api.users.read().unwrap();
        assert!(users.contains_key("u1"));
    }
}
