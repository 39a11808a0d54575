//! Question model
//!
//! A question arrives from `GET /api/question/{id}` with its author, tags and
//! answers nested in one document. Author is required; missing `tags` or
//! `answers` keys read as empty lists so a loaded question never has them
//! undefined.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AnswerWithAuthor, Tag, User};

/// Question entity as stored by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// Question with author, tags and answers resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub author: User,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub answers: Vec<AnswerWithAuthor>,
}

impl QuestionDetail {
    pub fn new(question: Question, author: User) -> Self {
        Self {
            question,
            author,
            tags: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_answers(mut self, answers: Vec<AnswerWithAuthor>) -> Self {
        self.answers = answers;
        self
    }

    pub fn id(&self) -> &str {
        &self.question.id
    }
}
