//! Answer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Answer entity as stored by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default)]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub question_id: Option<String>,
}

/// Answer with its author resolved, as nested in a question detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerWithAuthor {
    #[serde(flatten)]
    pub answer: Answer,
    pub author: User,
}

/// Body of `POST /api/answer`
///
/// An anonymous submission leaves `authorId` out of the payload entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnswer {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub question_id: String,
}

impl NewAnswer {
    pub fn new(
        content: impl Into<String>,
        author_id: Option<String>,
        question_id: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            author_id,
            question_id: question_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_answer_body_shape() {
        let body = NewAnswer::new("hello", Some("u1".to_string()), "q1");

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"content":"hello","authorId":"u1","questionId":"q1"}"#
        );
    }

    #[test]
    fn test_new_answer_without_author_omits_key() {
        let body = NewAnswer::new("hello", None, "q1");

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"content":"hello","questionId":"q1"}"#
        );
    }

    #[test]
    fn test_answer_with_author_flattens() {
        let json = r#"{
            "id": "a1",
            "content": "Use a Mutex.",
            "createdAt": "2024-05-01T12:00:00.000Z",
            "authorId": "u2",
            "questionId": "q1",
            "author": {"id": "u2", "firstName": "Bia", "lastName": "Costa"}
        }"#;
        let answer: AnswerWithAuthor = serde_json::from_str(json).unwrap();

        assert_eq!(answer.answer.id, "a1");
        assert_eq!(answer.answer.question_id.as_deref(), Some("q1"));
        assert!(answer.answer.created_at.is_some());
        assert_eq!(answer.author.full_name(), "Bia Costa");
    }
}
