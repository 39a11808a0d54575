//! Tag model

use serde::{Deserialize, Serialize};

/// Tag attached to a question. The identifier doubles as its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag identifier and display label
    pub tag_id: String,
    /// Question this link belongs to, when included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
}

impl Tag {
    pub fn new(tag_id: impl Into<String>) -> Self {
        Self {
            tag_id: tag_id.into(),
            question_id: None,
        }
    }

    /// Text shown on the tag chip
    pub fn label(&self) -> &str {
        &self.tag_id
    }
}
