//! Boundary types shared with comment sources and moderation tools

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment as delivered by a comment source. Only `text` is classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "Utc::now")]
    pub published_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author: String::new(),
            published_at: Utc::now(),
        }
    }
}

/// Verdict handed to moderation, which decides what to do with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentVerdict {
    pub comment_id: String,
    pub is_spam: bool,
}
