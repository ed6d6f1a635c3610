//! The fixed classification prompt

use serde::{Deserialize, Serialize};

/// Message in conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

const SYSTEM_PROMPT: &str = "You are a content moderation assistant that reviews Thai and English \
video comments for online gambling advertising. Answer only in the requested format.";

const INSTRUCTIONS: &str = "Rate how likely the following comment is an advertisement for an \
online gambling site (slots, baccarat, casino, betting sites, deposit/withdraw promotions, \
contact IDs for such sites).

Reply with exactly these three lines and nothing else:
score: <0-100, probability that the comment is gambling advertising>
result: <spam | not spam | uncertain>
reason: <one short sentence explaining the decision>";

/// Build the system + user messages for `text`.
pub fn build_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: MessageRole::System,
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: MessageRole::User,
            content: format!("{}\n\ncomment: {}", INSTRUCTIONS, text),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_embed_text_and_template() {
        let messages = build_messages("สล็อตแตกง่าย");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
        assert!(messages[1].content.ends_with("comment: สล็อตแตกง่าย"));
        for tag in ["score:", "result:", "reason:"] {
            assert!(messages[1].content.contains(tag), "missing {}", tag);
        }
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(MessageRole::System).unwrap();
        assert_eq!(json, "system");
    }
}
