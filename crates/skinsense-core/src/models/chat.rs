use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One message in an advisor chat. `is_user` distinguishes the user's
/// messages from assistant replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub message: String,
    pub is_user: bool,
    pub created_at: NaiveDateTime,
}

/// A chat session with its full transcript. The detail endpoint returns
/// messages oldest-first; list endpoints omit them entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_active: bool,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("New Chat")
    }
}

/// Session list entry: transcript replaced by a count and preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_active: bool,
    pub message_count: i64,
    pub last_message: Option<String>,
}

impl ChatSessionSummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("New Chat")
    }
}
