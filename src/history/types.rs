use serde::{Deserialize, Serialize};

/// Message author. Closed set: this core has no system/tool messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    /// Immutable once created.
    pub text: String,
    /// Creation time, ms since epoch.
    pub ts: u64,
}

/// One named conversation. Messages are append-only; reordering and
/// per-message edits never happen, only whole-conversation deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub created_at: u64,
    /// Advances on every mutation of the conversation or its messages.
    pub updated_at: u64,
    pub messages: Vec<Message>,
}
