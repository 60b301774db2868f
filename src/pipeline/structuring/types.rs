use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::StructuringError;

/// Role tag of a chat message sent to the AI completion capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Sampling settings for one completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// AI completion capability (allows mocking).
///
/// One call, one text completion. Implementations perform no retries;
/// retry policy belongs to whoever calls the engine.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, StructuringError>;

    /// Whether calls can succeed at all. Disabled clients skip straight to
    /// the heuristic without a network round-trip.
    fn is_enabled(&self) -> bool {
        true
    }
}
