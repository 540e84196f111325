//! Chat transcript and the chat panel's request state.
//!
//! The transcript is client-local: it is persisted between sessions but
//! never sent upstream. Each question goes to the gateway on its own.

use crate::{
    error::{VizError, VizResult},
    gateway::ChatRequest,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage key for the serialized transcript.
pub const CHAT_HISTORY_KEY: &str = "quantum-chat-history";

/// Assistant bubble shown when the gateway could not answer.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role:    Role,
    pub content: String,
    #[serde(rename = "sentAt", default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), sent_at: Some(Utc::now()) }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), sent_at: Some(Utc::now()) }
    }
}

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self { Self::default() }

    /// Parse a stored transcript. Unreadable input yields an empty
    /// history; individual malformed entries are dropped.
    pub fn parse_lenient(raw: &str) -> Self {
        let entries = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                log::warn!("chat history is not a list, starting fresh");
                return Self::default();
            }
            Err(e) => {
                log::warn!("chat history unreadable, starting fresh: {e}");
                return Self::default();
            }
        };
        let messages = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(msg) => Some(msg),
                Err(e) => {
                    log::warn!("dropping malformed chat entry {i}: {e}");
                    None
                }
            })
            .collect();
        Self { messages }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] { &self.messages }
    pub fn last(&self) -> Option<&ChatMessage> { self.messages.last() }
    pub fn len(&self) -> usize { self.messages.len() }
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }
}

/// One chat panel: a transcript plus at most one request in flight.
#[derive(Debug, Default)]
pub struct ChatPanel {
    history: ChatHistory,
    pending: bool,
}

impl ChatPanel {
    pub fn new(history: ChatHistory) -> Self {
        Self { history, pending: false }
    }

    /// Accept user input. Appends the question to the transcript and
    /// returns the request to send.
    pub fn submit(&mut self, text: &str) -> VizResult<ChatRequest> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VizError::EmptyMessage);
        }
        if self.pending {
            return Err(VizError::RequestInFlight);
        }
        self.history.push(ChatMessage::user(text));
        self.pending = true;
        Ok(ChatRequest { message: text.to_string() })
    }

    /// Settle the in-flight request. Failures become a fallback bubble
    /// so the user can simply ask again.
    pub fn resolve<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) -> &ChatMessage {
        self.pending = false;
        let reply = match outcome {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => {
                log::warn!("chat request failed: {e}");
                ChatMessage::assistant(FALLBACK_REPLY)
            }
        };
        self.history.push(reply);
        &self.history.messages[self.history.messages.len() - 1]
    }

    /// Drop the transcript. A pending request still resolves normally.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn is_pending(&self) -> bool { self.pending }
    pub fn history(&self) -> &ChatHistory { &self.history }
}
