//! Wire contract of the Q&A gateway.
//!
//! The HTTP relay itself lives in the tools crate; this module owns the
//! request/response shapes, the fixed persona and input validation so
//! the chat panel and the server agree on them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CHAT_ROUTE: &str = "/api/chat";

pub const DEFAULT_MAX_TOKENS: u32 = 500;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const GENERATION_FAILED: &str = "Failed to generate AI response";

/// System prompt sent with every question.
pub const SYSTEM_PERSONA: &str = "You are a quantum physics expert and educator. Your role is to:

1. Explain quantum physics concepts in clear, accessible language
2. Use analogies and examples to make complex topics understandable
3. Be accurate and scientifically correct
4. Encourage curiosity and further learning
5. Keep responses concise but informative (2-3 paragraphs max)

Focus on topics like:
- Wave-particle duality
- Quantum superposition
- Quantum entanglement
- Uncertainty principle
- Quantum tunneling
- Schrödinger's cat
- Double-slit experiment
- Quantum computing basics

Always maintain an educational and encouraging tone.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: &str) -> Self {
        Self { error: error.to_string() }
    }
}

/// What the gateway asks the upstream model for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system:     &'static str,
    pub prompt:     String,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn for_question(message: String, max_tokens: u32) -> Self {
        Self { system: SYSTEM_PERSONA, prompt: message, max_tokens }
    }
}

/// Extract the question from a raw request body.
///
/// Returns `None` for unparseable JSON, a missing or non-string
/// `message`, and messages that are empty after trimming. Every one of
/// these answers 400, including a body that is not JSON at all, and a
/// blank question is never forwarded upstream.
pub fn parse_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = value.get("message")?.as_str()?;
    if message.trim().is_empty() {
        return None;
    }
    Some(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_malformed_bodies_yield_no_message() {
        assert_eq!(parse_message(br#"{"message":"   "}"#), None);
        assert_eq!(parse_message(b"{not json"), None);
        assert_eq!(parse_message(br#"{"message":["a"]}"#), None);
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        assert_eq!(parse_message(br#"{"message":"  hi "}"#).as_deref(), Some("  hi "));
    }
}
