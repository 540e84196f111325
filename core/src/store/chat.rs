//! Store methods for the chat transcript.

use crate::{
    chat::{ChatHistory, ChatMessage, CHAT_HISTORY_KEY},
    error::VizResult,
};

use super::KvStore;

impl KvStore {
    pub fn load_chat_history(&self) -> VizResult<ChatHistory> {
        Ok(match self.get(CHAT_HISTORY_KEY)? {
            Some(raw) => ChatHistory::parse_lenient(&raw),
            None => ChatHistory::new(),
        })
    }

    pub fn save_chat_history(&self, history: &ChatHistory) -> VizResult<()> {
        let raw = serde_json::to_string(history)?;
        self.set(CHAT_HISTORY_KEY, &raw)
    }

    pub fn append_chat_message(&self, message: ChatMessage) -> VizResult<ChatHistory> {
        let mut history = self.load_chat_history()?;
        history.push(message);
        self.save_chat_history(&history)?;
        Ok(history)
    }

    pub fn clear_chat_history(&self) -> VizResult<()> {
        self.remove(CHAT_HISTORY_KEY)?;
        Ok(())
    }
}
