use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ExtractionError;

/// Chat model abstraction (allows mocking).
///
/// `complete` sends one system + user message pair and returns the raw
/// assistant reply, prose and all. Parsing is the caller's problem.
pub trait ChatModel {
    fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, ExtractionError>;
}

/// Result of one text-to-record extraction run.
///
/// `record` is the best available parsed object; validity is advisory
/// metadata, not a gate. A record that failed schema validation is still
/// returned, with `valid = false` and the first violation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub record: Value,
    pub valid: bool,
    pub validation_error: Option<String>,
}

/// Mock chat model for testing — replays a scripted sequence of replies.
///
/// Each call to `complete` pops the next reply; the last reply repeats once
/// the script runs out, so a single-reply mock behaves like a fixed stub.
pub struct MockChatModel {
    replies: std::sync::Mutex<Vec<String>>,
    prompts: std::sync::Mutex<Vec<String>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockChatModel {
    pub fn new(reply: &str) -> Self {
        Self::with_replies(vec![reply.to_string()])
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        assert!(!replies.is_empty(), "mock needs at least one reply");
        Self {
            replies: std::sync::Mutex::new(replies),
            prompts: std::sync::Mutex::new(Vec::new()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of times `complete` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// User prompts received so far, in call order.
    pub fn user_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ChatModel for MockChatModel {
    fn complete(
        &self,
        _system: &str,
        user: &str,
        _temperature: f32,
    ) -> Result<String, ExtractionError> {
        let n = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user.to_string());
        let replies = self.replies.lock().unwrap();
        let idx = n.min(replies.len() - 1);
        Ok(replies[idx].clone())
    }
}

/// Mock chat model that always fails with a transport error.
pub struct UnreachableChatModel;

impl ChatModel for UnreachableChatModel {
    fn complete(
        &self,
        _system: &str,
        _user: &str,
        _temperature: f32,
    ) -> Result<String, ExtractionError> {
        Err(ExtractionError::Connection(
            "http://localhost:0".to_string(),
        ))
    }
}
