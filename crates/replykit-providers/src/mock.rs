//! Mock provider for testing reply generation.
//!
//! Allows defining canned streamed answers for specific prompts, enabling
//! end-to-end testing of the assistant without real API calls.

use async_trait::async_trait;
use replykit_core::{ChatMessage, ChatProvider, Error, IgnoreLock as _, Result, UpdateFn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::sleep;

/// Canned behaviour for a matching request.
#[derive(Debug, Clone)]
enum Scripted {
    /// Stream this text.
    Reply(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
}

/// Response storage type
type ScriptMap = Arc<Mutex<Vec<(String, Scripted)>>>;

/// Mock provider that streams pre-defined answers based on prompt patterns.
///
/// Patterns are matched as substrings against every message of a request;
/// the most recently added matching pattern wins.
#[derive(Clone)]
pub struct MockProvider {
    /// Scripted answers keyed by pattern
    scripts: ScriptMap,
    /// Answer used when nothing matches
    default_response: Arc<Mutex<Option<String>>>,
    /// Delay before the first chunk, per pattern
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    /// Characters per streamed chunk
    chunk_chars: usize,
    /// Pause between streamed chunks
    chunk_delay: Option<Duration>,
    /// User messages of every request, for verification
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new(Mutex::new(None)),
            delays: Arc::new(Mutex::new(HashMap::new())),
            chunk_chars: 4,
            chunk_delay: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stream `response` for requests containing `pattern`.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.scripts
            .lock_ignore_poison()
            .push((pattern.into(), Scripted::Reply(response.into())));
        self
    }

    /// Fail requests containing `pattern` with a provider error.
    #[must_use]
    pub fn with_failure(self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.scripts
            .lock_ignore_poison()
            .push((pattern.into(), Scripted::Fail(message.into())));
        self
    }

    /// Wait `delay` before streaming for requests containing `pattern`.
    #[must_use]
    pub fn with_delay(self, pattern: impl Into<String>, delay: Duration) -> Self {
        self.delays.lock_ignore_poison().insert(pattern.into(), delay);
        self
    }

    /// Set a default response for requests that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        *self.default_response.lock_ignore_poison() = Some(response.into());
        self
    }

    /// Set how many characters are emitted per streamed chunk.
    #[must_use]
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Pause for `delay` between streamed chunks.
    #[must_use]
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }

    /// Get the user messages of all requests made.
    #[must_use]
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock_ignore_poison().clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history.lock_ignore_poison().len()
    }

    /// Find the scripted behaviour for a request.
    fn find_script(&self, messages: &[ChatMessage]) -> Option<Scripted> {
        let scripts = self.scripts.lock_ignore_poison();
        scripts
            .iter()
            .rev()
            .find(|(pattern, _)| {
                messages
                    .iter()
                    .any(|message| message.content.contains(pattern.as_str()))
            })
            .map(|(_, script)| script.clone())
    }

    /// Find the delay configured for a request.
    fn find_delay(&self, messages: &[ChatMessage]) -> Option<Duration> {
        let delays = self.delays.lock_ignore_poison();
        delays.iter().find_map(|(pattern, delay)| {
            messages
                .iter()
                .any(|message| message.content.contains(pattern.as_str()))
                .then_some(*delay)
        })
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        on_update: &mut UpdateFn<'_>,
    ) -> Result<String> {
        let user_text = messages
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default();
        self.call_history.lock_ignore_poison().push(user_text.clone());

        if let Some(delay) = self.find_delay(messages) {
            sleep(delay).await;
        }

        let text = match self.find_script(messages) {
            Some(Scripted::Fail(message)) => return Err(Error::Provider(message)),
            Some(Scripted::Reply(text)) => text,
            None => self
                .default_response
                .lock_ignore_poison()
                .clone()
                .unwrap_or_else(|| format!("Mock reply for: {user_text}")),
        };

        let chars: Vec<char> = text.chars().collect();
        let mut accumulated = String::new();
        for (index, chunk) in chars.chunks(self.chunk_chars).enumerate() {
            if index > 0 {
                match self.chunk_delay {
                    Some(delay) => sleep(delay).await,
                    None => yield_now().await,
                }
            }
            accumulated.extend(chunk);
            on_update(&accumulated);
        }

        Ok(accumulated)
    }
}
