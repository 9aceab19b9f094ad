use async_trait::async_trait;

use crate::{ChatMessage, Result};

/// Callback receiving the full content accumulated so far.
pub type UpdateFn<'cb> = dyn FnMut(&str) + Send + 'cb;

/// Trait for chat-completion backends that stream their answer.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Sends `messages` and streams the completion.
    ///
    /// `on_update` is called with the accumulated content after every
    /// non-empty delta. The returned string is the final accumulated content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the endpoint answers with an
    /// error status or an error payload, or the stream breaks.
    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        on_update: &mut UpdateFn<'_>,
    ) -> Result<String>;
}
