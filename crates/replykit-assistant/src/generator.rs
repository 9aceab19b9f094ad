//! Streaming reply generation.
//!
//! Styles are requested one after another; each request must produce some
//! content before the timeout elapses, after which it may run to completion.

use chrono::Utc;
use replykit_core::{ChatProvider, Error, ReplyItem, ReplyStyle, Result, SceneType, UpdateFn};
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::prompt::{PromptOptions, build_messages};

/// Callback receiving `(style, accumulated content)` during generation.
pub type ProgressFn<'cb> = dyn FnMut(ReplyStyle, &str) + Send + 'cb;

/// Generates styled replies through a [`ChatProvider`].
#[derive(Clone)]
pub struct ReplyGenerator {
    /// Backend used for every request.
    provider: Arc<dyn ChatProvider>,
    /// Maximum wait for the first content of a reply.
    timeout: Duration,
}

impl ReplyGenerator {
    /// Creates a generator with the given first-content timeout.
    pub fn new(provider: Arc<dyn ChatProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generates one reply in `style`.
    ///
    /// `on_update` receives the accumulated content as it streams in.
    ///
    /// # Errors
    /// Returns [`Error::Timeout`] if nothing arrived in time, or the
    /// provider's error.
    pub async fn generate_single_reply(
        &self,
        input: &str,
        style: ReplyStyle,
        scene: SceneType,
        options: PromptOptions,
        on_update: &mut UpdateFn<'_>,
    ) -> Result<String> {
        let messages = build_messages(input, style, scene, options);
        let received = AtomicBool::new(false);
        let mut forward = |content: &str| {
            if !content.is_empty() {
                received.store(true, Ordering::Relaxed);
            }
            on_update(content);
        };

        debug!("Requesting {style} reply from {}", self.provider.name());
        let mut request = pin!(self.provider.stream_chat(&messages, &mut forward));

        match timeout(self.timeout, &mut request).await {
            Ok(result) => result,
            Err(_) if received.load(Ordering::Relaxed) => request.await,
            Err(_) => {
                warn!("No {style} content within {:?}, aborting request", self.timeout);
                Err(Error::Timeout(self.timeout))
            }
        }
    }

    /// Generates one reply per style, sequentially in `ReplyStyle::ALL` order.
    ///
    /// # Errors
    /// Fails as soon as any style fails; no partial result is returned.
    pub async fn generate_replies(
        &self,
        input: &str,
        scene: SceneType,
        options: PromptOptions,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<Vec<ReplyItem>> {
        let mut replies = Vec::with_capacity(ReplyStyle::ALL.len());

        for style in ReplyStyle::ALL {
            let mut progress = |partial: &str| on_progress(style, partial);
            let content = self
                .generate_single_reply(input, style, scene, options, &mut progress)
                .await?;
            replies.push(ReplyItem::new(reply_id(style), style, content));
        }

        Ok(replies)
    }
}

/// Id of a freshly generated reply.
fn reply_id(style: ReplyStyle) -> String {
    format!("{style}_{}", Utc::now().timestamp_millis())
}
