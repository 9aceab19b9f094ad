//! Decoding of streamed chat-completion bodies.
//!
//! The endpoint answers with `data: {json}` lines. Each payload carries a
//! content delta; `data: [DONE]` ends the stream. Network chunks may split a
//! line anywhere, so bytes are buffered until a full line is available.

use futures::{Stream, StreamExt as _};
use replykit_core::{Error, Result, UpdateFn};
use serde::Deserialize;
use tracing::{debug, warn};

/// Prefix of a data line.
const DATA_PREFIX: &str = "data:";
/// Payload marking the end of the stream.
const DONE_MARKER: &str = "[DONE]";

/// Whether more data is expected after a chunk was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Keep reading.
    Continue,
    /// The terminal marker was seen.
    Done,
}

/// One streamed payload.
#[derive(Debug, Deserialize)]
struct StreamChunk {
    /// Candidate deltas; only the first is used.
    #[serde(default)]
    choices: Vec<StreamChoice>,
    /// Error reported in-band by the endpoint.
    error: Option<StreamError>,
}

/// A single streamed choice.
#[derive(Debug, Deserialize)]
struct StreamChoice {
    /// Incremental content.
    delta: Option<Delta>,
}

/// Incremental content of a choice.
#[derive(Debug, Deserialize)]
struct Delta {
    /// Text appended by this chunk.
    content: Option<String>,
}

/// In-band error payload.
#[derive(Debug, Deserialize)]
struct StreamError {
    /// Human readable message.
    message: String,
}

/// Accumulates streamed deltas and reports the running content.
#[derive(Debug, Default)]
pub struct ChatDataHandler {
    /// Bytes of an incomplete trailing line.
    pending: Vec<u8>,
    /// Content accumulated so far.
    content: String,
    /// Set once `[DONE]` was seen.
    done: bool,
}

impl ChatDataHandler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Content accumulated so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Feeds raw body bytes.
    ///
    /// # Errors
    /// Returns a provider error if the endpoint reported an error payload.
    pub fn push(&mut self, chunk: &[u8], on_update: &mut UpdateFn<'_>) -> Result<StreamState> {
        if self.done {
            return Ok(StreamState::Done);
        }
        self.pending.extend_from_slice(chunk);

        while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if self.handle_line(&String::from_utf8_lossy(&line), on_update)? == StreamState::Done {
                self.done = true;
                self.pending.clear();
                return Ok(StreamState::Done);
            }
        }

        Ok(StreamState::Continue)
    }

    /// Flushes any trailing line and returns the accumulated content.
    ///
    /// # Errors
    /// Returns a provider error if the trailing line is an error payload.
    pub fn finish(mut self, on_update: &mut UpdateFn<'_>) -> Result<String> {
        if !self.done && !self.pending.is_empty() {
            let line = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.handle_line(&line, on_update)?;
        }
        Ok(self.content)
    }

    /// Processes one complete line.
    fn handle_line(&mut self, line: &str, on_update: &mut UpdateFn<'_>) -> Result<StreamState> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            return Ok(StreamState::Continue);
        }

        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            debug!("Ignoring non-data stream line: {line}");
            return Ok(StreamState::Continue);
        };
        let payload = payload.trim();
        if payload == DONE_MARKER {
            return Ok(StreamState::Done);
        }

        let chunk: StreamChunk = match serde_json::from_str(payload) {
            Ok(chunk) => chunk,
            Err(error) => {
                warn!("Skipping unparseable stream payload ({error}): {payload}");
                return Ok(StreamState::Continue);
            }
        };

        if let Some(error) = chunk.error {
            return Err(Error::Provider(error.message));
        }

        let delta = chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .unwrap_or_default();

        if !delta.is_empty() {
            self.content.push_str(&delta);
            on_update(&self.content);
        }

        Ok(StreamState::Continue)
    }
}

/// Drains a byte stream through a [`ChatDataHandler`].
///
/// # Errors
/// Returns an error if the underlying stream fails or the endpoint reports
/// an error payload.
pub async fn consume_stream<S, B, E>(mut body: S, on_update: &mut UpdateFn<'_>) -> Result<String>
where
    S: Stream<Item = core::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Error>,
{
    let mut handler = ChatDataHandler::new();

    while let Some(chunk) = body.next().await {
        let bytes = chunk.map_err(Into::into)?;
        if handler.push(bytes.as_ref(), on_update)? == StreamState::Done {
            break;
        }
    }

    handler.finish(on_update)
}
