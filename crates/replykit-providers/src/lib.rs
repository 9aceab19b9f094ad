//! Provider adapters for chat-completion services.

/// Streaming HTTP provider.
pub mod http;
/// Scripted provider for tests.
pub mod mock;
/// Decoding of streamed response bodies.
pub mod stream;

pub use http::HttpChatProvider;
pub use mock::MockProvider;
pub use stream::{ChatDataHandler, StreamState, consume_stream};
