//! Core types and traits for the reply assistant.
//!
//! This crate provides the domain types, error handling, configuration and
//! the provider trait shared by the rest of the workspace.

/// Assistant configuration stored as `config.toml` in the data folder.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Poison-tolerant lock helpers.
pub mod sync;
/// Trait definitions for chat-completion providers.
pub mod traits;
/// Core data types for scenes, styles, replies and history.
pub mod types;

pub use config::{ApiConfig, AssistantConfig, HistoryConfig};
pub use error::{Error, Result};
pub use sync::IgnoreLock;
pub use traits::{ChatProvider, UpdateFn};
pub use types::{
    ChatMessage, ChatRole, DailyRecommendation, HistoryItem, QuickTag, RelationType,
    ReplyIntensity, ReplyItem, ReplyStyle, SceneType,
};
