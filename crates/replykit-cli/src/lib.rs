//! Library interface for replykit-cli
//!
//! Exposes data folder handling and output formatting for testing

pub mod config;
pub mod utils;
