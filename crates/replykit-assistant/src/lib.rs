//! Reply assistant: scene detection, prompt building, streamed generation
//! with fallback, and local persistence of history and capsule draws.

pub mod assistant;
pub mod fallback;
pub mod gachapon;
pub mod generator;
pub mod history;
pub mod kv;
pub mod prompt;
pub mod scene;

pub use assistant::{Composition, ReplyAssistant, ReplySource};
pub use fallback::default_replies;
pub use gachapon::{
    CapsuleDraw, CapsuleMachine, MASTER_TEMPLATE, SUGGESTION_TEMPLATES, SuggestionStyle,
    SuggestionTemplate, capsule_color, random_template, template_by_style,
};
pub use generator::{ProgressFn, ReplyGenerator};
pub use history::{
    HistoryGroups, HistoryStats, HistoryStore, filter_by_scene, group_by_age, group_by_age_now,
};
pub use kv::KvStore;
pub use prompt::{PromptOptions, build_messages, system_prompt};
pub use scene::{daily_recommendations, detect_scene, filter_tags_by_scene, quick_tags};
