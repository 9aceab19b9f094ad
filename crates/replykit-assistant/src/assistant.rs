//! End-to-end reply composition.
//!
//! Ties scene detection, generation, the canned fallback and history
//! persistence together.

use chrono::Utc;
use replykit_core::{Error, HistoryItem, ReplyItem, Result, SceneType};
use serde::Serialize;
use tracing::{info, warn};

use crate::fallback::default_replies;
use crate::generator::{ProgressFn, ReplyGenerator};
use crate::history::HistoryStore;
use crate::prompt::PromptOptions;
use crate::scene::detect_scene;

/// Where the replies of a [`Composition`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// Generated by the provider.
    Generated,
    /// Canned replies after a failed generation.
    Fallback,
}

/// Outcome of one compose request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    /// Scene the replies were written for.
    pub scene: SceneType,
    /// One reply per style.
    pub replies: Vec<ReplyItem>,
    /// Origin of the replies.
    pub source: ReplySource,
    /// Id of the saved history item, if one was written.
    pub history_id: Option<String>,
    /// Generation error that triggered the fallback.
    pub error: Option<String>,
}

/// Reply assistant combining generation and history.
#[derive(Clone)]
pub struct ReplyAssistant {
    generator: ReplyGenerator,
    history: HistoryStore,
}

impl ReplyAssistant {
    /// Creates an assistant.
    pub fn new(generator: ReplyGenerator, history: HistoryStore) -> Self {
        Self { generator, history }
    }

    /// History store used for saving results.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Generates replies for `input` and records them.
    ///
    /// The scene is `scene` when given, otherwise detected from the input.
    /// Generation failures fall back to canned replies and are never saved.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] when `input` is blank.
    pub async fn compose(
        &self,
        input: &str,
        scene: Option<SceneType>,
        options: PromptOptions,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<Composition> {
        if input.trim().is_empty() {
            return Err(Error::InvalidInput("Please enter some text".to_owned()));
        }

        let scene = scene.unwrap_or_else(|| detect_scene(input));
        info!(
            "Composing replies in scene {scene} via {}",
            self.generator.provider_name()
        );

        match self
            .generator
            .generate_replies(input, scene, options, on_progress)
            .await
        {
            Ok(replies) => {
                let history_id = self.save(input, scene, &replies);
                Ok(Composition {
                    scene,
                    replies,
                    source: ReplySource::Generated,
                    history_id,
                    error: None,
                })
            }
            Err(err) => {
                warn!("Generation failed, using default replies: {err}");
                Ok(Composition {
                    scene,
                    replies: default_replies(scene),
                    source: ReplySource::Fallback,
                    history_id: None,
                    error: Some(err.to_string()),
                })
            }
        }
    }

    /// Saves a generated result, returning its id when the write succeeded.
    fn save(&self, input: &str, scene: SceneType, replies: &[ReplyItem]) -> Option<String> {
        let timestamp = Utc::now().timestamp_millis();
        let item = HistoryItem {
            id: format!("history_{timestamp}"),
            input: input.to_owned(),
            scene,
            replies: replies.to_vec(),
            timestamp,
            is_favorite: false,
        };
        let id = item.id.clone();

        match self.history.add(item) {
            Ok(()) => Some(id),
            Err(err) => {
                warn!("Failed to save history: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::KvStore;
    use replykit_core::ReplyStyle;
    use replykit_providers::MockProvider;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn assistant(provider: MockProvider, temp: &TempDir) -> ReplyAssistant {
        let generator = ReplyGenerator::new(Arc::new(provider), Duration::from_secs(30));
        let history = HistoryStore::new(KvStore::open(temp.path()).unwrap());
        ReplyAssistant::new(generator, history)
    }

    #[tokio::test]
    async fn test_compose_saves_generated_replies() {
        let temp = TempDir::new().unwrap();
        let assistant = assistant(MockProvider::new().with_default_response("好的"), &temp);
        let mut ignore = |_: ReplyStyle, _: &str| {};

        let composition = assistant
            .compose("明天要开会汇报项目", None, PromptOptions::default(), &mut ignore)
            .await
            .unwrap();

        assert_eq!(composition.scene, SceneType::Work);
        assert_eq!(composition.source, ReplySource::Generated);
        assert_eq!(composition.replies.len(), 3);

        let saved = assistant.history().list();
        assert_eq!(saved.len(), 1);
        assert_eq!(composition.history_id.as_deref(), Some(saved[0].id.as_str()));
        assert!(saved[0].id.starts_with("history_"));
        assert_eq!(saved[0].input, "明天要开会汇报项目");
        assert!(!saved[0].is_favorite);
    }

    #[tokio::test]
    async fn test_compose_falls_back_without_saving() {
        let temp = TempDir::new().unwrap();
        let provider = MockProvider::new()
            .with_default_response("好的")
            .with_failure("幽默、轻松", "service unavailable");
        let assistant = assistant(provider, &temp);
        let mut ignore = |_: ReplyStyle, _: &str| {};

        let composition = assistant
            .compose("周末聚会吗", Some(SceneType::Social), PromptOptions::default(), &mut ignore)
            .await
            .unwrap();

        assert_eq!(composition.source, ReplySource::Fallback);
        assert_eq!(composition.replies, default_replies(SceneType::Social));
        assert!(composition.history_id.is_none());
        assert!(composition.error.unwrap().contains("service unavailable"));
        assert!(assistant.history().list().is_empty());
    }

    #[tokio::test]
    async fn test_compose_rejects_blank_input() {
        let temp = TempDir::new().unwrap();
        let provider = MockProvider::new();
        let assistant = assistant(provider.clone(), &temp);
        let mut ignore = |_: ReplyStyle, _: &str| {};

        let result = assistant
            .compose("   ", None, PromptOptions::default(), &mut ignore)
            .await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_compose_reports_progress_per_style() {
        let temp = TempDir::new().unwrap();
        let assistant = assistant(MockProvider::new().with_default_response("没问题"), &temp);
        let mut latest: Vec<(ReplyStyle, String)> = Vec::new();
        let mut progress = |style: ReplyStyle, content: &str| {
            match latest.iter_mut().find(|(seen, _)| *seen == style) {
                Some(entry) => content.clone_into(&mut entry.1),
                None => latest.push((style, content.to_owned())),
            }
        };

        assistant
            .compose("谢谢你的礼物", None, PromptOptions::default(), &mut progress)
            .await
            .unwrap();

        drop(progress);
        assert_eq!(latest.len(), 3);
        assert!(latest.iter().all(|(_, content)| content == "没问题"));
    }
}
