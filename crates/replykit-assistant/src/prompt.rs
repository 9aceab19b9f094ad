//! System prompt assembly.

use replykit_core::{ChatMessage, RelationType, ReplyIntensity, ReplyStyle, SceneType};

/// Opening sentence of every prompt.
const BASE_PROMPT: &str = "你是一个专业的沟通助手，帮助用户生成合适的回复内容。";
/// Closing instruction of every prompt.
const CLOSING_PROMPT: &str =
    "请直接给出回复内容，不要添加额外的解释或说明。回复内容应该简洁明了，字数控制在50-100字之间。";

const fn scene_prompt(scene: SceneType) -> &'static str {
    match scene {
        SceneType::Work => "这是一个职场沟通场景，请注意职业礼仪和专业性。",
        SceneType::Emotion => "这是一个情感沟通场景，请注意情感表达和共情能力。",
        SceneType::Social => "这是一个社交沟通场景，请注意礼貌和友好。",
        SceneType::All => "",
    }
}

const fn style_prompt(style: ReplyStyle) -> &'static str {
    match style {
        ReplyStyle::Formal => "请使用正式、专业的语言风格，措辞严谨。",
        ReplyStyle::Friendly => "请使用友好、亲切的语言风格，让人感到温暖。",
        ReplyStyle::Humorous => "请使用幽默、轻松的语言风格，但不要过于随意。",
    }
}

const fn intensity_prompt(intensity: ReplyIntensity) -> &'static str {
    match intensity {
        ReplyIntensity::Gentle => "请使用委婉、温和的表达方式。",
        ReplyIntensity::Moderate => "请使用适中、平衡的表达方式。",
        ReplyIntensity::Direct => "请使用直接、明确的表达方式。",
    }
}

const fn relation_prompt(relation: RelationType) -> &'static str {
    match relation {
        RelationType::Superior => "对方是你的上级，请注意尊重和礼貌。",
        RelationType::Peer => "对方是你的平级同事或朋友，可以平等交流。",
        RelationType::Subordinate => "对方是你的下级，请注意引导和鼓励。",
    }
}

/// Optional modifiers applied to every style of a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptOptions {
    /// How bluntly to phrase the reply.
    pub intensity: Option<ReplyIntensity>,
    /// Who the reply is addressed to.
    pub relation: Option<RelationType>,
}

/// Builds the system prompt for one style.
pub fn system_prompt(style: ReplyStyle, scene: SceneType, options: PromptOptions) -> String {
    let mut prompt = String::from(BASE_PROMPT);
    prompt.push_str(scene_prompt(scene));
    prompt.push_str(style_prompt(style));

    if let Some(intensity) = options.intensity {
        prompt.push_str(intensity_prompt(intensity));
    }
    if let Some(relation) = options.relation {
        prompt.push_str(relation_prompt(relation));
    }

    prompt.push_str(CLOSING_PROMPT);
    prompt
}

/// Builds the `[system, user]` messages for one request.
pub fn build_messages(
    input: &str,
    style: ReplyStyle,
    scene: SceneType,
    options: PromptOptions,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(style, scene, options)),
        ChatMessage::user(input),
    ]
}
