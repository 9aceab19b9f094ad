//! Suggestion capsules: fill-in-the-blank templates drawn at random.
//!
//! Every eleventh draw yields the golden master template.

use rand::Rng as _;
use replykit_core::Result;
use serde::Serialize;
use tracing::debug;

use crate::kv::KvStore;

/// Storage key of the draw counter.
pub const USAGE_COUNT_KEY: &str = "gachapon_usage_count";
/// A golden capsule drops on every draw that is a multiple of this.
pub const GOLDEN_INTERVAL: u64 = 11;
/// Colour used when a style has no template.
const FALLBACK_COLOR: &str = "0 0% 50%";

/// Tone of a suggestion template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStyle {
    /// Structured and formal.
    Serious,
    /// Playful.
    Humorous,
    /// Warm and understanding.
    Empathetic,
    /// All three combined; only from golden capsules.
    Master,
}

/// A fill-in-the-blank suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionTemplate {
    /// Stable identifier.
    pub id: &'static str,
    /// Tone of the template.
    pub style: SuggestionStyle,
    /// Display title.
    pub title: &'static str,
    /// Emoji shown on the capsule.
    pub icon: &'static str,
    /// Capsule colour as an HSL triple.
    pub color: &'static str,
    /// Template lines; bracketed parts are placeholders.
    pub content: &'static [&'static str],
}

impl SuggestionTemplate {
    /// Lines joined into one text block.
    pub fn text(&self) -> String {
        self.content.join("\n")
    }
}

/// The three regular templates.
pub const SUGGESTION_TEMPLATES: [SuggestionTemplate; 3] = [
    SuggestionTemplate {
        id: "serious",
        style: SuggestionStyle::Serious,
        title: "万能建议模板·严肃版",
        icon: "📊",
        color: "205 40% 75%",
        content: &[
            "尊敬的团队，关于[具体问题]，我有以下建议：",
            "1. 现状分析：[客观描述当前情况]",
            "2. 改进方案：[提出具体可行的解决方案]",
            "3. 预期效果：[说明改进后的预期成果]",
            "期待您的反馈，谢谢！",
        ],
    },
    SuggestionTemplate {
        id: "humorous",
        style: SuggestionStyle::Humorous,
        title: "万能建议模板·幽默版",
        icon: "😄",
        color: "28 60% 85%",
        content: &[
            "嘿～发现了一个小bug，不过别担心，咱们一起搞定它！",
            "问题是这样的：[用轻松的语气描述问题]",
            "我有个小妙招：[提出建议，加点俏皮话]",
            "试试看？说不定会有惊喜哦！",
            "有问题随时找我，咱们一起加油💪",
        ],
    },
    SuggestionTemplate {
        id: "empathetic",
        style: SuggestionStyle::Empathetic,
        title: "万能建议模板·共情版",
        icon: "❤️",
        color: "270 25% 77%",
        content: &[
            "我理解大家最近都很辛苦，关于[问题]想和大家聊聊。",
            "我注意到：[从对方角度描述观察到的情况]",
            "或许我们可以：[温和地提出建议]",
            "这样做的好处是：[说明对大家的帮助]",
            "感谢大家的付出，一起努力让事情变得更好！",
        ],
    },
];

/// The golden template.
pub const MASTER_TEMPLATE: SuggestionTemplate = SuggestionTemplate {
    id: "master",
    style: SuggestionStyle::Master,
    title: "万能建议模板·大师级",
    icon: "✨",
    color: "35 45% 72%",
    content: &[
        "【专业分析】关于[具体问题]，我进行了全面思考：",
        "现状：[客观描述] + 我理解这对大家的影响",
        "建议：[具体方案] + 这样做会让工作更轻松",
        "效果：[预期成果] + 相信我们能做得更好",
        "期待与大家一起创造更好的成果！💪✨",
    ],
};

/// Picks a template uniformly; the master template joins the pool unless excluded.
pub fn random_template(exclude_golden: bool) -> &'static SuggestionTemplate {
    let pool = if exclude_golden {
        SUGGESTION_TEMPLATES.len()
    } else {
        SUGGESTION_TEMPLATES.len() + 1
    };
    let index = rand::rng().random_range(0..pool);
    SUGGESTION_TEMPLATES.get(index).unwrap_or(&MASTER_TEMPLATE)
}

/// Looks up the template of `style`.
pub fn template_by_style(style: SuggestionStyle) -> Option<&'static SuggestionTemplate> {
    if style == SuggestionStyle::Master {
        return Some(&MASTER_TEMPLATE);
    }
    SUGGESTION_TEMPLATES
        .iter()
        .find(|template| template.style == style)
}

/// Capsule colour of `style`.
pub fn capsule_color(style: SuggestionStyle) -> &'static str {
    template_by_style(style).map_or(FALLBACK_COLOR, |template| template.color)
}

/// Result of one draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapsuleDraw {
    /// Template that dropped.
    pub template: &'static SuggestionTemplate,
    /// Whether this was a golden capsule.
    pub golden: bool,
    /// Total number of draws including this one.
    pub usage_count: u64,
}

/// Draws capsules and keeps the persistent draw counter.
#[derive(Debug, Clone)]
pub struct CapsuleMachine {
    /// Storage for the counter.
    kv: KvStore,
}

impl CapsuleMachine {
    /// Creates a machine on top of `kv`.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Number of draws so far.
    ///
    /// # Errors
    /// Returns an error if the counter cannot be read.
    pub fn usage_count(&self) -> Result<u64> {
        Ok(self.kv.get::<u64>(USAGE_COUNT_KEY)?.unwrap_or(0))
    }

    /// Increments the counter and draws a capsule.
    ///
    /// # Errors
    /// Returns an error if the counter cannot be read or written.
    pub fn draw(&self) -> Result<CapsuleDraw> {
        let usage_count = self.usage_count()? + 1;
        self.kv.set(USAGE_COUNT_KEY, &usage_count)?;

        let golden = usage_count % GOLDEN_INTERVAL == 0;
        let template = if golden {
            &MASTER_TEMPLATE
        } else {
            random_template(true)
        };
        debug!("Capsule draw #{usage_count}: {}", template.id);

        Ok(CapsuleDraw {
            template,
            golden,
            usage_count,
        })
    }
}
