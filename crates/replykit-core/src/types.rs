use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Coarse social context attached to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneType {
    /// Workplace communication.
    Work,
    /// Emotional or relationship conversations.
    Emotion,
    /// General social chatter.
    Social,
    /// No particular scene; used as a filter that matches everything.
    All,
}

impl SceneType {
    /// The three concrete scenes, in display order.
    pub const CONCRETE: [Self; 3] = [Self::Work, Self::Emotion, Self::Social];

    /// Display label shown to users.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Work => "职场",
            Self::Emotion => "情感",
            Self::Social => "社交",
            Self::All => "全部",
        }
    }
}

/// Tone variant requested from the generation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStyle {
    /// Formal, professional wording.
    Formal,
    /// Warm, friendly wording.
    Friendly,
    /// Light-hearted wording.
    Humorous,
}

impl ReplyStyle {
    /// Every style, in the order replies are generated.
    pub const ALL: [Self; 3] = [Self::Formal, Self::Friendly, Self::Humorous];

    /// Display label shown to users.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Formal => "正式",
            Self::Friendly => "友好",
            Self::Humorous => "幽默",
        }
    }
}

/// How bluntly the reply should be phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyIntensity {
    /// Tactful and soft.
    Gentle,
    /// Balanced.
    Moderate,
    /// Direct and explicit.
    Direct,
}

/// Relationship between the user and the person being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// The other person is the user's superior.
    Superior,
    /// A colleague or friend on equal footing.
    Peer,
    /// The other person reports to the user.
    Subordinate,
}

/// Implements `Display` and `FromStr` over the lowercase identifiers.
macro_rules! lowercase_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                let text = match self {
                    $(Self::$variant => $text,)+
                };
                formatter.write_str(text)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(Error::InvalidInput(format!(
                        concat!("unknown ", stringify!($name), ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

lowercase_enum!(SceneType {
    Work => "work",
    Emotion => "emotion",
    Social => "social",
    All => "all",
});

lowercase_enum!(ReplyStyle {
    Formal => "formal",
    Friendly => "friendly",
    Humorous => "humorous",
});

lowercase_enum!(ReplyIntensity {
    Gentle => "gentle",
    Moderate => "moderate",
    Direct => "direct",
});

lowercase_enum!(RelationType {
    Superior => "superior",
    Peer => "peer",
    Subordinate => "subordinate",
});

/// One generated (or canned) reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyItem {
    /// Identifier, `{style}_{millis}` for generated replies.
    pub id: String,
    /// Tone of this reply.
    pub style: ReplyStyle,
    /// Reply text.
    pub content: String,
}

impl ReplyItem {
    /// Creates a reply with the given id.
    pub fn new(id: impl Into<String>, style: ReplyStyle, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style,
            content: content.into(),
        }
    }
}

/// One persisted generation: the input, its scene and the replies produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Identifier, `history_{millis}` for items created by the assistant.
    pub id: String,
    /// Text the user typed.
    pub input: String,
    /// Scene used for generation.
    pub scene: SceneType,
    /// Replies in generation order.
    pub replies: Vec<ReplyItem>,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    /// Whether the user starred this item.
    pub is_favorite: bool,
}

/// Preset prompt offered as a shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickTag {
    /// Stable identifier.
    pub id: &'static str,
    /// Short button label.
    pub label: &'static str,
    /// Scene the prompt belongs to.
    pub scene: SceneType,
    /// Input text filled in when the tag is chosen.
    pub prompt: &'static str,
}

/// Communication tip shown on the home view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRecommendation {
    /// Stable identifier.
    pub id: &'static str,
    /// Tip title.
    pub title: &'static str,
    /// Tip body.
    pub content: &'static str,
    /// Scene the tip relates to.
    pub scene: SceneType,
}

/// Author role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model.
    System,
    /// Text from the user.
    User,
}

/// Message sent to the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: ChatRole,
    /// Textual content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}
