//! Keyword-based scene detection, quick tags and daily tips.

use replykit_core::{DailyRecommendation, QuickTag, SceneType};

/// Keywords that suggest a workplace conversation.
const WORK_KEYWORDS: [&str; 14] = [
    "领导", "上级", "同事", "会议", "汇报", "工作", "项目", "任务", "批评", "表扬", "加班", "请假",
    "辞职", "面试",
];

/// Keywords that suggest an emotional conversation.
const EMOTION_KEYWORDS: [&str; 13] = [
    "朋友", "爱", "喜欢", "难过", "开心", "安慰", "表白", "分手", "恋爱", "感情", "心情", "伤心",
    "快乐",
];

/// Keywords that suggest general social chatter.
const SOCIAL_KEYWORDS: [&str; 11] = [
    "群聊", "聚会", "邀请", "拒绝", "感谢", "道歉", "祝福", "问候", "闲聊", "活跃", "礼貌",
];

/// Counts how many keywords occur in `input`; repeats count once.
fn keyword_score(input: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| input.contains(**keyword))
        .count()
}

/// Classifies free text into a concrete scene.
///
/// A scene wins only with a strictly higher score than both others; ties
/// and inputs without any keyword are treated as social.
pub fn detect_scene(input: &str) -> SceneType {
    let work = keyword_score(input, &WORK_KEYWORDS);
    let emotion = keyword_score(input, &EMOTION_KEYWORDS);
    let social = keyword_score(input, &SOCIAL_KEYWORDS);

    if work > emotion && work > social {
        SceneType::Work
    } else if emotion > work && emotion > social {
        SceneType::Emotion
    } else {
        SceneType::Social
    }
}

/// Preset prompts, four per scene.
pub fn quick_tags() -> Vec<QuickTag> {
    vec![
        QuickTag {
            id: "work_1",
            label: "被批评了",
            scene: SceneType::Work,
            prompt: "领导批评了我的工作，我该如何回复",
        },
        QuickTag {
            id: "work_2",
            label: "向上级汇报",
            scene: SceneType::Work,
            prompt: "需要向上级汇报工作进展",
        },
        QuickTag {
            id: "work_3",
            label: "会议发言",
            scene: SceneType::Work,
            prompt: "在会议上需要发表意见",
        },
        QuickTag {
            id: "work_4",
            label: "请假申请",
            scene: SceneType::Work,
            prompt: "需要向领导请假",
        },
        QuickTag {
            id: "emotion_1",
            label: "安慰朋友",
            scene: SceneType::Emotion,
            prompt: "朋友心情不好，需要安慰",
        },
        QuickTag {
            id: "emotion_2",
            label: "表达爱意",
            scene: SceneType::Emotion,
            prompt: "想向喜欢的人表达爱意",
        },
        QuickTag {
            id: "emotion_3",
            label: "拒绝示好",
            scene: SceneType::Emotion,
            prompt: "需要委婉拒绝别人的示好",
        },
        QuickTag {
            id: "emotion_4",
            label: "道歉和解",
            scene: SceneType::Emotion,
            prompt: "和朋友发生矛盾，想要道歉和解",
        },
        QuickTag {
            id: "social_1",
            label: "群聊活跃",
            scene: SceneType::Social,
            prompt: "在群聊中活跃气氛",
        },
        QuickTag {
            id: "social_2",
            label: "礼貌回应",
            scene: SceneType::Social,
            prompt: "需要礼貌地回应别人",
        },
        QuickTag {
            id: "social_3",
            label: "委婉拒绝",
            scene: SceneType::Social,
            prompt: "需要委婉拒绝别人的邀请",
        },
        QuickTag {
            id: "social_4",
            label: "表达感谢",
            scene: SceneType::Social,
            prompt: "想要表达感谢",
        },
    ]
}

/// Keeps the tags of `scene`; `All` keeps everything.
pub fn filter_tags_by_scene(tags: &[QuickTag], scene: SceneType) -> Vec<QuickTag> {
    tags.iter()
        .filter(|tag| scene == SceneType::All || tag.scene == scene)
        .cloned()
        .collect()
}

/// One communication tip per concrete scene.
pub fn daily_recommendations() -> [DailyRecommendation; 3] {
    [
        DailyRecommendation {
            id: "1",
            title: "职场沟通技巧",
            content: "在职场中，及时反馈和清晰表达是建立良好沟通的关键。",
            scene: SceneType::Work,
        },
        DailyRecommendation {
            id: "2",
            title: "情感表达要点",
            content: "真诚和共情是情感沟通的基础，学会倾听比表达更重要。",
            scene: SceneType::Emotion,
        },
        DailyRecommendation {
            id: "3",
            title: "社交礼仪提醒",
            content: "礼貌和尊重是社交的基本原则，适当的赞美能拉近距离。",
            scene: SceneType::Social,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_work() {
        assert_eq!(detect_scene("领导批评了我的工作"), SceneType::Work);
        assert_eq!(detect_scene("明天要面试"), SceneType::Work);
    }

    #[test]
    fn test_detect_emotion() {
        assert_eq!(detect_scene("朋友心情不好，很伤心"), SceneType::Emotion);
    }

    #[test]
    fn test_detect_social() {
        assert_eq!(detect_scene("周末聚会的邀请"), SceneType::Social);
    }

    #[test]
    fn test_no_keywords_defaults_to_social() {
        assert_eq!(detect_scene("hello there"), SceneType::Social);
        assert_eq!(detect_scene(""), SceneType::Social);
    }

    #[test]
    fn test_tie_defaults_to_social() {
        // one work keyword, one emotion keyword
        assert_eq!(detect_scene("同事说他喜欢猫"), SceneType::Social);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        // "会议" twice vs. "朋友" + "开心"
        assert_eq!(detect_scene("会议会议，朋友很开心"), SceneType::Emotion);
    }

    #[test]
    fn test_quick_tags_per_scene() {
        let tags = quick_tags();
        assert_eq!(tags.len(), 12);
        for scene in SceneType::CONCRETE {
            let filtered = filter_tags_by_scene(&tags, scene);
            assert_eq!(filtered.len(), 4);
            assert!(filtered.iter().all(|tag| tag.scene == scene));
        }
        assert_eq!(filter_tags_by_scene(&tags, SceneType::All).len(), 12);
    }

    #[test]
    fn test_quick_tag_prompts_detected_scene() {
        // these two only hit social keywords or tie with them
        let social_leaning = ["emotion_3", "emotion_4"];
        for tag in quick_tags() {
            let expected = if social_leaning.contains(&tag.id) {
                SceneType::Social
            } else {
                tag.scene
            };
            assert_eq!(detect_scene(tag.prompt), expected, "{}", tag.id);
        }
    }

    #[test]
    fn test_daily_recommendations_cover_scenes() {
        let scenes: Vec<_> = daily_recommendations().iter().map(|rec| rec.scene).collect();
        assert_eq!(scenes, SceneType::CONCRETE);
    }
}
