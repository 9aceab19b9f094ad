//! Canned replies used when generation fails.

use replykit_core::{ReplyItem, ReplyStyle, SceneType};

/// Canned texts per scene, in `ReplyStyle::ALL` order.
const fn canned_texts(scene: SceneType) -> [&'static str; 3] {
    match scene {
        SceneType::Work => [
            "收到，我会认真处理这件事，稍后向您汇报进展。",
            "好的，我明白了，会尽快完成的！",
            "收到！马上安排，保证完成任务！",
        ],
        SceneType::Emotion => [
            "我理解你的感受，如果需要帮助请随时告诉我。",
            "别担心，一切都会好起来的，我会一直陪着你。",
            "没事的，天塌下来还有我呢！",
        ],
        SceneType::Social => [
            "感谢您的邀请，我会认真考虑的。",
            "谢谢你的邀请，我很开心！",
            "哈哈，必须的！算我一个！",
        ],
        SceneType::All => ["好的，我知道了。", "好的，明白了！", "收到！"],
    }
}

/// Returns the three canned replies for `scene`, ids `default_{style}`.
pub fn default_replies(scene: SceneType) -> Vec<ReplyItem> {
    ReplyStyle::ALL
        .into_iter()
        .zip(canned_texts(scene))
        .map(|(style, text)| ReplyItem::new(format!("default_{style}"), style, text))
        .collect()
}
