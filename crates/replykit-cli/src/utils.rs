//! Text formatting helpers for terminal output

use chrono::{Local, TimeZone as _};
use replykit_core::{HistoryItem, ReplyItem};

/// Characters of the input shown in history listings.
const INPUT_PREVIEW_CHARS: usize = 30;

/// Collapse `text` to one line of at most `max_chars` characters.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Format a Unix millisecond timestamp in local time.
pub fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| "-".to_owned(), |time| time.format("%m-%d %H:%M").to_string())
}

/// One line of a history listing.
pub fn history_line(item: &HistoryItem) -> String {
    let star = if item.is_favorite { " ★" } else { "" };
    format!(
        "{id}  {time}  [{scene}] {input}{star}",
        id = item.id,
        time = format_timestamp(item.timestamp),
        scene = item.scene.label(),
        input = preview(&item.input, INPUT_PREVIEW_CHARS),
    )
}

/// A reply prefixed with its style label.
pub fn reply_line(reply: &ReplyItem) -> String {
    format!("【{}】{}", reply.style.label(), reply.content)
}
