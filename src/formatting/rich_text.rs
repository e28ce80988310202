// src/formatting/rich_text.rs
//! Plain-text rich text segments, split to fit Notion's per-segment limit.

use crate::constants::{NOTION_RICH_TEXT_LIMIT, NOTION_RICH_TEXT_MAX_SEGMENTS};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text { text: TextContent },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub content: String,
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        RichText::Text {
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

/// Longest text one rich-text array can carry.
pub const RICH_TEXT_CAPACITY: usize = NOTION_RICH_TEXT_LIMIT * NOTION_RICH_TEXT_MAX_SEGMENTS;

/// Splits `text` into segments of at most `NOTION_RICH_TEXT_LIMIT` characters.
///
/// Empty input still yields one (empty) segment. Text beyond
/// `RICH_TEXT_CAPACITY` is dropped with a warning.
pub fn rich_text_segments(text: &str) -> Vec<RichText> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![RichText::plain("")];
    }
    if chars.len() > RICH_TEXT_CAPACITY {
        log::warn!(
            "Truncating rich text from {} to {} characters",
            chars.len(),
            RICH_TEXT_CAPACITY
        );
    }
    chars
        .chunks(NOTION_RICH_TEXT_LIMIT)
        .take(NOTION_RICH_TEXT_MAX_SEGMENTS)
        .map(|chunk| RichText::plain(chunk.iter().collect::<String>()))
        .collect()
}
