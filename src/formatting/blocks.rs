// src/formatting/blocks.rs
//! Builders for Notion page content blocks.

use super::rich_text::{rich_text_segments, RichText, RICH_TEXT_CAPACITY};
use serde::Serialize;

/// Text payload shared by every block type built here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub rich_text: Vec<RichText>,
}

impl TextBlock {
    fn new(content: &str) -> Self {
        Self {
            rich_text: rich_text_segments(content),
        }
    }
}

/// A child block in Notion's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBlock },
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBlock },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBlock },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: TextBlock },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextBlock },
    #[serde(rename = "numbered_list_item")]
    NumberedListItem { numbered_list_item: TextBlock },
}

pub fn text_block(content: &str) -> Block {
    Block::Paragraph {
        paragraph: TextBlock::new(content),
    }
}

/// Heading block; levels outside 1..=3 are clamped.
pub fn heading_block(content: &str, level: u8) -> Block {
    let text = TextBlock::new(content);
    match level {
        0 | 1 => Block::Heading1 { heading_1: text },
        2 => Block::Heading2 { heading_2: text },
        _ => Block::Heading3 { heading_3: text },
    }
}

/// One list item block per entry.
pub fn list_blocks<S: AsRef<str>>(items: &[S], ordered: bool) -> Vec<Block> {
    items
        .iter()
        .map(|item| {
            let text = TextBlock::new(item.as_ref());
            if ordered {
                Block::NumberedListItem {
                    numbered_list_item: text,
                }
            } else {
                Block::BulletedListItem {
                    bulleted_list_item: text,
                }
            }
        })
        .collect()
}

/// Paragraph blocks for `content`, split so no block exceeds one rich-text
/// array.
pub fn paragraph_blocks(content: &str) -> Vec<Block> {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= RICH_TEXT_CAPACITY {
        return vec![text_block(content)];
    }
    chars
        .chunks(RICH_TEXT_CAPACITY)
        .map(|chunk| text_block(&chunk.iter().collect::<String>()))
        .collect()
}

/// Converts generated text into blocks.
///
/// Recognizes `#`-style headings and `-`/`*`/`1.` list markers line by line;
/// consecutive plain lines are joined into one paragraph, which spills into
/// further paragraphs when too long for one block.
pub fn content_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        if !paragraph.is_empty() {
            blocks.extend(paragraph_blocks(&paragraph.join("\n")));
            paragraph.clear();
        }
    }

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some((level, heading)) = parse_heading(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(heading_block(heading, level));
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush(&mut paragraph, &mut blocks);
            blocks.extend(list_blocks(&[item], false));
        } else if let Some(item) = strip_ordered_marker(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.extend(list_blocks(&[item], true));
        } else {
            paragraph.push(trimmed);
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    line[hashes..]
        .strip_prefix(' ')
        .map(|rest| (hashes.min(3) as u8, rest.trim()))
}

fn strip_ordered_marker(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}
