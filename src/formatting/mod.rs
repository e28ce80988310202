// src/formatting/mod.rs
//! Conversion of caller data into Notion's request schema.
//!
//! - `properties`: typed page properties from plain fields
//! - `blocks`: page content blocks (paragraphs, headings, lists)
//! - `rich_text`: text segments shared by both

pub mod blocks;
pub mod properties;
pub mod rich_text;

pub use blocks::{content_blocks, heading_block, list_blocks, paragraph_blocks, text_block, Block};
pub use properties::{
    to_external_schema, FieldMap, FieldValue, FormattedProperties, PropertyValue,
};
