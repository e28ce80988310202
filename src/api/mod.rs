// src/api/mod.rs
//! Clients for the external services: Anthropic, Notion and Google Drive.
//!
//! Every client sends its requests through an [`HttpExecutor`], which owns
//! the base URL, default headers, timeout and retry policy of one service.

pub mod anthropic;
pub mod client;
pub mod drive;
pub mod notion;
pub mod pagination;
pub mod parser;

pub use anthropic::{AnthropicClient, CompletionOptions};
pub use client::{ApiResponse, HttpExecutor};
pub use drive::DriveClient;
pub use notion::NotionClient;
