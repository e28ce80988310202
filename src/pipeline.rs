// src/pipeline.rs
//! Capability traits for the external services the workflows depend on.
//!
//! Workflows hold these as `Arc<dyn Trait>`, so each workflow can be tested
//! against in-memory fakes.

use crate::api::anthropic::CompletionOptions;
use crate::api::drive::DriveFile;
use crate::error::AppError;
use crate::formatting::{Block, FieldMap};
use crate::types::NotionId;
use serde_json::Value;
use std::path::Path;

/// Produces text from a prompt.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, AppError>;
}

/// Persists pages into a Notion database.
#[async_trait::async_trait]
pub trait PageStore: Send + Sync {
    /// Creates a page and returns the page object.
    async fn create_page(&self, database_id: &NotionId, fields: &FieldMap) -> Result<Value, AppError>;

    async fn append_blocks(&self, page_id: &NotionId, blocks: &[Block]) -> Result<Value, AppError>;
}

/// Stores files in a remote drive.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    async fn upload_file(
        &self,
        path: &Path,
        name: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError>;

    async fn upload_text_file(
        &self,
        content: &str,
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError>;
}
