// src/workflows/content_generation.rs
//! Generates text with the LLM and stores it in Notion or Drive.

use crate::api::drive::DriveFile;
use crate::api::notion::page_id_of;
use crate::api::CompletionOptions;
use crate::constants::NOTION_MAX_BLOCKS_PER_APPEND;
use crate::error::AppError;
use crate::formatting::{content_blocks, FieldMap};
use crate::pipeline::{FileStore, LanguageModel, PageStore};
use crate::types::NotionId;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Optional guidance appended to the base prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationContext {
    pub style: Option<String>,
    pub audience: Option<String>,
    pub length: Option<String>,
}

pub fn build_prompt(prompt: &str, context: &GenerationContext) -> String {
    let mut full_prompt = prompt.to_string();
    let guidance = [
        ("Style guidelines", &context.style),
        ("Target audience", &context.audience),
        ("Approximate length", &context.length),
    ];
    for (label, value) in guidance {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            full_prompt.push_str(&format!("\n\n{}: {}", label, value));
        }
    }
    full_prompt
}

pub struct ContentGenerationWorkflow {
    model: Arc<dyn LanguageModel>,
    pages: Option<Arc<dyn PageStore>>,
    files: Option<Arc<dyn FileStore>>,
    default_folder_id: Option<String>,
}

impl ContentGenerationWorkflow {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            pages: None,
            files: None,
            default_folder_id: None,
        }
    }

    pub fn with_page_store(mut self, pages: Arc<dyn PageStore>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Drive uploads go to `default_folder_id` unless a folder is given per call.
    pub fn with_file_store(
        mut self,
        files: Arc<dyn FileStore>,
        default_folder_id: Option<String>,
    ) -> Self {
        self.files = Some(files);
        self.default_folder_id = default_folder_id;
        self
    }

    /// Generates text using the model's configured defaults.
    pub async fn generate(&self, prompt: &str, context: &GenerationContext) -> Result<String, AppError> {
        let full_prompt = build_prompt(prompt, context);
        let content = self
            .model
            .complete(&full_prompt, &CompletionOptions::default())
            .await?;
        log::info!("Generated {} characters of content", content.chars().count());
        Ok(content)
    }

    /// Creates a page for the content and appends the content as blocks.
    pub async fn save_to_notion(
        &self,
        content: &str,
        title: &str,
        database_id: &NotionId,
    ) -> Result<Value, AppError> {
        let pages = self.pages.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no Notion page store configured".to_string())
        })?;

        let mut fields = FieldMap::new();
        fields.insert("title".into(), title.into());
        fields.insert("content".into(), content.into());
        fields.insert("status".into(), "Generated".into());
        fields.insert("created_at".into(), Utc::now().into());

        let page = pages.create_page(database_id, &fields).await?;
        let page_id = page_id_of(&page)?;

        let blocks = content_blocks(content);
        for chunk in blocks.chunks(NOTION_MAX_BLOCKS_PER_APPEND) {
            pages.append_blocks(&page_id, chunk).await?;
        }

        log::info!(
            "Saved '{}' to Notion page {} ({} blocks)",
            title,
            page_id,
            blocks.len()
        );
        Ok(page)
    }

    /// Uploads the content as a plain-text file.
    pub async fn save_to_drive(
        &self,
        content: &str,
        file_name: &str,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        let files = self.files.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no Google Drive file store configured".to_string())
        })?;
        let folder = folder_id.or(self.default_folder_id.as_deref());
        let file = files.upload_text_file(content, file_name, folder).await?;
        log::info!("Uploaded '{}' to Google Drive as {}", file_name, file.id);
        Ok(file)
    }
}
