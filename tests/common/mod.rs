// tests/common/mod.rs
//! In-memory stand-ins for the service capabilities the workflows use.

#![allow(dead_code)]

use content_relay::api::drive::DriveFile;
use content_relay::error::AppError;
use content_relay::{Block, CompletionOptions, FieldMap, FileStore, LanguageModel, NotionId, PageStore};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DATABASE_ID: &str = "598337872cf94fdf8782e53db20768a5";
pub const PAGE_ID: &str = "1429989f-e8ac-4eff-bc8f-57f56486db54";

pub fn database_id() -> NotionId {
    NotionId::parse(DATABASE_ID).unwrap()
}

/// Answers prompts from a fixed queue of replies, recording every call.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    pub calls: Mutex<Vec<(String, CompletionOptions)>>,
}

impl ScriptedModel {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub fn options(&self) -> Vec<CompletionOptions> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, options)| options.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::InvalidInput("no scripted reply left".to_string()))
    }
}

/// Records created pages and appended block batches.
#[derive(Default)]
pub struct RecordingPages {
    pub created: Mutex<Vec<(NotionId, FieldMap)>>,
    pub appended: Mutex<Vec<(NotionId, Vec<Block>)>>,
}

#[async_trait::async_trait]
impl PageStore for RecordingPages {
    async fn create_page(&self, database_id: &NotionId, fields: &FieldMap) -> Result<Value, AppError> {
        self.created
            .lock()
            .unwrap()
            .push((database_id.clone(), fields.clone()));
        Ok(json!({ "object": "page", "id": PAGE_ID }))
    }

    async fn append_blocks(&self, page_id: &NotionId, blocks: &[Block]) -> Result<Value, AppError> {
        self.appended
            .lock()
            .unwrap()
            .push((page_id.clone(), blocks.to_vec()));
        Ok(json!({ "object": "list" }))
    }
}

/// Accepts uploads, failing for names listed in `rejected`.
#[derive(Default)]
pub struct RecordingDrive {
    pub rejected: Vec<String>,
    pub uploads: Mutex<Vec<(String, Option<String>)>>,
    pub text_uploads: Mutex<Vec<(String, String, Option<String>)>>,
}

impl RecordingDrive {
    pub fn rejecting(names: &[&str]) -> Self {
        Self {
            rejected: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl FileStore for RecordingDrive {
    async fn upload_file(
        &self,
        path: &Path,
        name: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| path.file_name().unwrap().to_string_lossy().into_owned());
        if self.rejected.contains(&name) {
            return Err(AppError::file_system(
                PathBuf::from(path),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "upload refused"),
            ));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((name.clone(), folder_id.map(str::to_string)));
        Ok(DriveFile {
            id: format!("drive-{}", uploads.len()),
            name: Some(name),
            ..DriveFile::default()
        })
    }

    async fn upload_text_file(
        &self,
        content: &str,
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<DriveFile, AppError> {
        self.text_uploads.lock().unwrap().push((
            content.to_string(),
            name.to_string(),
            folder_id.map(str::to_string),
        ));
        Ok(DriveFile {
            id: "drive-text".to_string(),
            name: Some(name.to_string()),
            ..DriveFile::default()
        })
    }
}
