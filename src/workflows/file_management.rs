// src/workflows/file_management.rs
//! Sorting, indexing and syncing the files of a local folder.

use crate::error::AppError;
use crate::filesystem::{
    execute_plan, scan_folder, FileOperation, OperationPlan, ScannedFile,
};
use crate::formatting::FieldMap;
use crate::pipeline::{FileStore, PageStore};
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Documents,
    Spreadsheets,
    Presentations,
    Images,
    Archives,
    Others,
}

impl FileCategory {
    pub const ALL: [FileCategory; 6] = [
        FileCategory::Documents,
        FileCategory::Spreadsheets,
        FileCategory::Presentations,
        FileCategory::Images,
        FileCategory::Archives,
        FileCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Spreadsheets => "spreadsheets",
            Self::Presentations => "presentations",
            Self::Images => "images",
            Self::Archives => "archives",
            Self::Others => "others",
        }
    }

    /// Extensions (lower-case, with dot) that belong to the category.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Documents => &[".txt", ".md", ".docx", ".pdf"],
            Self::Spreadsheets => &[".csv", ".xlsx", ".xls"],
            Self::Presentations => &[".pptx", ".ppt"],
            Self::Images => &[".jpg", ".jpeg", ".png", ".gif", ".svg"],
            Self::Archives => &[".zip", ".rar", ".7z"],
            Self::Others => &[],
        }
    }

    pub fn for_extension(extension: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.extensions().contains(&extension))
            .unwrap_or(FileCategory::Others)
    }
}

/// Every category, in [`FileCategory::ALL`] order, with the files it received.
pub type CategorizedFiles = IndexMap<FileCategory, Vec<ScannedFile>>;

pub fn categorize_files(files: &[ScannedFile]) -> CategorizedFiles {
    let mut categorized: CategorizedFiles = FileCategory::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();
    for file in files {
        categorized
            .entry(FileCategory::for_extension(&file.extension))
            .or_default()
            .push(file.clone());
    }
    categorized
}

/// Where each category's folder goes during organization.
#[derive(Debug, Clone)]
pub struct TargetLayout {
    root: PathBuf,
    overrides: HashMap<FileCategory, PathBuf>,
}

impl TargetLayout {
    /// Category folders named after the category, directly under `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_folder(mut self, category: FileCategory, folder: impl Into<PathBuf>) -> Self {
        self.overrides.insert(category, folder.into());
        self
    }

    pub fn folder_for(&self, category: FileCategory) -> PathBuf {
        self.overrides
            .get(&category)
            .cloned()
            .unwrap_or_else(|| self.root.join(category.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Moved,
    Synced,
    Failed,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    fn failed(file: &str, error: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            status: OutcomeStatus::Failed,
            target: None,
            drive_file_id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSummary {
    pub processed_files: usize,
    /// File count per category, including empty categories.
    pub categories: IndexMap<FileCategory, usize>,
    pub results: Vec<FileOutcome>,
    /// True when every move succeeded.
    pub organization_complete: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub synced_files: usize,
    pub failed_files: usize,
    pub results: Vec<FileOutcome>,
    pub sync_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileIndex {
    pub created_at: DateTime<Utc>,
    pub folder_path: PathBuf,
    pub total_files: usize,
    pub files: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub extension: String,
    pub size: u64,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSummary {
    pub index_file: PathBuf,
    pub indexed_files: usize,
}

#[derive(Default)]
pub struct FileManagementWorkflow {
    files: Option<Arc<dyn FileStore>>,
    pages: Option<Arc<dyn PageStore>>,
}

impl FileManagementWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_store(mut self, files: Arc<dyn FileStore>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_page_store(mut self, pages: Arc<dyn PageStore>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Scans `folder`; an unreadable folder is logged and yields no files.
    pub async fn scan(&self, folder: &Path) -> Vec<ScannedFile> {
        match scan_folder(folder).await {
            Ok(files) => files,
            Err(e) => {
                log::error!("Folder scan failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Moves each file of `source` into its category folder.
    ///
    /// Folders are only created for categories that received files. A failed
    /// move is recorded and the remaining files are still processed.
    pub async fn organize(&self, source: &Path, layout: &TargetLayout) -> OrganizationSummary {
        let files = self.scan(source).await;
        let categorized = categorize_files(&files);

        let mut plan = OperationPlan::new();
        let mut moves = Vec::new();
        for (category, category_files) in &categorized {
            if category_files.is_empty() {
                continue;
            }
            let folder = layout.folder_for(*category);
            plan.push(FileOperation::CreateDirectory {
                path: folder.clone(),
            });
            for file in category_files {
                let to = folder.join(&file.name);
                plan.push(FileOperation::MoveFile {
                    from: file.path.clone(),
                    to: to.clone(),
                });
                moves.push((file.name.clone(), file.path.clone(), to));
            }
        }

        let report = execute_plan(plan).await;
        let failures: HashMap<&Path, &str> = report
            .failed
            .iter()
            .filter_map(|failed| match &failed.operation {
                FileOperation::MoveFile { from, .. } => {
                    Some((from.as_path(), failed.error.as_str()))
                }
                _ => None,
            })
            .collect();

        let results: Vec<FileOutcome> = moves
            .into_iter()
            .map(|(name, from, to)| match failures.get(from.as_path()) {
                Some(error) => FileOutcome::failed(&name, *error),
                None => FileOutcome {
                    file: name,
                    status: OutcomeStatus::Moved,
                    target: Some(to),
                    drive_file_id: None,
                    error: None,
                },
            })
            .collect();

        let organization_complete = results
            .iter()
            .all(|outcome| outcome.status == OutcomeStatus::Moved);
        OrganizationSummary {
            processed_files: files.len(),
            categories: categorized
                .iter()
                .map(|(category, files)| (*category, files.len()))
                .collect(),
            results,
            organization_complete,
            timestamp: Utc::now(),
        }
    }

    /// Uploads each file of `folder` to Drive, recording per-file outcomes.
    pub async fn sync_to_drive(
        &self,
        folder: &Path,
        drive_folder_id: Option<&str>,
    ) -> Result<SyncSummary, AppError> {
        let store = self.files.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no Google Drive file store configured".to_string())
        })?;

        let mut results = Vec::new();
        for file in self.scan(folder).await {
            match store
                .upload_file(&file.path, Some(file.name.as_str()), drive_folder_id)
                .await
            {
                Ok(uploaded) => results.push(FileOutcome {
                    file: file.name,
                    status: OutcomeStatus::Synced,
                    target: None,
                    drive_file_id: Some(uploaded.id),
                    error: None,
                }),
                Err(e) => {
                    log::warn!("Failed to sync {}: {}", file.name, e);
                    results.push(FileOutcome::failed(&file.name, e.to_string()));
                }
            }
        }

        let synced_files = results
            .iter()
            .filter(|r| r.status == OutcomeStatus::Synced)
            .count();
        Ok(SyncSummary {
            synced_files,
            failed_files: results.len() - synced_files,
            results,
            sync_timestamp: Utc::now(),
        })
    }

    /// Writes `{index_name}.json` into `folder` describing its files.
    pub async fn create_file_index(
        &self,
        folder: &Path,
        index_name: &str,
    ) -> Result<IndexSummary, AppError> {
        let files = self.scan(folder).await;
        let index = FileIndex {
            created_at: Utc::now(),
            folder_path: folder.to_path_buf(),
            total_files: files.len(),
            files: files
                .into_iter()
                .map(|file| IndexEntry {
                    name: file.name,
                    extension: file.extension,
                    size: file.size,
                    created: file.created,
                    modified: file.modified,
                })
                .collect(),
        };

        let content = serde_json::to_string_pretty(&index)
            .map_err(|e| AppError::InvalidInput(format!("Unserializable file index: {}", e)))?;
        let index_file = folder.join(format!("{}.json", index_name));
        let report = execute_plan(OperationPlan::new().with_operation(FileOperation::WriteFile {
            path: index_file.clone(),
            content,
        }))
        .await;

        if let Some(failed) = report.failed.into_iter().next() {
            return Err(AppError::Io(std::io::Error::other(failed.error)));
        }

        Ok(IndexSummary {
            index_file,
            indexed_files: index.total_files,
        })
    }

    /// Records a completed operation as a page in `database_id`.
    pub async fn log_to_notion<T: Serialize + Sync>(
        &self,
        operation: &str,
        results: &T,
        database_id: &NotionId,
    ) -> Result<Value, AppError> {
        let pages = self.pages.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no Notion page store configured".to_string())
        })?;
        let results = serde_json::to_string(results).map_err(|e| {
            AppError::InvalidInput(format!("Unserializable operation results: {}", e))
        })?;

        let mut fields = FieldMap::new();
        fields.insert("title".into(), format!("File Operation: {}", operation).into());
        fields.insert("operation_type".into(), operation.into());
        fields.insert("results".into(), results.into());
        fields.insert("status".into(), "Completed".into());
        fields.insert("timestamp".into(), Utc::now().into());

        pages.create_page(database_id, &fields).await
    }
}
