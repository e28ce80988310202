// src/filesystem/types.rs
//! Planned filesystem operations and the report of executing them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A regular file found by a folder scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedFile {
    pub name: String,
    pub path: PathBuf,
    /// Lower-cased, with the leading dot (`".md"`); empty when there is none.
    pub extension: String,
    pub size: u64,
    /// Absent on filesystems that do not record creation time.
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// A list of operations, executed in order.
#[derive(Debug, Clone, Default)]
pub struct OperationPlan {
    pub operations: Vec<FileOperation>,
}

impl OperationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: FileOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn push(&mut self, operation: FileOperation) {
        self.operations.push(operation);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// Create a directory and any missing parents. Succeeds if it already exists.
    CreateDirectory { path: PathBuf },
    /// Rename `from` to `to`.
    MoveFile { from: PathBuf, to: PathBuf },
    /// Write `content`, creating parent directories.
    WriteFile { path: PathBuf, content: String },
}

#[derive(Debug, Clone, Default)]
pub struct OperationReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub stats: ExecutionStats,
}

impl OperationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.stats.operations_completed += 1;
        self.stats.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.stats.operations_failed += 1;
        self.failed.push(operation);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: FileOperation,
    pub bytes_written: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: FileOperation,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    pub operations_completed: usize,
    pub operations_failed: usize,
    pub bytes_written: usize,
    pub total_duration_ms: u64,
}
