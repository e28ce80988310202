// src/filesystem/executor.rs
//! Performs planned filesystem operations.
//!
//! A failing operation is recorded in the report and execution continues
//! with the next one.

use super::types::*;
use crate::error::AppError;
use std::path::Path;
use std::time::Instant;
use tokio::fs;

pub async fn execute_plan(plan: OperationPlan) -> OperationReport {
    let mut report = OperationReport::new();
    let start_time = Instant::now();

    log::info!(
        "Executing file plan with {} operations",
        plan.operations.len()
    );

    for operation in plan.operations {
        let op_start = Instant::now();
        match execute_operation(&operation).await {
            Ok(bytes_written) => {
                let duration_ms = op_start.elapsed().as_millis() as u64;
                report = report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                    duration_ms,
                });
            }
            Err(e) => {
                log::error!("File operation failed: {}", e);
                report = report.with_failed(FailedOperation {
                    operation,
                    error: e.to_string(),
                });
            }
        }
    }

    report.stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

    log::info!(
        "File plan complete: {} succeeded, {} failed in {}ms",
        report.stats.operations_completed,
        report.stats.operations_failed,
        report.stats.total_duration_ms
    );

    report
}

async fn execute_operation(operation: &FileOperation) -> Result<usize, AppError> {
    match operation {
        FileOperation::CreateDirectory { path } => {
            create_directory(path).await?;
            Ok(0)
        }
        FileOperation::MoveFile { from, to } => move_file(from, to).await,
        FileOperation::WriteFile { path, content } => write_file(path, content).await,
    }
}

async fn create_directory(path: &Path) -> Result<(), AppError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            log::debug!("Directory already exists: {}", path.display());
            return Ok(());
        }
        Ok(_) => {
            return Err(AppError::file_system(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists but is not a directory",
                ),
            ))
        }
        Err(_) => {}
    }

    fs::create_dir_all(path)
        .await
        .map_err(|e| AppError::file_system(path, e))?;
    log::info!("Created directory: {}", path.display());
    Ok(())
}

async fn move_file(from: &Path, to: &Path) -> Result<usize, AppError> {
    log::debug!("Moving {} to {}", from.display(), to.display());
    fs::rename(from, to)
        .await
        .map_err(|e| AppError::file_system(from, e))?;
    Ok(0)
}

async fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_system(parent, e))?;
    }

    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_system(path, e))?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}
