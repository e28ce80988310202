// src/filesystem/scan.rs
//! Folder scanning and filename helpers.

use super::types::ScannedFile;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::fs;

/// Lists the regular files directly inside `folder`, sorted by name.
///
/// Subdirectories and symlinks are skipped. An entry whose type or metadata
/// cannot be read is logged and skipped; only an unreadable folder fails.
pub async fn scan_folder(folder: &Path) -> Result<Vec<ScannedFile>, AppError> {
    let mut entries = fs::read_dir(folder)
        .await
        .map_err(|e| AppError::file_system(folder, e))?;
    let mut files = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_system(folder, e))?
    {
        let path = entry.path();
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        }
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(ScannedFile {
            extension: extension_of(&name),
            size: metadata.len(),
            created: metadata.created().ok().map(DateTime::<Utc>::from),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            name,
            path,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!("Scanned {} file(s) in {}", files.len(), folder.display());
    Ok(files)
}

/// Lower-cased extension with its dot, or "" when the name has none.
///
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Makes a string safe to use as a file name.
pub fn sanitize_filename(name: &str) -> String {
    let mut safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string();

    if safe_name.chars().count() > 100 {
        safe_name = safe_name.chars().take(100).collect();
    }

    if safe_name.is_empty() {
        safe_name = "unnamed".to_string();
    }

    safe_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_lowercased_with_dot() {
        assert_eq!(extension_of("Report.PDF"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".env"), "");
    }

    #[test]
    fn sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_filename("Q3: plan/draft?"), "Q3_ plan_draft_");
        assert_eq!(sanitize_filename("  ..  "), "unnamed");
        assert_eq!(sanitize_filename(&"é".repeat(150)).chars().count(), 100);
    }

    #[tokio::test]
    async fn scan_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "# b").unwrap();
        std::fs::write(dir.path().join("a.CSV"), "x,y").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let files = scan_folder(dir.path()).await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.CSV", "b.md"]);
        assert_eq!(files[0].extension, ".csv");
        assert_eq!(files[0].size, 3);
        assert!(files[0].modified.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_skipped_without_hiding_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# notes").unwrap();
        std::fs::write(dir.path().join("data.csv"), "a,b").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("dangling.txt"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("notes.md"), dir.path().join("alias.md"))
            .unwrap();

        let files = scan_folder(dir.path()).await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["data.csv", "notes.md"]);
    }

    #[tokio::test]
    async fn missing_folder_is_a_filesystem_error() {
        let err = scan_folder(Path::new("/definitely/not/here")).await.unwrap_err();
        assert!(matches!(err, AppError::FileSystem { .. }));
    }
}
