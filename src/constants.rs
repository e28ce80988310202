// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Anthropic API
// ---------------------------------------------------------------------------

pub const ANTHROPIC_API_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 4096;
pub const ANTHROPIC_DEFAULT_TEMPERATURE: f32 = 0.7;

/// LLM calls can take a while to produce long content.
pub const ANTHROPIC_TIMEOUT_MS: u64 = 60_000;

// ---------------------------------------------------------------------------
// Notion API
// ---------------------------------------------------------------------------

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results (API maximum).
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum characters Notion accepts in a single rich-text segment.
pub const NOTION_RICH_TEXT_LIMIT: usize = 2000;

/// Maximum segments Notion accepts in one rich-text array.
pub const NOTION_RICH_TEXT_MAX_SEGMENTS: usize = 100;

/// Maximum child blocks accepted by one append request.
pub const NOTION_MAX_BLOCKS_PER_APPEND: usize = 100;

pub const NOTION_TIMEOUT_MS: u64 = 30_000;

// ---------------------------------------------------------------------------
// Google Drive API
// ---------------------------------------------------------------------------

pub const DRIVE_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";
pub const DRIVE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DRIVE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/drive.file",
];
pub const DRIVE_FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const DRIVE_TIMEOUT_MS: u64 = 30_000;

/// Access tokens are refreshed this many seconds before Google says they expire.
pub const DRIVE_TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Retry policy defaults (shared by all three services)
// ---------------------------------------------------------------------------

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// Validation boundaries
// ---------------------------------------------------------------------------

/// Files above this size get a "large upload" warning.
pub const LARGE_FILE_WARNING_BYTES: u64 = 10 * 1024 * 1024;

pub const CONFIG_TIMEOUT_RANGE_MS: (f64, f64) = (1000.0, 300_000.0);
pub const CONFIG_RETRY_ATTEMPTS_RANGE: (f64, f64) = (1.0, 10.0);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
