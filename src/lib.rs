// src/lib.rs
//! content-relay library: retrying clients for Anthropic, Notion and Google
//! Drive, and workflows that chain them.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `ValidationError`, `Service`
//! - **Configuration**: `ApiConfig`, `AnthropicConfig`, `NotionConfig`, `DriveConfig`
//! - **Retry**: `RetryPolicy`, `retry_with_backoff`
//! - **API clients**: `AnthropicClient`, `NotionClient`, `DriveClient`, `HttpExecutor`
//! - **Formatting**: `to_external_schema`, `FieldValue`, block builders
//! - **Validation**: predicates, composite validators, `Validator`
//! - **Workflows**: business validation, content generation, file management

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod filesystem;
pub mod formatting;
pub mod pipeline;
pub mod types;
pub mod validation;
pub mod workflows;

// --- Error Handling ---
pub use crate::error::{AppError, Result, Service};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{AnthropicConfig, ApiConfig, DriveConfig, NotionConfig, WorkflowConfig};

// --- Retry ---
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};

// --- Domain Types ---
pub use crate::types::{ApiKey, NotionId, ValidatedUrl};

// --- API Clients ---
pub use crate::api::{
    AnthropicClient, ApiResponse, CompletionOptions, DriveClient, HttpExecutor, NotionClient,
};

// --- Formatting ---
pub use crate::formatting::{
    content_blocks, heading_block, list_blocks, text_block, to_external_schema, Block, FieldMap,
    FieldValue, FormattedProperties, PropertyValue,
};

// --- Validation ---
pub use crate::validation::{ValidationResult, Validator};

// --- Capability Traits ---
pub use crate::pipeline::{FileStore, LanguageModel, PageStore};
