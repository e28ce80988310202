// src/validation/composite.rs
//! Fixed rule sets for the entities the workflows handle.

use super::predicates::*;
use super::ValidationResult;
use crate::constants::{
    CONFIG_RETRY_ATTEMPTS_RANGE, CONFIG_TIMEOUT_RANGE_MS, LARGE_FILE_WARNING_BYTES,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A business idea as submitted for validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessIdea {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// A piece of written content before publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Name and size of a file about to be uploaded or moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
}

pub fn validate_business_idea(idea: &BusinessIdea) -> ValidationResult {
    let mut result = ValidationResult::new();

    if idea.title.is_empty() {
        result.error("Business idea title is required");
    }
    if idea.description.is_empty() {
        result.error("Business idea description is required");
    }

    if !idea.title.is_empty() && !is_valid_length(&idea.title, 5, 100) {
        result.error("Title must be between 5 and 100 characters");
    }
    if !idea.description.is_empty() && !is_valid_length(&idea.description, 20, 1000) {
        result.error("Description must be between 20 and 1000 characters");
    }

    if let Some(audience) = non_empty(&idea.target_audience) {
        if !is_valid_length(audience, 5, 200) {
            result.warning("Target audience description should be between 5 and 200 characters");
        }
    }

    if let Some(revenue) = idea.estimated_revenue {
        if !is_in_range(revenue, 0.0, f64::INFINITY) {
            result.error("Estimated revenue must be a positive number");
        }
    }

    if let Some(timeline) = non_empty(&idea.timeline) {
        if !is_valid_length(timeline, 5, 100) {
            result.warning("Timeline should be between 5 and 100 characters");
        }
    }

    result
}

pub fn validate_content(content: &ContentDraft) -> ValidationResult {
    let mut result = ValidationResult::new();

    if content.title.is_empty() {
        result.error("Content title is required");
    }
    if content.body.is_empty() {
        result.error("Content body is required");
    }

    if !content.title.is_empty() && !is_valid_length(&content.title, 5, 200) {
        result.error("Title must be between 5 and 200 characters");
    }
    if !content.body.is_empty() && !is_valid_length(&content.body, 50, usize::MAX) {
        result.warning("Content body seems short (less than 50 characters)");
    }

    for (index, tag) in content.tags.iter().enumerate() {
        if !is_valid_length(tag, 2, 30) {
            result.warning(format!(
                "Tag {} should be between 2 and 30 characters",
                index + 1
            ));
        }
    }

    result
}

/// Checks a loosely typed settings object (`apiKey`, `baseUrl`, `timeout`, ...).
pub fn validate_api_config(config: &Value, required_fields: &[&str]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for field in required_fields {
        if !is_required(config.get(*field)) {
            result.error(format!("{} is required", field));
        }
    }

    for (field, message) in [
        ("apiKey", "API key format is invalid"),
        ("anthropicApiKey", "Anthropic API key format is invalid"),
    ] {
        if let Some(value) = present(config, field) {
            if !value.as_str().is_some_and(|key| is_valid_api_key(key, None)) {
                result.error(message);
            }
        }
    }

    for (field, message) in [
        ("baseUrl", "Base URL is invalid"),
        ("webhookUrl", "Webhook URL is invalid"),
    ] {
        if let Some(value) = present(config, field) {
            if !value.as_str().is_some_and(is_valid_url) {
                result.error(message);
            }
        }
    }

    let (min_timeout, max_timeout) = CONFIG_TIMEOUT_RANGE_MS;
    if let Some(value) = present(config, "timeout") {
        if !as_number(value).is_some_and(|t| is_in_range(t, min_timeout, max_timeout)) {
            result.warning("Timeout should be between 1000ms and 300000ms");
        }
    }

    let (min_attempts, max_attempts) = CONFIG_RETRY_ATTEMPTS_RANGE;
    if let Some(value) = present(config, "retryAttempts") {
        if !as_number(value).is_some_and(|n| is_in_range(n, min_attempts, max_attempts)) {
            result.warning("Retry attempts should be between 1 and 10");
        }
    }

    result
}

/// Checks a file's extension against an allow-list and its size against a limit.
///
/// An empty allow-list accepts every extension.
pub fn validate_file(
    file: &FileCandidate,
    allowed_extensions: &[&str],
    max_size_bytes: Option<u64>,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if file.name.is_empty() {
        result.error("File name is required");
        return result;
    }

    if !allowed_extensions.is_empty() {
        let extension = file
            .name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let dotted = format!(".{}", extension);
        if !allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&dotted))
        {
            result.error(format!(
                "File type {} is not allowed. Allowed types: {}",
                dotted,
                allowed_extensions.join(", ")
            ));
        }
    }

    if let Some(max) = max_size_bytes {
        if file.size > max {
            result.error(format!(
                "File size ({} bytes) exceeds maximum allowed size ({} bytes)",
                file.size, max
            ));
        }
    }

    if file.size > LARGE_FILE_WARNING_BYTES {
        result.warning("Large file detected - upload may take longer");
    }

    result
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// The field's value when it is set to something other than null or "".
fn present<'a>(config: &'a Value, field: &str) -> Option<&'a Value> {
    config.get(field).filter(|v| is_required(Some(v)))
}
