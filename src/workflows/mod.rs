// src/workflows/mod.rs
//! Orchestrators chaining the LLM, Notion, Drive and the local filesystem.
//!
//! Each workflow receives its service clients as trait objects from
//! [`crate::pipeline`]; nothing here constructs a client.

pub mod business_validation;
pub mod content_generation;
pub mod file_management;
mod prompts;

pub use business_validation::{
    Assessment, BusinessValidationWorkflow, CategoryAssessment, ValidationCategory,
    ValidationReport,
};
pub use content_generation::{build_prompt, ContentGenerationWorkflow, GenerationContext};
pub use file_management::{
    categorize_files, FileCategory, FileManagementWorkflow, FileOutcome, OrganizationSummary,
    OutcomeStatus, SyncSummary, TargetLayout,
};
pub use prompts::PromptTemplates;
