// src/filesystem/mod.rs
//! Local filesystem access, split into planning and execution.
//!
//! Workflows describe what to do as an [`OperationPlan`]; [`execute_plan`]
//! is the only place that moves or writes files.

mod executor;
mod scan;
mod types;

pub use executor::execute_plan;
pub use scan::{extension_of, sanitize_filename, scan_folder};
pub use types::{
    CompletedOperation, ExecutionStats, FailedOperation, FileOperation, OperationPlan,
    OperationReport, ScannedFile,
};
