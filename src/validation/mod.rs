// src/validation/mod.rs
//! Field-level and schema-driven validation.
//!
//! Validation outcomes are data, not errors: every validator returns a
//! [`ValidationResult`] listing what is wrong (errors) and what looks
//! suspicious (warnings).

pub mod bulk;
pub mod composite;
pub mod predicates;

pub use bulk::{BulkValidationReport, RuleSpec, ValidationSchema, Validator};
pub use composite::{
    validate_api_config, validate_business_idea, validate_content, validate_file, BusinessIdea,
    ContentDraft, FileCandidate,
};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Errors and warnings collected by a validator.
///
/// Validity is derived from the error list, so a result with warnings only
/// is still valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_affect_validity() {
        let mut result = ValidationResult::new();
        result.warning("looks short");
        assert!(result.is_valid());
        result.error("missing title");
        assert!(!result.is_valid());
        assert_eq!(result.errors(), ["missing title"]);
        assert_eq!(result.warnings(), ["looks short"]);
    }

    #[test]
    fn serializes_derived_flag() {
        let mut result = ValidationResult::new();
        result.error("bad");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["errors"][0], "bad");
    }
}
