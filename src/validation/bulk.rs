// src/validation/bulk.rs
//! Schema-driven validation of loosely typed records.

use super::predicates::*;
use super::ValidationResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A caller-registered rule: receives the field value and the rule's params.
pub type CustomRule = Box<dyn Fn(&Value, &[Value]) -> bool + Send + Sync>;

/// One rule applied to one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "type")]
    pub rule: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleSpec {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            ..Default::default()
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Field name to the rules checked against it, in order.
pub type ValidationSchema = IndexMap<String, Vec<RuleSpec>>;

/// Per-field results of a bulk run, in schema order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkValidationReport {
    pub results: IndexMap<String, ValidationResult>,
}

impl BulkValidationReport {
    pub fn is_valid(&self) -> bool {
        self.results.values().all(ValidationResult::is_valid)
    }

    pub fn field(&self, name: &str) -> Option<&ValidationResult> {
        self.results.get(name)
    }
}

/// Runs schemas against JSON records, with optional caller-registered rules.
#[derive(Default)]
pub struct Validator {
    custom_rules: HashMap<String, CustomRule>,
}

enum RuleOutcome {
    Passed,
    Failed,
    Unknown,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rule` under `name`. A later registration replaces an earlier one.
    pub fn add_rule<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.custom_rules.insert(name.into(), Box::new(rule));
    }

    /// Applies `schema` to `data`.
    ///
    /// Non-`required` rules are skipped when the field is absent, null or "".
    /// A rule type that is neither built in nor registered yields a warning.
    pub fn validate_bulk(&self, data: &Value, schema: &ValidationSchema) -> BulkValidationReport {
        let mut report = BulkValidationReport::default();

        for (field, rules) in schema {
            let value = data.get(field);
            let mut result = ValidationResult::new();

            for rule in rules {
                if !rule.required && !is_required(value) {
                    continue;
                }
                let value = value.unwrap_or(&Value::Null);
                match self.apply(value, rule) {
                    RuleOutcome::Passed => {}
                    RuleOutcome::Failed => result.error(rule.message.clone().unwrap_or_else(
                        || format!("{} validation failed for rule: {}", field, rule.rule),
                    )),
                    RuleOutcome::Unknown => {
                        log::warn!("Unknown validation rule '{}' on field '{}'", rule.rule, field);
                        result.warning(format!("Unknown validation rule: {}", rule.rule));
                    }
                }
            }

            report.results.insert(field.clone(), result);
        }

        report
    }

    fn apply(&self, value: &Value, spec: &RuleSpec) -> RuleOutcome {
        let params = spec.params.as_slice();
        let text = value.as_str();
        let passed = match spec.rule.as_str() {
            "required" => is_required(Some(value)),
            "email" => text.is_some_and(is_valid_email),
            "url" => text.is_some_and(is_valid_url),
            "phone" => text.is_some_and(is_valid_phone),
            "date" => text.is_some_and(is_valid_date),
            "future_date" => text.is_some_and(is_future_date),
            "past_date" => text.is_some_and(is_past_date),
            "json" => match value {
                Value::String(s) => is_valid_json(s),
                _ => true,
            },
            "length" => {
                let min = usize_param(params, 0).unwrap_or(0);
                let max = usize_param(params, 1).unwrap_or(usize::MAX);
                text.is_some_and(|s| is_valid_length(s, min, max))
            }
            "range" => {
                let min = params.first().and_then(as_number).unwrap_or(f64::NEG_INFINITY);
                let max = params.get(1).and_then(as_number).unwrap_or(f64::INFINITY);
                as_number(value).is_some_and(|n| is_in_range(n, min, max))
            }
            "api_key" => {
                let expected = usize_param(params, 0);
                text.is_some_and(|s| is_valid_api_key(s, expected))
            }
            "custom" => {
                let Some(name) = params.first().and_then(Value::as_str) else {
                    return RuleOutcome::Unknown;
                };
                match self.custom_rules.get(name) {
                    Some(rule) => rule(value, &params[1..]),
                    None => return RuleOutcome::Unknown,
                }
            }
            other => match self.custom_rules.get(other) {
                Some(rule) => rule(value, params),
                None => return RuleOutcome::Unknown,
            },
        };

        if passed {
            RuleOutcome::Passed
        } else {
            RuleOutcome::Failed
        }
    }
}

fn usize_param(params: &[Value], index: usize) -> Option<usize> {
    params
        .get(index)
        .and_then(as_number)
        .filter(|n| *n >= 0.0)
        .map(|n| n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema(entries: Vec<(&str, Vec<RuleSpec>)>) -> ValidationSchema {
        entries
            .into_iter()
            .map(|(field, rules)| (field.to_string(), rules))
            .collect()
    }

    #[test]
    fn required_field_missing_fails() {
        let schema = schema(vec![(
            "email",
            vec![RuleSpec::new("required").required(), RuleSpec::new("email")],
        )]);
        let report = Validator::new().validate_bulk(&json!({}), &schema);
        assert!(!report.is_valid());
        assert_eq!(
            report.field("email").unwrap().errors(),
            ["email validation failed for rule: required"]
        );
    }

    #[test]
    fn optional_rules_skip_absent_values() {
        let schema = schema(vec![("website", vec![RuleSpec::new("url")])]);
        let validator = Validator::new();
        assert!(validator.validate_bulk(&json!({}), &schema).is_valid());
        assert!(validator
            .validate_bulk(&json!({ "website": "" }), &schema)
            .is_valid());
        assert!(!validator
            .validate_bulk(&json!({ "website": "nope" }), &schema)
            .is_valid());
    }

    #[test]
    fn optional_email_and_length_rules_accept_blank_values() {
        let schema = schema(vec![(
            "contact_email",
            vec![
                RuleSpec::new("email"),
                RuleSpec::new("length").with_params(vec![json!(5), json!(10)]),
            ],
        )]);
        let validator = Validator::new();
        for data in [json!({}), json!({ "contact_email": "" }), json!({ "contact_email": null })] {
            let report = validator.validate_bulk(&data, &schema);
            let field = report.field("contact_email").unwrap();
            assert!(field.errors().is_empty(), "{:?} -> {:?}", data, field.errors());
        }

        let report = validator.validate_bulk(&json!({ "contact_email": "abc" }), &schema);
        assert_eq!(
            report.field("contact_email").unwrap().errors(),
            [
                "contact_email validation failed for rule: email",
                "contact_email validation failed for rule: length"
            ]
        );
    }

    #[test]
    fn parameterized_rules_and_custom_messages() {
        let schema = schema(vec![
            (
                "name",
                vec![RuleSpec::new("length")
                    .with_params(vec![json!(3), json!(10)])
                    .with_message("Name must be 3 to 10 characters")],
            ),
            (
                "age",
                vec![RuleSpec::new("range").with_params(vec![json!(0), json!(130)])],
            ),
        ]);
        let report = Validator::new().validate_bulk(&json!({ "name": "Al", "age": "42" }), &schema);
        assert_eq!(
            report.field("name").unwrap().errors(),
            ["Name must be 3 to 10 characters"]
        );
        assert!(report.field("age").unwrap().is_valid());
    }

    #[test]
    fn registered_rules_by_name_and_through_custom() {
        let mut validator = Validator::new();
        validator.add_rule("even", |value, _| {
            value.as_i64().is_some_and(|n| n % 2 == 0)
        });
        validator.add_rule("multiple_of", |value, params| {
            match (value.as_i64(), params.first().and_then(Value::as_i64)) {
                (Some(n), Some(m)) if m != 0 => n % m == 0,
                _ => false,
            }
        });

        let schema = schema(vec![
            ("a", vec![RuleSpec::new("even")]),
            (
                "b",
                vec![RuleSpec::new("custom").with_params(vec![json!("multiple_of"), json!(5)])],
            ),
        ]);
        let report = validator.validate_bulk(&json!({ "a": 3, "b": 25 }), &schema);
        assert!(!report.field("a").unwrap().is_valid());
        assert!(report.field("b").unwrap().is_valid());
    }

    #[test]
    fn unknown_rules_warn_without_failing() {
        let schema = schema(vec![
            ("x", vec![RuleSpec::new("palindrome")]),
            ("y", vec![RuleSpec::new("custom").with_params(vec![json!("missing")])]),
        ]);
        let report = Validator::new().validate_bulk(&json!({ "x": "abc", "y": 1 }), &schema);
        assert!(report.is_valid());
        assert_eq!(
            report.field("x").unwrap().warnings(),
            ["Unknown validation rule: palindrome"]
        );
        assert_eq!(report.field("y").unwrap().warnings().len(), 1);
    }

    #[test]
    fn schema_deserializes_from_json() {
        let schema: ValidationSchema = serde_json::from_value(json!({
            "contact": [
                { "type": "required", "required": true },
                { "type": "phone" }
            ]
        }))
        .unwrap();
        let report =
            Validator::new().validate_bulk(&json!({ "contact": "+1 (555) 123-4567" }), &schema);
        assert!(report.is_valid());
        assert_eq!(report.results.len(), 1);
    }
}
