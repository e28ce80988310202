// src/workflows/prompts.rs
//! Handlebars prompt templates compiled into the binary.

use crate::error::AppError;
use handlebars::Handlebars;
use serde::Serialize;

pub const VALIDATION_TEMPLATE: &str = "validation";
pub const RECOMMENDATIONS_TEMPLATE: &str = "recommendations";

const EMBEDDED: &[(&str, &str)] = &[
    (
        VALIDATION_TEMPLATE,
        include_str!("../../templates/validation.hbs"),
    ),
    (
        RECOMMENDATIONS_TEMPLATE,
        include_str!("../../templates/recommendations.hbs"),
    ),
];

/// Registry of the embedded prompt templates.
///
/// Strict mode is on, so a template referencing a missing field fails to
/// render instead of producing an empty string. Output is not HTML-escaped.
pub struct PromptTemplates {
    registry: Handlebars<'static>,
}

impl PromptTemplates {
    pub fn load() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        for (name, source) in EMBEDDED {
            registry
                .register_template_string(name, source)
                .map_err(|e| AppError::Template {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, AppError> {
        Ok(self.registry.render(name, data)?)
    }
}
