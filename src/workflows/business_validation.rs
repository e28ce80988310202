// src/workflows/business_validation.rs
//! Scores a business idea category by category with the LLM.

use super::prompts::{PromptTemplates, RECOMMENDATIONS_TEMPLATE, VALIDATION_TEMPLATE};
use crate::api::CompletionOptions;
use crate::error::AppError;
use crate::formatting::FieldMap;
use crate::pipeline::{LanguageModel, PageStore};
use crate::types::NotionId;
use crate::validation::{validate_business_idea, BusinessIdea};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::sync::Arc;

const CATEGORY_MAX_TOKENS: u32 = 1000;
const CATEGORY_TEMPERATURE: f32 = 0.3;
const RECOMMENDATIONS_MAX_TOKENS: u32 = 800;
const RECOMMENDATIONS_TEMPERATURE: f32 = 0.5;

pub const DEGRADED_SCORE: f64 = 5.0;
pub const DEGRADED_SUMMARY: &str = "Unable to parse validation results";
const UNTITLED_IDEA: &str = "Untitled Idea";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCategory {
    MarketFit,
    Feasibility,
    Viability,
}

impl ValidationCategory {
    /// Evaluation order.
    pub const ALL: [ValidationCategory; 3] = [
        ValidationCategory::MarketFit,
        ValidationCategory::Feasibility,
        ValidationCategory::Viability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketFit => "market_fit",
            Self::Feasibility => "feasibility",
            Self::Viability => "viability",
        }
    }

    pub fn criteria(&self) -> &'static [&'static str] {
        match self {
            Self::MarketFit => &["target_audience", "problem_statement", "solution_fit"],
            Self::Feasibility => &["technical_requirements", "resource_needs", "timeline"],
            Self::Viability => &["revenue_model", "cost_structure", "competitive_advantage"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// A category assessment as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssessment {
    #[serde(default)]
    pub category_score: f64,
    #[serde(default)]
    pub criteria_scores: IndexMap<String, CriterionScore>,
    #[serde(default)]
    pub summary: String,
}

/// Outcome of one category call.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    Parsed(CategoryAssessment),
    /// The reply was not the requested JSON; scored neutrally.
    Degraded { raw_text: String },
}

impl Assessment {
    /// Reads a model reply, tolerating Markdown code fences and prose
    /// around the JSON object.
    pub fn from_reply(reply: &str) -> Self {
        match parse_category_json(reply) {
            Some(parsed) => Assessment::Parsed(parsed),
            None => {
                log::warn!("Failed to parse validation response; using neutral score");
                Assessment::Degraded {
                    raw_text: reply.to_string(),
                }
            }
        }
    }

    pub fn category_score(&self) -> f64 {
        match self {
            Assessment::Parsed(a) => a.category_score,
            Assessment::Degraded { .. } => DEGRADED_SCORE,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            Assessment::Parsed(a) => &a.summary,
            Assessment::Degraded { .. } => DEGRADED_SUMMARY,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Assessment::Degraded { .. })
    }
}

impl Serialize for Assessment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Assessment::Parsed(assessment) => assessment.serialize(serializer),
            Assessment::Degraded { raw_text } => {
                let mut state = serializer.serialize_struct("Assessment", 4)?;
                state.serialize_field("category_score", &DEGRADED_SCORE)?;
                state.serialize_field("criteria_scores", &IndexMap::<String, CriterionScore>::new())?;
                state.serialize_field("summary", DEGRADED_SUMMARY)?;
                state.serialize_field("error", raw_text)?;
                state.end()
            }
        }
    }
}

fn parse_category_json(reply: &str) -> Option<CategoryAssessment> {
    let trimmed = strip_code_fence(reply.trim());
    if let Ok(parsed) = serde_json::from_str(trimmed) {
        return Some(parsed);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Rounded mean of the category scores; 0 when there are none.
pub fn overall_score<'a>(assessments: impl IntoIterator<Item = &'a Assessment>) -> i64 {
    let scores: Vec<f64> = assessments
        .into_iter()
        .map(Assessment::category_score)
        .collect();
    if scores.is_empty() {
        return 0;
    }
    (scores.iter().sum::<f64>() / scores.len() as f64).round() as i64
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub idea: String,
    pub validation_results: IndexMap<String, Assessment>,
    pub overall_score: i64,
    pub recommendations: String,
    pub validated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Fields of the Notion page recording this report.
    pub fn to_fields(&self) -> Result<FieldMap, AppError> {
        let results = serde_json::to_string(&self.validation_results).map_err(|e| {
            AppError::InvalidInput(format!("Unserializable validation results: {}", e))
        })?;
        let mut fields = FieldMap::new();
        fields.insert("title".into(), format!("Validation: {}", self.idea).into());
        fields.insert("overall_score".into(), self.overall_score.into());
        fields.insert("validation_results".into(), results.into());
        fields.insert("recommendations".into(), self.recommendations.clone().into());
        fields.insert("status".into(), "Validated".into());
        fields.insert("validated_at".into(), self.validated_at.into());
        Ok(fields)
    }
}

pub struct BusinessValidationWorkflow {
    model: Arc<dyn LanguageModel>,
    pages: Option<Arc<dyn PageStore>>,
    templates: PromptTemplates,
}

impl BusinessValidationWorkflow {
    pub fn new(model: Arc<dyn LanguageModel>) -> Result<Self, AppError> {
        Ok(Self {
            model,
            pages: None,
            templates: PromptTemplates::load()?,
        })
    }

    pub fn with_page_store(mut self, pages: Arc<dyn PageStore>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Runs every category assessment, then asks for recommendations.
    ///
    /// Problems found by [`validate_business_idea`] are logged as warnings;
    /// the idea is assessed regardless, and an empty title is reported as
    /// "Untitled Idea".
    pub async fn validate(&self, idea: &BusinessIdea) -> Result<ValidationReport, AppError> {
        let input_check = validate_business_idea(idea);
        for problem in input_check.errors().iter().chain(input_check.warnings()) {
            log::warn!("Business idea: {}", problem);
        }

        let mut results = IndexMap::new();
        for category in ValidationCategory::ALL {
            log::info!("Assessing {}", category.as_str());
            let assessment = self.assess_category(idea, category).await?;
            results.insert(category.as_str().to_string(), assessment);
        }

        let overall = overall_score(results.values());
        let recommendations = self.recommendations(idea, &results).await?;

        Ok(ValidationReport {
            idea: display_title(idea).to_string(),
            validation_results: results,
            overall_score: overall,
            recommendations,
            validated_at: Utc::now(),
        })
    }

    pub async fn assess_category(
        &self,
        idea: &BusinessIdea,
        category: ValidationCategory,
    ) -> Result<Assessment, AppError> {
        let prompt = self.validation_prompt(idea, category)?;
        let reply = self
            .model
            .complete(
                &prompt,
                &CompletionOptions::new(CATEGORY_MAX_TOKENS, CATEGORY_TEMPERATURE),
            )
            .await?;
        Ok(Assessment::from_reply(&reply))
    }

    fn validation_prompt(
        &self,
        idea: &BusinessIdea,
        category: ValidationCategory,
    ) -> Result<String, AppError> {
        let subject = if idea.description.is_empty() {
            &idea.title
        } else {
            &idea.description
        };
        let context = serde_json::to_string_pretty(idea)
            .map_err(|e| AppError::InvalidInput(format!("Unserializable idea: {}", e)))?;
        self.templates.render(
            VALIDATION_TEMPLATE,
            &json!({
                "category": category.as_str(),
                "subject": subject,
                "context": context,
                "criteria": category.criteria().join(", "),
            }),
        )
    }

    async fn recommendations(
        &self,
        idea: &BusinessIdea,
        results: &IndexMap<String, Assessment>,
    ) -> Result<String, AppError> {
        let results = serde_json::to_string_pretty(results).map_err(|e| {
            AppError::InvalidInput(format!("Unserializable validation results: {}", e))
        })?;
        let title = if idea.title.is_empty() {
            "Untitled"
        } else {
            &idea.title
        };
        let prompt = self.templates.render(
            RECOMMENDATIONS_TEMPLATE,
            &json!({ "title": title, "results": results }),
        )?;
        self.model
            .complete(
                &prompt,
                &CompletionOptions::new(RECOMMENDATIONS_MAX_TOKENS, RECOMMENDATIONS_TEMPERATURE),
            )
            .await
    }

    /// Records the report as a page in `database_id`.
    pub async fn save_to_notion(
        &self,
        report: &ValidationReport,
        database_id: &NotionId,
    ) -> Result<Value, AppError> {
        let pages = self.pages.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no Notion page store configured".to_string())
        })?;
        let page = pages.create_page(database_id, &report.to_fields()?).await?;
        log::info!("Saved validation report for '{}' to Notion", report.idea);
        Ok(page)
    }
}

fn display_title(idea: &BusinessIdea) -> &str {
    if idea.title.is_empty() {
        UNTITLED_IDEA
    } else {
        &idea.title
    }
}
