// src/formatting/properties.rs
//! Translation of plain key/value fields into Notion's typed property schema.
//!
//! Callers describe each field with an explicit [`FieldValue`] variant; the
//! formatter maps it onto the matching Notion property type. Values with no
//! Notion counterpart are reported back in [`FormattedProperties::unmapped`]
//! instead of being sent.

use super::rich_text::{rich_text_segments, RichText};
use chrono::{DateTime, NaiveDate, TimeZone};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// The key that is always rendered as the page title.
pub const TITLE_KEY: &str = "title";

/// A caller-supplied field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    List(Vec<String>),
    /// A value with no Notion property equivalent (null, nested objects, mixed arrays).
    Unsupported(Value),
}

/// Ordered field map, as accepted by [`to_external_schema`].
pub type FieldMap = IndexMap<String, FieldValue>;

impl FieldValue {
    /// Classifies an arbitrary JSON value.
    ///
    /// Arrays map to `List` only when every element is a string.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::Unsupported(Value::Number(n)),
            },
            Value::Array(items) if items.iter().all(Value::is_string) => FieldValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => FieldValue::Unsupported(other),
        }
    }

    /// Text rendering used when the field becomes a page title.
    fn as_title_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Date(d) => Some(iso_date(d)),
            FieldValue::List(items) => Some(items.join(", ")),
            FieldValue::Unsupported(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// Timestamps are truncated to their calendar date.
impl<Tz: TimeZone> From<DateTime<Tz>> for FieldValue {
    fn from(d: DateTime<Tz>) -> Self {
        FieldValue::Date(d.date_naive())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// A property value in Notion's wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Number { number: f64 },
    Checkbox { checkbox: bool },
    Date { date: DateStart },
    MultiSelect { multi_select: Vec<SelectOption> },
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Title { .. } => "title",
            PropertyValue::RichText { .. } => "rich_text",
            PropertyValue::Number { .. } => "number",
            PropertyValue::Checkbox { .. } => "checkbox",
            PropertyValue::Date { .. } => "date",
            PropertyValue::MultiSelect { .. } => "multi_select",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateStart {
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub name: String,
}

/// Outcome of formatting a field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedProperties {
    pub properties: IndexMap<String, PropertyValue>,
    /// Field names whose values had no Notion property equivalent.
    #[serde(skip)]
    pub unmapped: Vec<String>,
}

impl FormattedProperties {
    /// True when every input field produced a property.
    pub fn is_complete(&self) -> bool {
        self.unmapped.is_empty()
    }

    /// The `properties` object of a Notion page request.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.properties).unwrap_or(Value::Null)
    }
}

/// Converts fields into Notion properties.
///
/// The `title` key always becomes a title property; every other key maps by
/// its variant. `Unsupported` values are listed in `unmapped`.
pub fn to_external_schema(fields: &FieldMap) -> FormattedProperties {
    let mut formatted = FormattedProperties::default();

    for (key, value) in fields {
        match format_property(key, value) {
            Some(property) => {
                formatted.properties.insert(key.clone(), property);
            }
            None => formatted.unmapped.push(key.clone()),
        }
    }

    formatted
}

fn format_property(key: &str, value: &FieldValue) -> Option<PropertyValue> {
    if key == TITLE_KEY {
        return value.as_title_text().map(|text| PropertyValue::Title {
            title: rich_text_segments(&text),
        });
    }

    match value {
        FieldValue::Text(s) => Some(PropertyValue::RichText {
            rich_text: rich_text_segments(s),
        }),
        FieldValue::Number(n) => Some(PropertyValue::Number { number: *n }),
        FieldValue::Boolean(b) => Some(PropertyValue::Checkbox { checkbox: *b }),
        FieldValue::Date(d) => Some(PropertyValue::Date {
            date: DateStart { start: iso_date(d) },
        }),
        FieldValue::List(items) => Some(PropertyValue::MultiSelect {
            multi_select: items
                .iter()
                .map(|name| SelectOption { name: name.clone() })
                .collect(),
        }),
        FieldValue::Unsupported(_) => None,
    }
}

fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
