//! A single filter condition and its predicate fragment

use super::error::ConditionError;
use crate::config::compile_time::conditions::{MAX_FRAGMENT_LENGTH, MAX_SELECTION_VALUES};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Value held by a condition; `Empty` and blank values are inactive
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionValue {
    #[default]
    Empty,
    Selection {
        #[serde(default)]
        values: Vec<String>,
    },
    Text {
        #[serde(default)]
        value: String,
    },
    NumberRange {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    DateRange {
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
    Checkbox {
        #[serde(default)]
        checked: bool,
    },
}

impl ConditionValue {
    /// Whether the condition currently holds a user-supplied value
    pub fn is_active(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Selection { values } => values.iter().any(|v| !v.trim().is_empty()),
            Self::Text { value } => !value.trim().is_empty(),
            Self::NumberRange { min, max } => {
                min.is_some_and(f64::is_finite) || max.is_some_and(f64::is_finite)
            }
            Self::DateRange { from, to } => from.is_some() || to.is_some(),
            Self::Checkbox { checked } => *checked,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Selection { .. } => "selection",
            Self::Text { .. } => "text",
            Self::NumberRange { .. } => "number_range",
            Self::DateRange { .. } => "date_range",
            Self::Checkbox { .. } => "checkbox",
        }
    }
}

/// One row of the condition list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// Queryable field path, e.g. `City` or `Owner.Region`
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: ConditionValue,
}

fn field_name_pattern() -> &'static Regex {
    static FIELD: OnceLock<Regex> = OnceLock::new();
    FIELD.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)*$")
            .expect("field name pattern is a valid regex")
    })
}

/// Field names are interpolated into predicate text, so only plain paths pass
pub fn is_valid_field_name(name: &str) -> bool {
    field_name_pattern().is_match(name)
}

/// Quote a string literal, escaping backslashes and single quotes
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\\' || ch == '\'' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

/// LIKE literal matching `value` anywhere; wildcards in user text match literally
fn like_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 4);
    quoted.push_str("'%");
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'' | '%' | '_') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push_str("%'");
    quoted
}

/// Integral values render without a fractional part (`100`, not `100.0`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn range_fragment(field: &str, lower: Option<String>, upper: Option<String>) -> Option<String> {
    match (lower, upper) {
        (Some(lower), Some(upper)) => Some(format!(
            "{field} >= {lower} AND {field} <= {upper}"
        )),
        (Some(lower), None) => Some(format!("{} >= {}", field, lower)),
        (None, Some(upper)) => Some(format!("{} <= {}", field, upper)),
        (None, None) => None,
    }
}

impl Condition {
    pub fn new(field: &str, value: ConditionValue) -> Self {
        Self {
            field: field.to_string(),
            label: None,
            value,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn is_active(&self) -> bool {
        self.value.is_active()
    }

    /// Display name: the label when present, otherwise the field
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }

    /// Predicate fragment for an active condition; `None` when inactive
    pub fn fragment(&self) -> Result<Option<String>, ConditionError> {
        if !self.is_active() {
            return Ok(None);
        }

        let field = self.field.trim();
        if !is_valid_field_name(field) {
            return Err(ConditionError::InvalidFieldName {
                field: self.field.clone(),
            });
        }

        let fragment = match &self.value {
            ConditionValue::Empty => None,
            ConditionValue::Selection { values } => {
                let values: Vec<&str> = values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .collect();
                if values.len() > MAX_SELECTION_VALUES {
                    return Err(ConditionError::TooManySelectionValues {
                        field: field.to_string(),
                        count: values.len(),
                    });
                }
                match values.as_slice() {
                    [] => None,
                    [single] => Some(format!("{} = {}", field, quote_literal(single))),
                    many => {
                        let quoted: Vec<String> = many.iter().map(|v| quote_literal(v)).collect();
                        Some(format!("{} IN ({})", field, quoted.join(", ")))
                    }
                }
            }
            ConditionValue::Text { value } => {
                Some(format!("{} LIKE {}", field, like_literal(value.trim())))
            }
            ConditionValue::NumberRange { min, max } => {
                let min = min.filter(|v| v.is_finite());
                let max = max.filter(|v| v.is_finite());
                if let (Some(lower), Some(upper)) = (min, max) {
                    if lower > upper {
                        return Err(ConditionError::InvertedRange {
                            field: field.to_string(),
                            from: format_number(lower),
                            to: format_number(upper),
                        });
                    }
                }
                range_fragment(field, min.map(format_number), max.map(format_number))
            }
            ConditionValue::DateRange { from, to } => {
                if let (Some(lower), Some(upper)) = (from, to) {
                    if lower > upper {
                        return Err(ConditionError::InvertedRange {
                            field: field.to_string(),
                            from: lower.to_string(),
                            to: upper.to_string(),
                        });
                    }
                }
                range_fragment(
                    field,
                    from.map(|d| d.format("%Y-%m-%d").to_string()),
                    to.map(|d| d.format("%Y-%m-%d").to_string()),
                )
            }
            ConditionValue::Checkbox { checked } => {
                checked.then(|| format!("{} = true", field))
            }
        };

        if let Some(text) = &fragment {
            if text.len() > MAX_FRAGMENT_LENGTH {
                return Err(ConditionError::FragmentTooLong {
                    field: field.to_string(),
                    length: text.len(),
                });
            }
        }

        Ok(fragment)
    }
}
