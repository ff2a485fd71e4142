//! Errors raised while turning conditions into predicate fragments

use crate::config::compile_time::conditions::{
    MAX_CONDITIONS, MAX_FRAGMENT_LENGTH, MAX_SELECTION_VALUES,
};
use crate::logging::codes;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("Invalid field name '{field}'")]
    InvalidFieldName { field: String },

    #[error("Too many conditions: {count} (max {MAX_CONDITIONS})")]
    TooManyConditions { count: usize },

    #[error("Too many values selected for {field}: {count} (max {MAX_SELECTION_VALUES})")]
    TooManySelectionValues { field: String, count: usize },

    #[error("Range for {field} starts after it ends ({from} > {to})")]
    InvertedRange {
        field: String,
        from: String,
        to: String,
    },

    #[error("Predicate for {field} is too long: {length} characters (max {MAX_FRAGMENT_LENGTH})")]
    FragmentTooLong { field: String, length: usize },
}

impl ConditionError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::InvalidFieldName { .. } => codes::conditions::INVALID_FIELD_NAME,
            Self::TooManyConditions { .. } => codes::conditions::TOO_MANY_CONDITIONS,
            Self::TooManySelectionValues { .. } => codes::conditions::TOO_MANY_SELECTION_VALUES,
            Self::InvertedRange { .. } => codes::conditions::INVERTED_RANGE,
            Self::FragmentTooLong { .. } => codes::conditions::FRAGMENT_TOO_LONG,
        }
    }

    /// Name of the offending field, when the error concerns one condition
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidFieldName { field }
            | Self::TooManySelectionValues { field, .. }
            | Self::InvertedRange { field, .. }
            | Self::FragmentTooLong { field, .. } => Some(field),
            Self::TooManyConditions { .. } => None,
        }
    }
}
