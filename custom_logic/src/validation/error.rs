//! Error taxonomy for custom logic validation

use super::types::IndexSet;
use crate::lexical::LexerError;
use crate::logging::codes;
use crate::utils::Span;
use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Flat classification of validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCharacters,
    ExpressionTooLong,
    TooManyTokens,
    OperatorAtBoundary,
    ConsecutiveOperators,
    MissingRequiredIndex,
    IndexWithoutValue,
    IndicesWithoutActiveFilters,
    IndexOutOfRange,
    UnmatchedClosingParen,
    UnmatchedOpeningParen,
    MissingOperator,
    EmptyGroup,
    NestingTooDeep,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCharacters => "InvalidCharacters",
            Self::ExpressionTooLong => "ExpressionTooLong",
            Self::TooManyTokens => "TooManyTokens",
            Self::OperatorAtBoundary => "OperatorAtBoundary",
            Self::ConsecutiveOperators => "ConsecutiveOperators",
            Self::MissingRequiredIndex => "MissingRequiredIndex",
            Self::IndexWithoutValue => "IndexWithoutValue",
            Self::IndicesWithoutActiveFilters => "IndicesWithoutActiveFilters",
            Self::IndexOutOfRange => "IndexOutOfRange",
            Self::UnmatchedClosingParen => "UnmatchedClosingParen",
            Self::UnmatchedOpeningParen => "UnmatchedOpeningParen",
            Self::MissingOperator => "MissingOperator",
            Self::EmptyGroup => "EmptyGroup",
            Self::NestingTooDeep => "NestingTooDeep",
            Self::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single error reported for an invalid expression.
/// Display text is what the host shows next to the input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error("'{operator}' cannot appear at the start or end of the expression or of a group ({span})")]
    OperatorAtBoundary { operator: String, span: Span },

    #[error("'{first}' and '{second}' cannot appear next to each other ({span})")]
    ConsecutiveOperators {
        first: String,
        second: String,
        span: Span,
    },

    #[error("{}", missing_message(.missing, .without_value))]
    MissingRequiredIndex {
        missing: IndexSet,
        /// Referenced indices that hold no value, reported alongside
        without_value: IndexSet,
    },

    #[error("{} no value: {}", plural(.indices, "Condition has", "Conditions have"), format_indices(.indices))]
    IndexWithoutValue { indices: IndexSet },

    #[error("Logic references {} but no condition has a value", format_indices(.indices))]
    IndicesWithoutActiveFilters { indices: IndexSet },

    #[error("{}", out_of_range_message(.indices, .numbers, .max))]
    IndexOutOfRange {
        indices: IndexSet,
        max: u32,
        /// Decimal text of each offending number; indices clamp at u32::MAX
        numbers: Vec<String>,
    },

    #[error("Closing parenthesis without a matching '(' ({span})")]
    UnmatchedClosingParen { span: Span },

    #[error("{unclosed} opening parenthesis not closed ({span})")]
    UnmatchedOpeningParen { unclosed: usize, span: Span },

    #[error("Missing AND/OR before '{found}' ({span})")]
    MissingOperator { found: String, span: Span },

    #[error("Empty parentheses ({span})")]
    EmptyGroup { span: Span },

    #[error("Parentheses nested {depth} levels deep (max {max})")]
    NestingTooDeep { depth: usize, max: usize, span: Span },

    #[error("Internal validation error: {message}")]
    Internal { message: String },
}

fn format_indices(indices: &IndexSet) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(indices: &IndexSet, one: &'static str, many: &'static str) -> &'static str {
    if indices.len() == 1 {
        one
    } else {
        many
    }
}

fn out_of_range_message(indices: &IndexSet, numbers: &[String], max: &u32) -> String {
    let (count, listed) = if numbers.is_empty() {
        (indices.len(), format_indices(indices))
    } else {
        (numbers.len(), numbers.join(", "))
    };
    let subject = if count == 1 {
        "Condition number is"
    } else {
        "Condition numbers are"
    };
    format!("{subject} out of range: {listed} (valid range is 1 to {max})")
}

fn missing_message(missing: &IndexSet, without_value: &IndexSet) -> String {
    let mut message = format!(
        "{} not used in the logic: {}",
        plural(missing, "Condition is", "Conditions are"),
        format_indices(missing)
    );
    if !without_value.is_empty() {
        message.push_str(&format!(
            "; {} no value: {}",
            plural(without_value, "condition has", "conditions have"),
            format_indices(without_value)
        ));
    }
    message
}

impl ValidationError {
    /// Create internal error
    pub fn internal_error(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexical(LexerError::InvalidCharacters { .. }) => ErrorKind::InvalidCharacters,
            Self::Lexical(LexerError::ExpressionTooLong { .. }) => ErrorKind::ExpressionTooLong,
            Self::Lexical(LexerError::TooManyTokens { .. }) => ErrorKind::TooManyTokens,
            Self::OperatorAtBoundary { .. } => ErrorKind::OperatorAtBoundary,
            Self::ConsecutiveOperators { .. } => ErrorKind::ConsecutiveOperators,
            Self::MissingRequiredIndex { .. } => ErrorKind::MissingRequiredIndex,
            Self::IndexWithoutValue { .. } => ErrorKind::IndexWithoutValue,
            Self::IndicesWithoutActiveFilters { .. } => ErrorKind::IndicesWithoutActiveFilters,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::UnmatchedClosingParen { .. } => ErrorKind::UnmatchedClosingParen,
            Self::UnmatchedOpeningParen { .. } => ErrorKind::UnmatchedOpeningParen,
            Self::MissingOperator { .. } => ErrorKind::MissingOperator,
            Self::EmptyGroup { .. } => ErrorKind::EmptyGroup,
            Self::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get appropriate error code for logging system
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::Lexical(error) => error.error_code(),
            Self::OperatorAtBoundary { .. } => codes::validation::OPERATOR_AT_BOUNDARY,
            Self::ConsecutiveOperators { .. } => codes::validation::CONSECUTIVE_OPERATORS,
            Self::MissingRequiredIndex { .. } => codes::validation::MISSING_REQUIRED_INDEX,
            Self::IndexWithoutValue { .. } => codes::validation::INDEX_WITHOUT_VALUE,
            Self::IndicesWithoutActiveFilters { .. } => {
                codes::validation::INDICES_WITHOUT_ACTIVE_FILTERS
            }
            Self::IndexOutOfRange { .. } => codes::validation::INDEX_OUT_OF_RANGE,
            Self::UnmatchedClosingParen { .. } => codes::validation::UNMATCHED_CLOSING_PAREN,
            Self::UnmatchedOpeningParen { .. } => codes::validation::UNMATCHED_OPENING_PAREN,
            Self::MissingOperator { .. } => codes::validation::MISSING_OPERATOR,
            Self::EmptyGroup { .. } => codes::validation::EMPTY_GROUP,
            Self::NestingTooDeep { .. } => codes::validation::NESTING_TOO_DEEP,
            Self::Internal { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Get error span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexical(error) => error.span(),
            Self::OperatorAtBoundary { span, .. }
            | Self::ConsecutiveOperators { span, .. }
            | Self::UnmatchedClosingParen { span }
            | Self::UnmatchedOpeningParen { span, .. }
            | Self::MissingOperator { span, .. }
            | Self::EmptyGroup { span }
            | Self::NestingTooDeep { span, .. } => Some(*span),
            Self::MissingRequiredIndex { .. }
            | Self::IndexWithoutValue { .. }
            | Self::IndicesWithoutActiveFilters { .. }
            | Self::IndexOutOfRange { .. }
            | Self::Internal { .. } => None,
        }
    }

    /// Primary indices named by the error (missing, without value, or out of range)
    pub fn indices(&self) -> IndexSet {
        match self {
            Self::MissingRequiredIndex { missing, .. } => missing.clone(),
            Self::IndexWithoutValue { indices }
            | Self::IndicesWithoutActiveFilters { indices }
            | Self::IndexOutOfRange { indices, .. } => indices.clone(),
            _ => IndexSet::new(),
        }
    }

    /// Referenced indices without a value, including those carried by a missing-index error
    pub fn without_value_indices(&self) -> IndexSet {
        match self {
            Self::MissingRequiredIndex { without_value, .. } => without_value.clone(),
            Self::IndexWithoutValue { indices } => indices.clone(),
            _ => IndexSet::new(),
        }
    }

    /// Every rule failure is fixable by editing; only internal errors are not
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}
