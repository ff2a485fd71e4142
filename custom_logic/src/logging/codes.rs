//! Consolidated error codes and classification system
//!
//! Single source of truth for all error and success codes emitted by the
//! engine, together with their behavioural metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTERS: Code = Code::new("E020");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E021");
    pub const TOO_MANY_TOKENS: Code = Code::new("E022");
}

/// Expression validation error codes
pub mod validation {
    use super::Code;

    pub const OPERATOR_AT_BOUNDARY: Code = Code::new("E030");
    pub const CONSECUTIVE_OPERATORS: Code = Code::new("E031");
    pub const MISSING_REQUIRED_INDEX: Code = Code::new("E032");
    pub const INDEX_WITHOUT_VALUE: Code = Code::new("E033");
    pub const INDICES_WITHOUT_ACTIVE_FILTERS: Code = Code::new("E034");
    pub const INDEX_OUT_OF_RANGE: Code = Code::new("E035");
    pub const UNMATCHED_CLOSING_PAREN: Code = Code::new("E036");
    pub const UNMATCHED_OPENING_PAREN: Code = Code::new("E037");
    pub const MISSING_OPERATOR: Code = Code::new("E038");
    pub const EMPTY_GROUP: Code = Code::new("E039");
    pub const NESTING_TOO_DEEP: Code = Code::new("E040");
}

/// Condition list error codes
pub mod conditions {
    use super::Code;

    pub const INVALID_FIELD_NAME: Code = Code::new("E050");
    pub const TOO_MANY_CONDITIONS: Code = Code::new("E051");
    pub const TOO_MANY_SELECTION_VALUES: Code = Code::new("E052");
    pub const INVERTED_RANGE: Code = Code::new("E053");
    pub const FRAGMENT_TOO_LONG: Code = Code::new("E054");
}

/// Substitution and session error codes
pub mod composition {
    use super::Code;

    pub const SUBSTITUTION_FAILED: Code = Code::new("E060");
    pub const APPLY_BLOCKED: Code = Code::new("E061");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const VALIDATION_PASSED: Code = Code::new("I030");
    pub const CONDITION_ANALYSIS_COMPLETE: Code = Code::new("I050");
    pub const SUBSTITUTION_COMPLETE: Code = Code::new("I060");
    pub const LOGIC_APPLIED: Code = Code::new("I061");
    pub const PIPELINE_COMPLETE: Code = Code::new("I080");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        "Error validating custom logic expression",
        "Report the expression and condition list that triggered the failure",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::Medium,
        true,
        "Expression contains characters other than numbers, AND, OR, parentheses and spaces",
        "Remove the unsupported characters",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        Severity::Medium,
        true,
        "Expression exceeds the maximum allowed length",
        "Shorten the expression",
    ),
    ErrorMetadata::new(
        "E022",
        "Lexical",
        Severity::Medium,
        true,
        "Expression contains too many tokens",
        "Simplify the expression",
    ),
    // Validation
    ErrorMetadata::new(
        "E030",
        "Validation",
        Severity::Low,
        true,
        "AND/OR placed at the start or end of the expression or a group",
        "Place AND/OR between two conditions",
    ),
    ErrorMetadata::new(
        "E031",
        "Validation",
        Severity::Low,
        true,
        "Two logical operators appear next to each other",
        "Remove the duplicated operator",
    ),
    ErrorMetadata::new(
        "E032",
        "Validation",
        Severity::Low,
        true,
        "An active condition is not referenced by the expression",
        "Reference every condition that has a value",
    ),
    ErrorMetadata::new(
        "E033",
        "Validation",
        Severity::Low,
        true,
        "The expression references a condition without a value",
        "Give the condition a value or remove it from the expression",
    ),
    ErrorMetadata::new(
        "E034",
        "Validation",
        Severity::Low,
        true,
        "The expression references conditions while none has a value",
        "Fill in at least one condition or clear the expression",
    ),
    ErrorMetadata::new(
        "E035",
        "Validation",
        Severity::Low,
        true,
        "The expression references a condition number that does not exist",
        "Use condition numbers shown next to each condition",
    ),
    ErrorMetadata::new(
        "E036",
        "Validation",
        Severity::Low,
        true,
        "Closing parenthesis without a matching opening parenthesis",
        "Remove the extra ')' or add the missing '('",
    ),
    ErrorMetadata::new(
        "E037",
        "Validation",
        Severity::Low,
        true,
        "Opening parenthesis is never closed",
        "Add the missing ')'",
    ),
    ErrorMetadata::new(
        "E038",
        "Validation",
        Severity::Low,
        true,
        "Two conditions or groups appear without an operator between them",
        "Insert AND or OR between them",
    ),
    ErrorMetadata::new(
        "E039",
        "Validation",
        Severity::Low,
        true,
        "Parentheses enclose nothing",
        "Remove the empty parentheses",
    ),
    ErrorMetadata::new(
        "E040",
        "Validation",
        Severity::Medium,
        true,
        "Parentheses are nested deeper than allowed",
        "Flatten the expression",
    ),
    // Conditions
    ErrorMetadata::new(
        "E050",
        "Conditions",
        Severity::High,
        false,
        "Field name is not a valid API name",
        "Use letters, digits and underscores, separated by '.' for relationships",
    ),
    ErrorMetadata::new(
        "E051",
        "Conditions",
        Severity::Medium,
        true,
        "Too many conditions in one list",
        "Remove conditions",
    ),
    ErrorMetadata::new(
        "E052",
        "Conditions",
        Severity::Medium,
        true,
        "Too many selected values for one condition",
        "Select fewer values",
    ),
    ErrorMetadata::new(
        "E053",
        "Conditions",
        Severity::Low,
        true,
        "Range lower bound is greater than its upper bound",
        "Swap or correct the range bounds",
    ),
    ErrorMetadata::new(
        "E054",
        "Conditions",
        Severity::Medium,
        true,
        "Condition fragment exceeds the maximum length",
        "Select fewer values or shorten the text",
    ),
    // Composition
    ErrorMetadata::new(
        "E060",
        "Composition",
        Severity::Medium,
        true,
        "Expression could not be substituted",
        "Validate the expression before substitution",
    ),
    ErrorMetadata::new(
        "E061",
        "Composition",
        Severity::Low,
        true,
        "Apply blocked while the custom logic has an error",
        "Fix the reported custom logic error",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "System",
        Severity::Low,
        true,
        "System initialization completed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I020",
        "Lexical",
        Severity::Low,
        true,
        "Tokenization completed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I030",
        "Validation",
        Severity::Low,
        true,
        "Custom logic validated",
        "No action required",
    ),
    ErrorMetadata::new(
        "I050",
        "Conditions",
        Severity::Low,
        true,
        "Condition list analysed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I060",
        "Composition",
        Severity::Low,
        true,
        "Predicate composed",
        "No action required",
    ),
    ErrorMetadata::new(
        "I061",
        "Composition",
        Severity::Low,
        true,
        "Custom logic applied",
        "No action required",
    ),
    ErrorMetadata::new(
        "I080",
        "Pipeline",
        Severity::Low,
        true,
        "Filter composition pipeline completed",
        "No action required",
    ),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for a code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
