//! Custom logic expression validator
//!
//! Validates a user-typed boolean expression over 1-based condition indices
//! against the set of conditions that currently hold a value. Checks run in a
//! fixed order and only the first failure is reported:
//!
//! 1. blank expression (always valid, means "AND all active conditions")
//! 2. lexical stage: length, invalid characters, token count
//! 3. operator placement
//! 4. cross-reference of used indices against the active set
//! 5. parenthesis balance and nesting depth
//! 6. operand adjacency (`1 2`, `()`)
//!
//! Validation is pure: the caller decides where the returned error goes.

pub mod error;
pub mod grouping;
pub mod operators;
pub mod references;
pub mod types;

pub use error::{ErrorKind, ValidationError, ValidationResult};
pub use grouping::GroupingMetrics;
pub use types::{
    IndexBound, IndexSet, ValidatedExpression, ValidationContext, ValidationMode,
    ValidationOptions,
};

use crate::lexical::{self, normalize};
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};

/// Validate an expression against the current condition snapshot
pub fn validate(
    expression: &str,
    context: &ValidationContext,
    options: &ValidationOptions,
) -> ValidationResult<ValidatedExpression> {
    if expression.trim().is_empty() {
        return Ok(ValidatedExpression {
            normalized: normalize(expression),
            ..ValidatedExpression::default()
        });
    }

    // Lexical failures are logged by the analyzer
    let (normalized, tokens) = lexical::tokenize(expression)?;

    let result = run_checks(&tokens, context, options);
    match result {
        Ok((used, grouping)) => {
            log_debug!("Logic expression validated",
                "expression" => normalized.display.as_str(),
                "tokens" => tokens.len(),
                "used" => used.len(),
                "max_depth" => grouping.max_depth
            );
            Ok(ValidatedExpression {
                normalized,
                tokens,
                used,
            })
        }
        Err(error) => {
            let message = error.to_string();
            match error.span() {
                Some(span) => log_error!(error.error_code(), &message,
                    span = span,
                    "kind" => error.kind()
                ),
                None => log_error!(error.error_code(), &message,
                    "kind" => error.kind()
                ),
            }
            Err(error)
        }
    }
}

fn run_checks(
    tokens: &crate::tokens::TokenStream,
    context: &ValidationContext,
    options: &ValidationOptions,
) -> ValidationResult<(IndexSet, GroupingMetrics)> {
    operators::check_operator_placement(tokens)?;

    let used = references::collect_used(tokens);
    references::check_references(&used, context, options)
        .map_err(|error| references::with_typed_numbers(error, tokens))?;

    let grouping = grouping::check_parentheses(tokens)?;
    operators::check_operand_adjacency(tokens)?;

    if used != context.active {
        return Err(ValidationError::internal_error(
            "referenced indices differ from the active set after all checks passed",
        ));
    }

    Ok((used, grouping))
}

/// The `error | null` contract: `None` when the expression is valid
pub fn check(
    expression: &str,
    context: &ValidationContext,
    options: &ValidationOptions,
) -> Option<ValidationError> {
    validate(expression, context, options).err()
}

/// Expression used when custom logic is first enabled: active indices joined with AND
pub fn default_logic(active: &IndexSet) -> String {
    active
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Validate that every validation error code has registry metadata
pub fn init_validation_logging() -> Result<(), String> {
    let test_codes = [
        codes::validation::OPERATOR_AT_BOUNDARY,
        codes::validation::CONSECUTIVE_OPERATORS,
        codes::validation::MISSING_REQUIRED_INDEX,
        codes::validation::INDEX_WITHOUT_VALUE,
        codes::validation::INDICES_WITHOUT_ACTIVE_FILTERS,
        codes::validation::INDEX_OUT_OF_RANGE,
        codes::validation::UNMATCHED_CLOSING_PAREN,
        codes::validation::UNMATCHED_OPENING_PAREN,
        codes::validation::MISSING_OPERATOR,
        codes::validation::EMPTY_GROUP,
        codes::validation::NESTING_TOO_DEEP,
    ];

    for code in &test_codes {
        let description = codes::get_description(code.as_str());
        if description == "Unknown error" {
            return Err(format!(
                "Validation error code {} not properly configured",
                code.as_str()
            ));
        }
    }

    log_success!(
        codes::success::VALIDATION_PASSED,
        "Validation error codes verified",
        "codes" => test_codes.len()
    );
    Ok(())
}
