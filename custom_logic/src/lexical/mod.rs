//! Lexical analysis of custom logic expressions
//!
//! First stage of validation: length limit, whitespace normalization,
//! lexeme scan for invalid characters and the token-count limit.

pub mod analyzer;

use crate::config::compile_time::expression::{
    MAX_EXPRESSION_LENGTH, MAX_NESTING_DEPTH, MAX_TOKEN_COUNT,
};
use crate::tokens::TokenStream;

pub use analyzer::{normalize, LexerError, LexicalAnalyzer, LexicalMetrics, NormalizedExpression};

/// Tokenize an expression with a fresh analyzer
pub fn tokenize(expression: &str) -> Result<(NormalizedExpression, TokenStream), LexerError> {
    LexicalAnalyzer::new().tokenize(expression)
}

/// Validate that every lexical error code has registry metadata
pub fn validate_tokenization() -> Result<(), String> {
    let test_codes = [
        crate::logging::codes::lexical::INVALID_CHARACTERS,
        crate::logging::codes::lexical::EXPRESSION_TOO_LONG,
        crate::logging::codes::lexical::TOO_MANY_TOKENS,
        crate::logging::codes::success::TOKENIZATION_COMPLETE,
    ];

    for code in &test_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_EXPRESSION_LENGTH == 0 || MAX_TOKEN_COUNT == 0 {
        return Err("Expression limits cannot be zero".to_string());
    }

    Ok(())
}

/// Compile-time expression limits (for reporting)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionLimits {
    pub max_expression_length: usize,
    pub max_token_count: usize,
    pub max_nesting_depth: usize,
}

pub fn get_expression_limits() -> ExpressionLimits {
    ExpressionLimits {
        max_expression_length: MAX_EXPRESSION_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        max_nesting_depth: MAX_NESTING_DEPTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tokenization() {
        assert!(validate_tokenization().is_ok());
    }

    #[test]
    fn test_module_tokenize() {
        let (normalized, stream) = tokenize("1 or 2").unwrap();
        assert_eq!(normalized.display, "1 or 2");
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_limits_report() {
        let limits = get_expression_limits();
        assert_eq!(limits.max_token_count, MAX_TOKEN_COUNT);
    }
}
