//! Core lexical analyzer for custom logic expressions
//!
//! Normalizes whitespace, then scans the expression with a lexeme pattern.
//! Any character not covered by a lexeme is reported as invalid, so glued
//! input such as `(1AND2)` still splits into five tokens.

use crate::config::compile_time::expression::{MAX_EXPRESSION_LENGTH, MAX_TOKEN_COUNT};
use crate::logging::codes;
use crate::tokens::{classify_symbol, classify_word, parse_index, SpannedToken, Token, TokenStream};
use crate::utils::Span;
use crate::{log_error, log_success};
use regex::Regex;
use std::sync::OnceLock;

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Expression is too long: {length} characters (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize },

    #[error("Invalid character '{character}' at column {column}. Use only numbers, AND, OR and parentheses")]
    InvalidCharacters {
        character: char,
        column: usize,
        span: Span,
    },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::ExpressionTooLong { .. } => codes::lexical::EXPRESSION_TOO_LONG,
            LexerError::InvalidCharacters { .. } => codes::lexical::INVALID_CHARACTERS,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            LexerError::InvalidCharacters { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Whitespace-normalized forms of one expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedExpression {
    /// Exactly what the user typed
    pub original: String,
    /// Whitespace runs collapsed to one space, trimmed, original casing
    pub display: String,
    /// ASCII-uppercased `display`; byte offsets match `display`
    pub upper: String,
}

impl NormalizedExpression {
    pub fn is_blank(&self) -> bool {
        self.display.is_empty()
    }
}

/// Token counts gathered during one tokenization
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub index_tokens: usize,
    pub operator_tokens: usize,
    pub paren_tokens: usize,
    pub normalized_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token {
            Token::Index(_) => self.index_tokens += 1,
            Token::And | Token::Or => self.operator_tokens += 1,
            Token::LeftParen | Token::RightParen => self.paren_tokens += 1,
        }
    }
}

fn lexeme_pattern() -> &'static Regex {
    static LEXEME: OnceLock<Regex> = OnceLock::new();
    LEXEME.get_or_init(|| {
        Regex::new(r"(?i)[0-9]+|AND|OR|\(|\)|\s+").expect("lexeme pattern is a valid regex")
    })
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize(expression: &str) -> NormalizedExpression {
    let display = expression.split_whitespace().collect::<Vec<_>>().join(" ");
    let upper = display.to_ascii_uppercase();
    NormalizedExpression {
        original: expression.to_string(),
        display,
        upper,
    }
}

/// Lexical analyzer that keeps metrics for the last tokenization
#[derive(Debug, Default)]
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize an expression, failing on the first lexical violation
    pub fn tokenize(
        &mut self,
        expression: &str,
    ) -> Result<(NormalizedExpression, TokenStream), LexerError> {
        self.metrics = LexicalMetrics::default();

        let length = expression.chars().count();
        if length > MAX_EXPRESSION_LENGTH {
            let error = LexerError::ExpressionTooLong { length };
            log_error!(error.error_code(), "Expression length limit exceeded",
                "length" => length,
                "limit" => MAX_EXPRESSION_LENGTH
            );
            return Err(error);
        }

        let normalized = normalize(expression);
        self.metrics.normalized_length = normalized.display.len();
        if normalized.is_blank() {
            return Ok((normalized, TokenStream::default()));
        }

        let mut tokens = Vec::new();
        let mut cursor = 0;

        for lexeme in lexeme_pattern().find_iter(&normalized.upper) {
            if lexeme.start() > cursor {
                return Err(self.invalid_character(&normalized, cursor));
            }
            cursor = lexeme.end();

            let text = lexeme.as_str();
            if text.trim().is_empty() {
                continue;
            }

            let token = if text.as_bytes()[0].is_ascii_digit() {
                Token::Index(parse_index(text))
            } else if let Some(symbol) = text.chars().next().and_then(classify_symbol) {
                symbol
            } else if let Some(keyword) = classify_word(text) {
                keyword
            } else {
                return Err(self.invalid_character(&normalized, lexeme.start()));
            };

            let span = Span::new(lexeme.start(), lexeme.end());
            self.metrics.record_token(&token);
            tokens.push(SpannedToken::new(token, span, span.slice(&normalized.display)));

            if tokens.len() > MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len(),
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    span = span,
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }
        }

        if cursor < normalized.upper.len() {
            return Err(self.invalid_character(&normalized, cursor));
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Expression tokenized",
            "tokens" => self.metrics.total_tokens,
            "indices" => self.metrics.index_tokens,
            "operators" => self.metrics.operator_tokens
        );

        Ok((normalized, TokenStream::new(tokens)))
    }

    fn invalid_character(&self, normalized: &NormalizedExpression, offset: usize) -> LexerError {
        let character = normalized.display[offset..].chars().next().unwrap_or(' ');
        let span = Span::new(offset, offset + character.len_utf8());
        let column = normalized.display[..offset].chars().count() + 1;

        let error = LexerError::InvalidCharacters {
            character,
            column,
            span,
        };
        log_error!(error.error_code(), "Invalid character in expression",
            span = span,
            "character" => character
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(expression: &str) -> Vec<Token> {
        let (_, stream) = LexicalAnalyzer::new().tokenize(expression).unwrap();
        stream.iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let normalized = normalize("  1   and\t2 \n");
        assert_eq!(normalized.display, "1 and 2");
        assert_eq!(normalized.upper, "1 AND 2");
        assert_eq!(normalized.original, "  1   and\t2 \n");
    }

    #[test]
    fn test_glued_tokens_are_split() {
        assert_eq!(
            kinds("(1AND2)or 3"),
            vec![
                Token::LeftParen,
                Token::Index(1),
                Token::And,
                Token::Index(2),
                Token::RightParen,
                Token::Or,
                Token::Index(3),
            ]
        );
    }

    #[test]
    fn test_lexeme_keeps_original_casing() {
        let (normalized, stream) = LexicalAnalyzer::new().tokenize("1 aNd 2").unwrap();
        let keyword = stream.get(1).unwrap();
        assert_eq!(keyword.value, Token::And);
        assert_eq!(keyword.lexeme, "aNd");
        assert_eq!(keyword.span.slice(&normalized.display), "aNd");
    }

    #[test]
    fn test_blank_expression_is_empty_stream() {
        let (normalized, stream) = LexicalAnalyzer::new().tokenize("   ").unwrap();
        assert!(normalized.is_blank());
        assert!(stream.is_empty());
    }

    #[test]
    fn test_invalid_characters_report_first_offender() {
        let result = LexicalAnalyzer::new().tokenize("1 AND 2 & 3");
        assert_matches!(
            result,
            Err(LexerError::InvalidCharacters { character: '&', column: 9, .. })
        );

        let result = LexicalAnalyzer::new().tokenize("1 ORDER 2");
        assert_matches!(
            result,
            Err(LexerError::InvalidCharacters { character: 'D', .. })
        );

        let result = LexicalAnalyzer::new().tokenize("1 AND 2!");
        assert_matches!(
            result,
            Err(LexerError::InvalidCharacters { character: '!', column: 8, .. })
        );
    }

    #[test]
    fn test_non_ascii_digits_are_invalid() {
        let result = LexicalAnalyzer::new().tokenize("1 AND \u{0663}");
        assert_matches!(result, Err(LexerError::InvalidCharacters { column: 7, .. }));
    }

    #[test]
    fn test_expression_too_long() {
        let expression = "1 ".repeat(MAX_EXPRESSION_LENGTH);
        let result = LexicalAnalyzer::new().tokenize(&expression);
        assert_matches!(result, Err(LexerError::ExpressionTooLong { .. }));
    }

    #[test]
    fn test_too_many_tokens() {
        let expression = "(".repeat(MAX_TOKEN_COUNT + 1);
        if expression.len() <= MAX_EXPRESSION_LENGTH {
            let result = LexicalAnalyzer::new().tokenize(&expression);
            assert_matches!(result, Err(LexerError::TooManyTokens { .. }));
        }
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("(1 AND 2) OR 3").unwrap();
        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 7);
        assert_eq!(metrics.index_tokens, 3);
        assert_eq!(metrics.operator_tokens, 2);
        assert_eq!(metrics.paren_tokens, 2);
    }

    #[test]
    fn test_error_codes() {
        let error = LexerError::TooManyTokens { count: 5 };
        assert_eq!(error.error_code(), codes::lexical::TOO_MANY_TOKENS);
    }
}
