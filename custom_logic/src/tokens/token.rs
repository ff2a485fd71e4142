//! Token set for custom logic expressions
//!
//! Expressions only contain condition indices, the two boolean keywords and
//! parentheses. Whitespace is a separator and never becomes a token.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// 1-based condition reference; values past `u32::MAX` saturate
    Index(u32),
    /// `AND` keyword (any casing)
    And,
    /// `OR` keyword (any casing)
    Or,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

/// Token classification used by the placement checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    /// Condition index
    Operand,
    /// Boolean keyword
    Operator,
    /// Parenthesis
    Grouping,
}

impl Token {
    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Index(_) => TokenClass::Operand,
            Self::And | Self::Or => TokenClass::Operator,
            Self::LeftParen | Self::RightParen => TokenClass::Grouping,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(index) => Some(*index),
            _ => None,
        }
    }

    /// Tokens that may close an operand: the left neighbour of an operator
    pub fn ends_operand(&self) -> bool {
        matches!(self, Self::Index(_) | Self::RightParen)
    }

    /// Tokens that may open an operand: the right neighbour of an operator
    pub fn starts_operand(&self) -> bool {
        matches!(self, Self::Index(_) | Self::LeftParen)
    }

    /// Canonical text (keywords uppercased)
    pub fn as_expression_string(&self) -> String {
        match self {
            Self::Index(index) => index.to_string(),
            Self::And => "AND".to_string(),
            Self::Or => "OR".to_string(),
            Self::LeftParen => "(".to_string(),
            Self::RightParen => ")".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_expression_string())
    }
}

/// Map a keyword lexeme to its token, ignoring case
pub fn classify_word(word: &str) -> Option<Token> {
    if word.eq_ignore_ascii_case("AND") {
        Some(Token::And)
    } else if word.eq_ignore_ascii_case("OR") {
        Some(Token::Or)
    } else {
        None
    }
}

/// Map a parenthesis character to its token
pub fn classify_symbol(symbol: char) -> Option<Token> {
    match symbol {
        '(' => Some(Token::LeftParen),
        ')' => Some(Token::RightParen),
        _ => None,
    }
}

/// Parse a run of ASCII digits, saturating at `u32::MAX`
pub fn parse_index(digits: &str) -> u32 {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word_ignores_case() {
        assert_eq!(classify_word("and"), Some(Token::And));
        assert_eq!(classify_word("Or"), Some(Token::Or));
        assert_eq!(classify_word("NOT"), None);
    }

    #[test]
    fn test_parse_index_saturates() {
        assert_eq!(parse_index("007"), 7);
        assert_eq!(parse_index("99999999999999"), u32::MAX);
    }

    #[test]
    fn test_neighbour_classes() {
        assert!(Token::RightParen.ends_operand());
        assert!(!Token::LeftParen.ends_operand());
        assert!(Token::LeftParen.starts_operand());
        assert_eq!(Token::Or.token_class(), TokenClass::Operator);
        assert_eq!(Token::Index(3).as_index(), Some(3));
    }
}
