//! Token stream with neighbour access for the placement checks

use crate::tokens::token::Token;
use crate::utils::Span;
use std::collections::BTreeSet;

/// A token with its location and the lexeme as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub value: Token,
    pub span: Span,
    /// Original text including the user's casing (`and`, `007`)
    pub lexeme: String,
}

impl SpannedToken {
    pub fn new(value: Token, span: Span, lexeme: &str) -> Self {
        Self {
            value,
            span,
            lexeme: lexeme.to_string(),
        }
    }
}

/// Ordered, whitespace-free tokens of one expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&SpannedToken> {
        self.tokens.get(position)
    }

    /// Token immediately before `position`
    pub fn previous(&self, position: usize) -> Option<&SpannedToken> {
        position
            .checked_sub(1)
            .and_then(|prev| self.tokens.get(prev))
    }

    /// Token immediately after `position`
    pub fn next(&self, position: usize) -> Option<&SpannedToken> {
        self.tokens.get(position + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpannedToken> {
        self.tokens.iter()
    }

    /// Unique index values in ascending order
    pub fn indices(&self) -> BTreeSet<u32> {
        self.tokens.iter().filter_map(|t| t.value.as_index()).collect()
    }

    /// Canonical single-line rendering: keywords uppercased, no padding inside parentheses
    pub fn render(&self) -> String {
        render_tokens(self.tokens.iter().map(|t| t.value.as_expression_string()), |i| {
            self.tokens.get(i).map(|t| t.value)
        })
    }
}

/// Join token texts with single spaces, omitting the space after `(` and before `)`.
/// `kind_at` reports the token kind at each position so callers can pass
/// replacement text (fragments) while spacing still follows the original tokens.
pub(crate) fn render_tokens<I, F>(texts: I, kind_at: F) -> String
where
    I: IntoIterator<Item = String>,
    F: Fn(usize) -> Option<Token>,
{
    let mut output = String::new();
    let mut previous: Option<Token> = None;

    for (i, text) in texts.into_iter().enumerate() {
        let current = kind_at(i);
        if let (Some(prev), Some(cur)) = (previous, current) {
            if prev != Token::LeftParen && cur != Token::RightParen {
                output.push(' ');
            }
        }
        output.push_str(&text);
        previous = current;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> TokenStream {
        let (_, tokens) = crate::lexical::tokenize("(1 and 2)  OR 1").unwrap();
        tokens
    }

    #[test]
    fn test_neighbours() {
        let stream = stream();
        assert!(stream.previous(0).is_none());
        assert_eq!(stream.next(0).map(|t| t.value), Some(Token::Index(1)));
        assert_eq!(stream.previous(2).map(|t| t.value), Some(Token::Index(1)));
        assert!(stream.next(6).is_none());
    }

    #[test]
    fn test_indices_are_unique_and_sorted() {
        let indices: Vec<u32> = stream().indices().into_iter().collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_render_spacing() {
        assert_eq!(stream().render(), "(1 AND 2) OR 1");
        assert_eq!(TokenStream::default().render(), "");
    }
}
