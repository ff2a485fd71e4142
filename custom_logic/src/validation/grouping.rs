//! Parenthesis balance and nesting depth

use super::error::{ValidationError, ValidationResult};
use crate::config::compile_time::expression::MAX_NESTING_DEPTH;
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;

/// Deepest nesting reached by a balanced expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingMetrics {
    pub max_depth: usize,
    pub group_count: usize,
}

/// Running open count must never go negative and must end at zero
pub fn check_parentheses(tokens: &TokenStream) -> ValidationResult<GroupingMetrics> {
    let mut open: Vec<Span> = Vec::new();
    let mut metrics = GroupingMetrics::default();
    let mut deepest: Option<Span> = None;

    for token in tokens.iter() {
        match token.value {
            Token::LeftParen => {
                open.push(token.span);
                metrics.group_count += 1;
                if open.len() > metrics.max_depth {
                    metrics.max_depth = open.len();
                    deepest = Some(token.span);
                }
            }
            Token::RightParen => {
                if open.pop().is_none() {
                    return Err(ValidationError::UnmatchedClosingParen { span: token.span });
                }
            }
            _ => {}
        }
    }

    if let Some(span) = open.last() {
        return Err(ValidationError::UnmatchedOpeningParen {
            unclosed: open.len(),
            span: *span,
        });
    }

    if metrics.max_depth > MAX_NESTING_DEPTH {
        return Err(ValidationError::NestingTooDeep {
            depth: metrics.max_depth,
            max: MAX_NESTING_DEPTH,
            span: deepest.unwrap_or_default(),
        });
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn check(expression: &str) -> ValidationResult<GroupingMetrics> {
        let (_, tokens) = tokenize(expression).unwrap();
        check_parentheses(&tokens)
    }

    #[test]
    fn test_balanced() {
        let metrics = check("((1 AND 2) OR (3))").unwrap();
        assert_eq!(metrics.max_depth, 2);
        assert_eq!(metrics.group_count, 3);
    }

    #[test]
    fn test_unmatched_closing_reports_position() {
        assert_matches!(
            check("1 AND 2) OR (3"),
            Err(ValidationError::UnmatchedClosingParen { span }) if span == Span::new(7, 8)
        );
    }

    #[test]
    fn test_unmatched_opening() {
        assert_matches!(
            check("(1 AND 2"),
            Err(ValidationError::UnmatchedOpeningParen { unclosed: 1, .. })
        );
        assert_matches!(
            check("((1"),
            Err(ValidationError::UnmatchedOpeningParen { unclosed: 2, span }) if span == Span::new(1, 2)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING_DEPTH + 1;
        let expression = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_matches!(
            check(&expression),
            Err(ValidationError::NestingTooDeep { depth: d, .. }) if d == depth
        );
    }
}
