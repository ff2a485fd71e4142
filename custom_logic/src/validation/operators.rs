//! Operator placement and operand adjacency checks

use super::error::{ValidationError, ValidationResult};
use crate::tokens::{Token, TokenStream};

/// `AND`/`OR` must sit between two operands: never first or last, never next
/// to another operator, never directly inside a parenthesis.
pub fn check_operator_placement(tokens: &TokenStream) -> ValidationResult<()> {
    for (position, current) in tokens.iter().enumerate() {
        if !current.value.is_operator() {
            continue;
        }

        let boundary = || ValidationError::OperatorAtBoundary {
            operator: current.lexeme.clone(),
            span: current.span,
        };

        let (previous, next) = match (tokens.previous(position), tokens.next(position)) {
            (Some(previous), Some(next)) => (previous, next),
            _ => return Err(boundary()),
        };

        if next.value.is_operator() {
            return Err(ValidationError::ConsecutiveOperators {
                first: current.lexeme.clone(),
                second: next.lexeme.clone(),
                span: current.span.merge(next.span),
            });
        }
        if previous.value.is_operator() {
            return Err(ValidationError::ConsecutiveOperators {
                first: previous.lexeme.clone(),
                second: current.lexeme.clone(),
                span: previous.span.merge(current.span),
            });
        }

        if !previous.value.ends_operand() || !next.value.starts_operand() {
            return Err(boundary());
        }
    }

    Ok(())
}

/// Two operands in a row (`1 2`, `1 (2)`, `(1) 2`) need an operator between
/// them, and `()` groups nothing.
pub fn check_operand_adjacency(tokens: &TokenStream) -> ValidationResult<()> {
    for (position, current) in tokens.iter().enumerate() {
        let Some(next) = tokens.next(position) else {
            break;
        };

        if current.value == Token::LeftParen && next.value == Token::RightParen {
            return Err(ValidationError::EmptyGroup {
                span: current.span.merge(next.span),
            });
        }

        if current.value.ends_operand() && next.value.starts_operand() {
            return Err(ValidationError::MissingOperator {
                found: next.lexeme.clone(),
                span: next.span,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::validation::ErrorKind;

    fn placement(expression: &str) -> Option<ErrorKind> {
        let (_, tokens) = tokenize(expression).unwrap();
        check_operator_placement(&tokens).err().map(|e| e.kind())
    }

    fn adjacency(expression: &str) -> Option<ErrorKind> {
        let (_, tokens) = tokenize(expression).unwrap();
        check_operand_adjacency(&tokens).err().map(|e| e.kind())
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(placement("AND 1 OR 2"), Some(ErrorKind::OperatorAtBoundary));
        assert_eq!(placement("1 OR 2 or"), Some(ErrorKind::OperatorAtBoundary));
        assert_eq!(placement("(OR 1) AND 2"), Some(ErrorKind::OperatorAtBoundary));
        assert_eq!(placement("(1 AND) 2"), Some(ErrorKind::OperatorAtBoundary));
        assert_eq!(placement("OR"), Some(ErrorKind::OperatorAtBoundary));
    }

    #[test]
    fn test_consecutive() {
        assert_eq!(placement("1 AND AND 2"), Some(ErrorKind::ConsecutiveOperators));
        assert_eq!(placement("1 and or 2"), Some(ErrorKind::ConsecutiveOperators));
    }

    #[test]
    fn test_consecutive_reports_lexemes() {
        let (_, tokens) = tokenize("1 and OR 2").unwrap();
        match check_operator_placement(&tokens) {
            Err(ValidationError::ConsecutiveOperators { first, second, .. }) => {
                assert_eq!(first, "and");
                assert_eq!(second, "OR");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_valid_placement() {
        assert_eq!(placement("(1 AND 2) OR 3"), None);
        assert_eq!(placement("1 OR (2 AND (3))"), None);
        assert_eq!(placement("1"), None);
    }

    #[test]
    fn test_adjacency() {
        assert_eq!(adjacency("1 2"), Some(ErrorKind::MissingOperator));
        assert_eq!(adjacency("(1) (2)"), Some(ErrorKind::MissingOperator));
        assert_eq!(adjacency("1 AND ()"), Some(ErrorKind::EmptyGroup));
        assert_eq!(adjacency("(1 AND 2) OR 3"), None);
    }
}
