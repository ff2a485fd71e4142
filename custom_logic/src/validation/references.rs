//! Cross-reference of used indices against the active condition set

use super::error::{ValidationError, ValidationResult};
use super::types::{IndexSet, ValidationContext, ValidationOptions};
use crate::tokens::{Token, TokenStream};

/// Unique indices referenced by the expression
pub fn collect_used(tokens: &TokenStream) -> IndexSet {
    tokens.indices()
}

/// The expression must reference exactly the active set.
///
/// Checked in order: indices used while nothing is active, active indices
/// left out, then unknown indices split by the upper bound N into "no value"
/// (inside `[1, N]`) and "out of range" (outside, including 0).
pub fn check_references(
    used: &IndexSet,
    context: &ValidationContext,
    options: &ValidationOptions,
) -> ValidationResult<()> {
    let active = &context.active;

    if active.is_empty() && !used.is_empty() {
        return Err(ValidationError::IndicesWithoutActiveFilters {
            indices: used.clone(),
        });
    }

    let max = context.upper_bound(options.bound);
    let (without_value, out_of_range): (IndexSet, IndexSet) = used
        .difference(active)
        .copied()
        .partition(|index| (1..=max).contains(index));

    let missing: IndexSet = active.difference(used).copied().collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredIndex {
            missing,
            without_value,
        });
    }

    if !without_value.is_empty() {
        return Err(ValidationError::IndexWithoutValue {
            indices: without_value,
        });
    }

    if !out_of_range.is_empty() {
        return Err(ValidationError::IndexOutOfRange {
            indices: out_of_range,
            max,
            numbers: Vec::new(),
        });
    }

    Ok(())
}

/// Fill in the numbers of an out-of-range error as typed, since parsed
/// indices saturate and would misreport anything above u32::MAX
pub fn with_typed_numbers(error: ValidationError, tokens: &TokenStream) -> ValidationError {
    let ValidationError::IndexOutOfRange { indices, max, .. } = error else {
        return error;
    };

    let mut numbers: Vec<String> = Vec::new();
    for token in tokens.iter() {
        let Token::Index(index) = token.value else {
            continue;
        };
        if !indices.contains(&index) {
            continue;
        }
        let digits = token.lexeme.trim_start_matches('0');
        let number = if digits.is_empty() { "0" } else { digits };
        if !numbers.iter().any(|seen| seen == number) {
            numbers.push(number.to_string());
        }
    }
    numbers.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    ValidationError::IndexOutOfRange {
        indices,
        max,
        numbers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IndexBound;
    use assert_matches::assert_matches;

    fn set(values: &[u32]) -> IndexSet {
        values.iter().copied().collect()
    }

    fn check(used: &[u32], active: &[u32], total: u32, bound: IndexBound) -> ValidationResult<()> {
        check_references(
            &set(used),
            &ValidationContext::new(set(active), total),
            &ValidationOptions::new(bound),
        )
    }

    #[test]
    fn test_exact_match_is_valid() {
        assert!(check(&[1, 3, 5], &[1, 3, 5], 5, IndexBound::TotalConditions).is_ok());
        assert!(check(&[], &[], 3, IndexBound::TotalConditions).is_ok());
    }

    #[test]
    fn test_nothing_active() {
        assert_matches!(
            check(&[1], &[], 3, IndexBound::TotalConditions),
            Err(ValidationError::IndicesWithoutActiveFilters { indices }) if indices == set(&[1])
        );
    }

    #[test]
    fn test_missing_carries_without_value() {
        assert_matches!(
            check(&[1, 3], &[1, 2], 3, IndexBound::TotalConditions),
            Err(ValidationError::MissingRequiredIndex { missing, without_value })
                if missing == set(&[2]) && without_value == set(&[3])
        );
    }

    #[test]
    fn test_without_value_before_out_of_range() {
        assert_matches!(
            check(&[1, 2, 4, 9], &[1, 2], 5, IndexBound::TotalConditions),
            Err(ValidationError::IndexWithoutValue { indices }) if indices == set(&[4])
        );
        assert_matches!(
            check(&[1, 2, 9], &[1, 2], 5, IndexBound::TotalConditions),
            Err(ValidationError::IndexOutOfRange { indices, max: 5, .. }) if indices == set(&[9])
        );
    }

    #[test]
    fn test_zero_is_out_of_range() {
        assert_matches!(
            check(&[0, 1], &[1], 3, IndexBound::TotalConditions),
            Err(ValidationError::IndexOutOfRange { indices, .. }) if indices == set(&[0])
        );
    }

    #[test]
    fn test_bound_modes_classify_differently() {
        // index 3 exists in a list of 4 but only two conditions are active
        assert_matches!(
            check(&[1, 2, 3], &[1, 2], 4, IndexBound::TotalConditions),
            Err(ValidationError::IndexWithoutValue { .. })
        );
        assert_matches!(
            check(&[1, 2, 3], &[1, 2], 4, IndexBound::ActiveCount),
            Err(ValidationError::IndexOutOfRange { max: 2, .. })
        );
    }

    #[test]
    fn test_out_of_range_reports_typed_numbers() {
        let (_, tokens) = crate::lexical::tokenize("1 AND 4294967296 AND 0007 AND 7").unwrap();
        let used = collect_used(&tokens);
        let error = check_references(
            &used,
            &ValidationContext::new(set(&[1]), 3),
            &ValidationOptions::default(),
        )
        .unwrap_err();

        let error = with_typed_numbers(error, &tokens);
        assert_matches!(
            error,
            ValidationError::IndexOutOfRange { ref numbers, .. }
                if *numbers == vec!["7".to_string(), "4294967296".to_string()]
        );
        let message = error.to_string();
        assert!(message.contains("4294967296"));
        assert!(!message.contains("4294967295"));
    }

    #[test]
    fn test_typed_numbers_leave_other_errors_alone() {
        let (_, tokens) = crate::lexical::tokenize("1 AND 2").unwrap();
        let error = ValidationError::IndexWithoutValue { indices: set(&[2]) };
        assert_eq!(with_typed_numbers(error.clone(), &tokens), error);
    }
}
