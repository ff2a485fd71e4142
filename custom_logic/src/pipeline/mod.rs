mod error;
mod info;
mod result;
mod validation;

// Re-export public types
pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::conditions::ConditionSet;
use crate::config::RuntimeConfig;
use crate::logging::codes;
use crate::substitution::{self, SubstitutionOptions};
use crate::validation::{self as validator, IndexSet, ValidationOptions};
use std::time::Instant;

/// Options for a composition run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub validation: ValidationOptions,
    pub substitution: SubstitutionOptions,
}

impl From<&RuntimeConfig> for PipelineOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            validation: ValidationOptions::from(&config.validation),
            substitution: SubstitutionOptions::from(&config.substitution),
        }
    }
}

/// Compose the final filter predicate (conditions -> validation -> substitution)
pub fn compose_filter(
    conditions: &ConditionSet,
    logic: Option<&str>,
    options: &PipelineOptions,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let logic = logic.filter(|text| !text.trim().is_empty());

    crate::log_info!("Starting custom logic composition",
        "conditions" => conditions.total(),
        "custom_logic" => logic.is_some()
    );

    // Stage 1: Condition analysis
    let fragments = conditions.fragments()?;
    let active = conditions.active_indices();
    crate::log_success!(
        codes::success::CONDITION_ANALYSIS_COMPLETE,
        "Condition analysis complete",
        "total" => conditions.total(),
        "active" => active.len()
    );

    // Stage 2: Validation of any non-blank logic
    let validated = match logic {
        Some(text) => Some(validator::validate(
            text,
            &conditions.validation_context(),
            &options.validation,
        )?),
        None => None,
    };

    // Stage 3: Substitution
    let (predicate, used, token_count) = match &validated {
        Some(expression) if !expression.is_empty() => (
            substitution::substitute_validated(expression, &fragments, &options.substitution),
            expression.used.clone(),
            expression.tokens.len(),
        ),
        _ => (
            substitution::compose_default(&fragments, &options.substitution),
            IndexSet::new(),
            0,
        ),
    };
    crate::log_success!(
        codes::success::SUBSTITUTION_COMPLETE,
        "Predicate composed",
        "length" => predicate.expression.len(),
        "match_all" => predicate.is_match_all()
    );

    let result = PipelineResult::new(
        predicate,
        active,
        used,
        validated.is_some(),
        token_count,
        start_time.elapsed(),
    );
    result.log_success();

    Ok(result)
}

/// Compose using runtime preferences
pub fn compose_filter_with_config(
    conditions: &ConditionSet,
    logic: Option<&str>,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    compose_filter(conditions, logic, &PipelineOptions::from(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Condition, ConditionError, ConditionValue};
    use crate::validation::{ErrorKind, IndexBound};
    use assert_matches::assert_matches;

    fn listing_filters() -> ConditionSet {
        ConditionSet::from_conditions(vec![
            Condition::new(
                "City",
                ConditionValue::Selection {
                    values: vec!["Pune".to_string()],
                },
            ),
            Condition::new(
                "Price",
                ConditionValue::NumberRange {
                    min: Some(100.0),
                    max: Some(200.0),
                },
            ),
            Condition::new("Status", ConditionValue::Empty),
        ])
        .unwrap()
    }

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_pipeline_error_codes() {
        let error = PipelineError::from(crate::validation::ValidationError::internal_error("boom"));
        assert_eq!(error.error_code(), codes::system::INTERNAL_ERROR);
        assert!(error.validation_error().is_some());
        assert!(error.to_string().starts_with("Logic validation failed"));
    }

    #[test]
    fn test_listing_filter_scenario() {
        let result =
            compose_filter(&listing_filters(), Some("1 OR 2"), &PipelineOptions::default())
                .unwrap();
        assert_eq!(
            result.predicate.expression,
            "(City = 'Pune') OR (Price >= 100 AND Price <= 200)"
        );
        assert_eq!(
            result.where_fragment(),
            "((City = 'Pune') OR (Price >= 100 AND Price <= 200))"
        );
        assert!(result.custom_logic_applied);
        assert_eq!(result.token_count, 3);
        assert_eq!(result.used, result.active);
    }

    #[test]
    fn test_invalid_logic_stops_the_pipeline() {
        let error =
            compose_filter(&listing_filters(), Some("1 OR 3"), &PipelineOptions::default())
                .unwrap_err();
        let validation = error.validation_error().unwrap();
        assert_eq!(validation.kind(), ErrorKind::MissingRequiredIndex);
        assert_eq!(error.error_code(), codes::validation::MISSING_REQUIRED_INDEX);
    }

    #[test]
    fn test_blank_logic_uses_and_join() {
        let result =
            compose_filter(&listing_filters(), Some("  "), &PipelineOptions::default()).unwrap();
        assert_eq!(
            result.predicate.expression,
            "(City = 'Pune') AND (Price >= 100 AND Price <= 200)"
        );
        assert!(!result.custom_logic_applied);
        assert!(result.used.is_empty());
    }

    fn unset_filters() -> ConditionSet {
        ConditionSet::from_conditions(vec![
            Condition::new("City", ConditionValue::Empty),
            Condition::new("Status", ConditionValue::Empty),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_active_conditions_without_logic_matches_all() {
        let result = compose_filter(&unset_filters(), None, &PipelineOptions::default()).unwrap();
        assert!(result.predicate.is_match_all());
        assert!(!result.custom_logic_applied);
    }

    #[test]
    fn test_logic_is_validated_when_nothing_is_active() {
        let filters = unset_filters();
        let kind_of = |logic: &str| {
            compose_filter(&filters, Some(logic), &PipelineOptions::default())
                .unwrap_err()
                .validation_error()
                .map(|e| e.kind())
        };

        assert_eq!(kind_of("1 OR 2"), Some(ErrorKind::IndicesWithoutActiveFilters));
        assert_eq!(kind_of("7"), Some(ErrorKind::IndicesWithoutActiveFilters));
        assert_eq!(kind_of("1 ; DROP"), Some(ErrorKind::InvalidCharacters));
        assert_eq!(kind_of("AND AND ("), Some(ErrorKind::OperatorAtBoundary));
    }

    #[test]
    fn test_pipeline_agrees_with_session_apply() {
        let filters = unset_filters();
        let mut session = crate::session::CustomLogicSession::for_call_site(
            crate::session::CallSite::ListingFilter,
        );
        session.enable(&filters);
        session.edit("1 OR 2", &filters);

        let session_error = session.apply(&filters).unwrap_err();
        let pipeline_error =
            compose_filter(&filters, Some("1 OR 2"), &PipelineOptions::default()).unwrap_err();
        assert_eq!(
            session_error.validation_error(),
            pipeline_error.validation_error()
        );
    }

    #[test]
    fn test_condition_errors_propagate() {
        let filters = ConditionSet::from_conditions(vec![Condition::new(
            "Price",
            ConditionValue::NumberRange {
                min: Some(300.0),
                max: Some(100.0),
            },
        )])
        .unwrap();
        assert_matches!(
            compose_filter(&filters, None, &PipelineOptions::default()),
            Err(PipelineError::ConditionAnalysis(ConditionError::InvertedRange { .. }))
        );
    }

    #[test]
    fn test_options_from_config() {
        let config = RuntimeConfig::from_toml_str(
            "[validation]\nbound = \"active_count\"\n\n[substitution]\nwrap_top_level = true\n",
        )
        .unwrap();
        let options = PipelineOptions::from(&config);
        assert_eq!(options.validation.bound, IndexBound::ActiveCount);
        assert!(options.substitution.wrap_top_level);

        let result = compose_filter_with_config(&listing_filters(), Some("2 AND 1"), &config)
            .unwrap();
        assert_eq!(
            result.predicate.expression,
            "((Price >= 100 AND Price <= 200) AND (City = 'Pune'))"
        );
    }

    #[test]
    fn test_pipeline_info() {
        let info = get_pipeline_info();
        assert_eq!(info.pipeline_stages, 3);
        assert!(info.report().contains("Max Conditions"));
        assert!(info.summary().contains("3-stage"));
    }
}
