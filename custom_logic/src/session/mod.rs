//! Custom logic editing lifecycle
//!
//! Owns the expression text and the current error for one hosting component.
//! The text is created empty or auto-populated when custom logic is enabled,
//! changes on every edit, and is discarded when custom logic is disabled or
//! the surrounding dialog closes. Whether validation runs on every change or
//! only on an explicit check/apply is chosen per call site.

use crate::conditions::{ConditionError, ConditionSet};
use crate::config::RuntimeConfig;
use crate::logging::{self, codes};
use crate::substitution::{self, ComposedPredicate, SubstitutionOptions};
use crate::validation::{
    self, ErrorKind, IndexBound, ValidationError, ValidationMode, ValidationOptions,
};
use crate::{log_debug, log_error, log_success};
use std::fmt;

/// Message shown when validation itself fails unexpectedly
pub const GENERIC_VALIDATION_MESSAGE: &str = "Error validating custom logic expression";

/// Hosting components and the validation behaviour each one uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallSite {
    /// Listing filter panel: validates on "Check syntax"/"Apply" only
    ListingFilter,
    /// Object field mapping tool: validates on every change
    FieldMapping,
    /// Lead assignment rules: validates on every change, indices bounded by the active count
    LeadAssignment,
}

impl CallSite {
    pub fn mode(&self) -> ValidationMode {
        match self {
            Self::ListingFilter => ValidationMode::Lazy,
            Self::FieldMapping | Self::LeadAssignment => ValidationMode::Eager,
        }
    }

    pub fn bound(&self) -> IndexBound {
        match self {
            Self::ListingFilter | Self::FieldMapping => IndexBound::TotalConditions,
            Self::LeadAssignment => IndexBound::ActiveCount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListingFilter => "listing_filter",
            Self::FieldMapping => "field_mapping",
            Self::LeadAssignment => "lead_assignment",
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors returned by [`CustomLogicSession::apply`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The expression breaks a validation rule; the message is shown verbatim
    #[error("{0}")]
    Blocked(ValidationError),

    #[error(transparent)]
    Conditions(#[from] ConditionError),

    /// Unexpected failure, reported with the generic message
    #[error("{0}")]
    Validation(String),
}

impl SessionError {
    pub fn generic() -> Self {
        Self::Validation(GENERIC_VALIDATION_MESSAGE.to_string())
    }

    /// Rule violations block apply verbatim; internal failures get the generic message
    pub fn from_validation(error: ValidationError) -> Self {
        match error.kind() {
            ErrorKind::Internal => Self::generic(),
            _ => Self::Blocked(error),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::Blocked(_) => codes::composition::APPLY_BLOCKED,
            Self::Conditions(error) => error.error_code(),
            Self::Validation(_) => codes::system::INTERNAL_ERROR,
        }
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Blocked(error) => Some(error),
            _ => None,
        }
    }
}

fn scoped<R>(call_site: Option<CallSite>, f: impl FnOnce() -> R) -> R {
    match call_site {
        Some(site) => logging::with_call_site(site.as_str(), f),
        None => f(),
    }
}

/// Editing state of one custom logic field
#[derive(Debug, Clone)]
pub struct CustomLogicSession {
    mode: ValidationMode,
    options: ValidationOptions,
    substitution: SubstitutionOptions,
    call_site: Option<CallSite>,
    enabled: bool,
    expression: String,
    error: Option<ValidationError>,
}

impl CustomLogicSession {
    pub fn new(mode: ValidationMode, options: ValidationOptions) -> Self {
        Self {
            mode,
            options,
            substitution: SubstitutionOptions::default(),
            call_site: None,
            enabled: false,
            expression: String::new(),
            error: None,
        }
    }

    /// Session preset for a hosting component
    pub fn for_call_site(call_site: CallSite) -> Self {
        let mut session = Self::new(call_site.mode(), ValidationOptions::new(call_site.bound()));
        session.call_site = Some(call_site);
        session
    }

    /// Session configured from runtime preferences
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(
            config.validation.mode,
            ValidationOptions::from(&config.validation),
        )
        .with_substitution(SubstitutionOptions::from(&config.substitution))
    }

    pub fn with_substitution(mut self, substitution: SubstitutionOptions) -> Self {
        self.substitution = substitution;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn call_site(&self) -> Option<CallSite> {
        self.call_site
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Inline error text for the input field
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|error| match error.kind() {
            ErrorKind::Internal => GENERIC_VALIDATION_MESSAGE.to_string(),
            _ => error.to_string(),
        })
    }

    /// Turn custom logic on; an empty expression is filled with the active indices joined by AND
    pub fn enable(&mut self, conditions: &ConditionSet) {
        self.enabled = true;
        if self.expression.trim().is_empty() {
            self.expression = validation::default_logic(&conditions.active_indices());
        }
        log_debug!("Custom logic enabled", "expression" => self.expression.as_str());

        if self.mode == ValidationMode::Eager {
            self.revalidate(conditions);
        }
    }

    /// Store new text as typed
    pub fn edit(&mut self, text: &str, conditions: &ConditionSet) {
        self.expression = text.to_string();
        match self.mode {
            ValidationMode::Eager => self.revalidate(conditions),
            ValidationMode::Lazy => self.error = None,
        }
    }

    /// Explicit "Check syntax" in either mode
    pub fn check_syntax(&mut self, conditions: &ConditionSet) -> Option<&ValidationError> {
        self.revalidate(conditions);
        self.error.as_ref()
    }

    /// The active set changed (condition added, removed or cleared)
    pub fn conditions_changed(&mut self, conditions: &ConditionSet) {
        if !self.enabled {
            return;
        }
        match self.mode {
            ValidationMode::Eager => self.revalidate(conditions),
            ValidationMode::Lazy => self.error = None,
        }
    }

    /// Apply/Save is blocked while an error is shown
    pub fn can_apply(&self) -> bool {
        self.error.is_none()
    }

    /// Validate and compose the final predicate.
    ///
    /// Disabled custom logic composes the AND-join of all fragments.
    pub fn apply(&mut self, conditions: &ConditionSet) -> Result<ComposedPredicate, SessionError> {
        let call_site = self.call_site;
        scoped(call_site, || self.apply_inner(conditions))
    }

    fn apply_inner(&mut self, conditions: &ConditionSet) -> Result<ComposedPredicate, SessionError> {
        let fragments = conditions.fragments()?;

        if !self.enabled {
            self.error = None;
            return Ok(substitution::compose_default(&fragments, &self.substitution));
        }

        let context = conditions.validation_context();
        let validated = match validation::validate(&self.expression, &context, &self.options) {
            Ok(validated) => validated,
            Err(error) => {
                self.error = Some(error.clone());
                log_error!(codes::composition::APPLY_BLOCKED, "Apply blocked by invalid custom logic",
                    "kind" => error.kind()
                );
                return Err(SessionError::from_validation(error));
            }
        };
        self.error = None;

        let predicate = if validated.is_empty() || fragments.is_empty() {
            substitution::compose_default(&fragments, &self.substitution)
        } else {
            substitution::substitute_validated(&validated, &fragments, &self.substitution)
        };

        log_success!(codes::success::LOGIC_APPLIED, "Custom logic applied",
            "active" => context.active.len(),
            "expression" => validated.display()
        );

        Ok(predicate)
    }

    /// Turn custom logic off, discarding the expression and any error
    pub fn disable(&mut self) {
        self.enabled = false;
        self.expression.clear();
        self.error = None;
    }

    /// The hosting dialog closed
    pub fn close(&mut self) {
        self.disable();
    }

    fn revalidate(&mut self, conditions: &ConditionSet) {
        let call_site = self.call_site;
        let context = conditions.validation_context();
        self.error = scoped(call_site, || {
            validation::check(&self.expression, &context, &self.options)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{Condition, ConditionValue};
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
    fn test_call_site_presets() {
        assert_eq!(CallSite::ListingFilter.mode(), ValidationMode::Lazy);
        assert_eq!(CallSite::FieldMapping.mode(), ValidationMode::Eager);
        assert_eq!(CallSite::LeadAssignment.bound(), IndexBound::ActiveCount);

        let session = CustomLogicSession::for_call_site(CallSite::LeadAssignment);
        assert_eq!(session.options().bound, IndexBound::ActiveCount);
        assert_eq!(session.call_site(), Some(CallSite::LeadAssignment));
    }

    #[test]
    fn test_enable_auto_populates() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::FieldMapping);
        session.enable(&filters);

        assert!(session.is_enabled());
        assert_eq!(session.expression(), "1 AND 2");
        assert!(session.can_apply());
    }

    #[test]
    fn test_enable_keeps_existing_text() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::FieldMapping);
        session.edit("1 OR 2", &filters);
        session.enable(&filters);
        assert_eq!(session.expression(), "1 OR 2");
    }

    #[test]
    fn test_eager_mode_validates_every_edit() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::FieldMapping);
        session.enable(&filters);

        session.edit("1 OR", &filters);
        assert_eq!(
            session.error().map(|e| e.kind()),
            Some(ErrorKind::OperatorAtBoundary)
        );
        assert!(!session.can_apply());

        session.edit("1 OR 2", &filters);
        assert!(session.error().is_none());
        assert!(session.can_apply());
    }

    #[test]
    fn test_lazy_mode_waits_for_check() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::ListingFilter);
        session.enable(&filters);

        session.edit("1 OR", &filters);
        assert!(session.error().is_none());

        let error = session.check_syntax(&filters).map(|e| e.kind());
        assert_eq!(error, Some(ErrorKind::OperatorAtBoundary));
        assert!(!session.can_apply());

        // typing again clears the stale error until the next check
        session.edit("1 OR 2", &filters);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_conditions_changed_revalidates_in_eager_mode() {
        let mut filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::FieldMapping);
        session.enable(&filters);
        assert!(session.can_apply());

        filters.set_value(3, ConditionValue::Checkbox { checked: true });
        session.conditions_changed(&filters);
        assert_eq!(
            session.error().map(|e| e.kind()),
            Some(ErrorKind::MissingRequiredIndex)
        );
    }

    #[test]
    fn test_apply_composes_custom_logic() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::ListingFilter);
        session.enable(&filters);
        session.edit("1 OR 2", &filters);

        let predicate = session.apply(&filters).unwrap();
        assert_eq!(
            predicate.expression,
            "(City = 'Pune') OR (Price >= 100 AND Price <= 200)"
        );
    }

    #[test]
    fn test_apply_is_blocked_by_invalid_logic() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::ListingFilter);
        session.enable(&filters);
        session.edit("1 OR 3", &filters);

        let result = session.apply(&filters);
        assert_matches!(result, Err(SessionError::Blocked(ref e)) if e.kind() == ErrorKind::MissingRequiredIndex);
        assert!(!session.can_apply());
        assert_eq!(
            session.error_message().unwrap(),
            "Condition is not used in the logic: 2; condition has no value: 3"
        );
    }

    #[test]
    fn test_disabled_logic_falls_back_to_and_join() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::ListingFilter);
        session.enable(&filters);
        session.edit("1 OR 2", &filters);
        session.disable();

        assert!(session.expression().is_empty());
        let predicate = session.apply(&filters).unwrap();
        assert_eq!(
            predicate.expression,
            "(City = 'Pune') AND (Price >= 100 AND Price <= 200)"
        );
    }

    #[test]
    fn test_apply_with_no_active_conditions_matches_all() {
        let filters = ConditionSet::from_conditions(vec![Condition::new(
            "Status",
            ConditionValue::Empty,
        )])
        .unwrap();
        let mut session = CustomLogicSession::for_call_site(CallSite::FieldMapping);
        session.enable(&filters);
        assert_eq!(session.expression(), "");

        let predicate = session.apply(&filters).unwrap();
        assert!(predicate.is_match_all());
    }

    #[test]
    fn test_condition_errors_surface() {
        let filters = ConditionSet::from_conditions(vec![Condition::new(
            "Bad Field",
            ConditionValue::Checkbox { checked: true },
        )])
        .unwrap();
        let mut session = CustomLogicSession::for_call_site(CallSite::LeadAssignment);
        assert_matches!(
            session.apply(&filters),
            Err(SessionError::Conditions(ConditionError::InvalidFieldName { .. }))
        );
    }

    #[test]
    fn test_close_discards_state() {
        let filters = listing_filters();
        let mut session = CustomLogicSession::for_call_site(CallSite::FieldMapping);
        session.enable(&filters);
        session.edit("1 OR", &filters);
        session.close();

        assert!(!session.is_enabled());
        assert!(session.expression().is_empty());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_generic_error() {
        let error = SessionError::generic();
        assert_eq!(error.to_string(), GENERIC_VALIDATION_MESSAGE);
        assert_eq!(error.error_code(), codes::system::INTERNAL_ERROR);
    }

    #[test]
    fn test_internal_validation_failure_uses_generic_message() {
        let error = SessionError::from_validation(ValidationError::internal_error(
            "used indices diverged from the active set",
        ));
        assert_eq!(error, SessionError::generic());
        assert!(error.validation_error().is_none());

        let blocked = SessionError::from_validation(ValidationError::IndexWithoutValue {
            indices: [4].into_iter().collect(),
        });
        assert_matches!(blocked, SessionError::Blocked(_));
    }

    #[test]
    fn test_from_config() {
        let config = RuntimeConfig::from_toml_str(
            "[validation]\nmode = \"lazy\"\nbound = \"active_count\"\n",
        )
        .unwrap();
        let session = CustomLogicSession::from_config(&config);
        assert_eq!(session.mode(), ValidationMode::Lazy);
        assert_eq!(session.options().bound, IndexBound::ActiveCount);
    }
}
