use crate::conditions::ConditionError;
use crate::validation::ValidationError;

/// Composition pipeline errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Condition analysis failed: {0}")]
    ConditionAnalysis(#[from] ConditionError),

    #[error("Logic validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::ConditionAnalysis(error) => error.error_code(),
            Self::Validation(error) => error.error_code(),
        }
    }

    /// The validation error shown to the user, when this is one
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}
