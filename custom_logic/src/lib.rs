// Internal modules
pub mod conditions;
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod substitution;
pub mod tokens;
pub mod utils;
pub mod validation;

// Re-export key types for library consumers
pub use conditions::{Condition, ConditionError, ConditionSet, ConditionValue};
pub use pipeline::{compose_filter, PipelineError, PipelineOptions, PipelineResult};
pub use session::{CallSite, CustomLogicSession, SessionError};
pub use substitution::{compose, substitute, ComposedPredicate, FragmentMap, SubstitutionOptions};
pub use validation::{
    check, default_logic, validate, IndexBound, IndexSet, ValidationContext, ValidationError,
    ValidationMode, ValidationOptions,
};
