//! Condition list model
//!
//! Supplies the two inputs the logic engine re-derives on every call: the set
//! of active indices and the map from index to predicate fragment.

pub mod condition;
pub mod error;
pub mod set;

pub use condition::{format_number, is_valid_field_name, quote_literal, Condition, ConditionValue};
pub use error::ConditionError;
pub use set::ConditionSet;
