//! Composed predicate text and substitution settings

use crate::config::runtime::SubstitutionPreferences;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Literal used when no condition restricts the result
pub const MATCH_ALL: &str = "TRUE";

/// Pre-built predicate text per 1-based condition index
pub type FragmentMap = BTreeMap<u32, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionOptions {
    /// Wrap the result in one outer pair when it has a top-level AND/OR
    pub wrap_top_level: bool,
    /// Text substituted for indices that have no fragment
    pub inactive_placeholder: String,
}

impl Default for SubstitutionOptions {
    fn default() -> Self {
        Self {
            wrap_top_level: false,
            inactive_placeholder: MATCH_ALL.to_string(),
        }
    }
}

impl From<&SubstitutionPreferences> for SubstitutionOptions {
    fn from(preferences: &SubstitutionPreferences) -> Self {
        Self {
            wrap_top_level: preferences.wrap_top_level,
            inactive_placeholder: preferences.inactive_placeholder.clone(),
        }
    }
}

impl From<SubstitutionPreferences> for SubstitutionOptions {
    fn from(preferences: SubstitutionPreferences) -> Self {
        Self::from(&preferences)
    }
}

/// Final boolean predicate handed to the query collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPredicate {
    pub expression: String,
    /// True when an AND/OR sits outside every parenthesis
    pub has_top_level_operator: bool,
}

impl ComposedPredicate {
    pub fn new(expression: String, has_top_level_operator: bool) -> Self {
        Self {
            expression,
            has_top_level_operator,
        }
    }

    pub fn match_all() -> Self {
        Self::new(MATCH_ALL.to_string(), false)
    }

    pub fn is_match_all(&self) -> bool {
        self.expression == MATCH_ALL
    }

    /// Form that is safe to join with sibling predicates
    pub fn embeddable(&self) -> String {
        if self.has_top_level_operator {
            format!("({})", self.expression)
        } else {
            self.expression.clone()
        }
    }

    /// Apply the outer wrap in place; the result has no top-level operator left
    pub(crate) fn wrapped(self) -> Self {
        if self.has_top_level_operator {
            Self::new(format!("({})", self.expression), false)
        } else {
            self
        }
    }
}

impl fmt::Display for ComposedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
