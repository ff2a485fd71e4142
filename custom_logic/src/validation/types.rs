//! Types shared by the validation checks

use crate::config::runtime::ValidationPreferences;
use crate::lexical::NormalizedExpression;
use crate::tokens::TokenStream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Sorted set of 1-based condition indices
pub type IndexSet = BTreeSet<u32>;

/// When a hosting component runs validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// On every edit of the expression or the condition list
    Eager,
    /// Only on an explicit "Check syntax" or "Apply"
    Lazy,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::Lazy => "lazy",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eager" => Ok(Self::Eager),
            "lazy" => Ok(Self::Lazy),
            other => Err(format!(
                "Unknown validation mode '{}' (expected 'eager' or 'lazy')",
                other
            )),
        }
    }
}

/// Upper bound N used to tell "index without value" from "index out of range"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBound {
    /// N is the total number of conditions, active or not
    TotalConditions,
    /// N is the number of active conditions
    ActiveCount,
}

impl IndexBound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalConditions => "total_conditions",
            Self::ActiveCount => "active_count",
        }
    }
}

impl fmt::Display for IndexBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndexBound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "total_conditions" | "total" => Ok(Self::TotalConditions),
            "active_count" | "active" => Ok(Self::ActiveCount),
            other => Err(format!(
                "Unknown index bound '{}' (expected 'total_conditions' or 'active_count')",
                other
            )),
        }
    }
}

/// Options that change how references are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    pub bound: IndexBound,
}

impl ValidationOptions {
    pub fn new(bound: IndexBound) -> Self {
        Self { bound }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::new(IndexBound::TotalConditions)
    }
}

impl From<&ValidationPreferences> for ValidationOptions {
    fn from(preferences: &ValidationPreferences) -> Self {
        Self::new(preferences.bound)
    }
}

/// Snapshot of the condition list an expression is validated against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// Indices of conditions currently holding a value
    pub active: IndexSet,
    /// Number of conditions in the list, active or not
    pub total_conditions: u32,
}

impl ValidationContext {
    pub fn new(active: IndexSet, total_conditions: u32) -> Self {
        Self {
            active,
            total_conditions,
        }
    }

    /// Build a context from any iterator of active indices
    pub fn from_active<I>(active: I, total_conditions: u32) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self::new(active.into_iter().collect(), total_conditions)
    }

    /// Upper bound N for the given bound mode
    pub fn upper_bound(&self, bound: IndexBound) -> u32 {
        match bound {
            IndexBound::TotalConditions => self.total_conditions,
            IndexBound::ActiveCount => u32::try_from(self.active.len()).unwrap_or(u32::MAX),
        }
    }
}

/// An expression that passed every check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedExpression {
    pub normalized: NormalizedExpression,
    pub tokens: TokenStream,
    /// Unique indices referenced by the expression
    pub used: IndexSet,
}

impl ValidatedExpression {
    /// The implicit "AND all active conditions" expression
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Expression as typed, whitespace-normalized
    pub fn display(&self) -> &str {
        &self.normalized.display
    }

    /// Canonical form with uppercase keywords
    pub fn canonical(&self) -> String {
        self.tokens.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Eager".parse::<ValidationMode>(), Ok(ValidationMode::Eager));
        assert_eq!(" lazy ".parse::<ValidationMode>(), Ok(ValidationMode::Lazy));
        assert!("sometimes".parse::<ValidationMode>().is_err());
    }

    #[test]
    fn test_bound_parsing() {
        assert_eq!(
            "active-count".parse::<IndexBound>(),
            Ok(IndexBound::ActiveCount)
        );
        assert_eq!("total".parse::<IndexBound>(), Ok(IndexBound::TotalConditions));
        assert_eq!(IndexBound::ActiveCount.to_string(), "active_count");
    }

    #[test]
    fn test_upper_bound() {
        let context = ValidationContext::from_active([1, 4], 6);
        assert_eq!(context.upper_bound(IndexBound::TotalConditions), 6);
        assert_eq!(context.upper_bound(IndexBound::ActiveCount), 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&IndexBound::TotalConditions).unwrap();
        assert_eq!(json, "\"total_conditions\"");
        let mode: ValidationMode = serde_json::from_str("\"lazy\"").unwrap();
        assert_eq!(mode, ValidationMode::Lazy);
    }
}
