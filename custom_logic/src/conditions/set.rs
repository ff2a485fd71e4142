//! Ordered condition list with 1-based positions

use super::condition::{Condition, ConditionValue};
use super::error::ConditionError;
use crate::config::compile_time::conditions::MAX_CONDITIONS;
use crate::substitution::FragmentMap;
use crate::validation::{IndexSet, ValidationContext};
use serde::{Deserialize, Serialize};

/// The dynamic condition list a logic expression refers to.
///
/// Positions are 1-based and shift down when a condition is removed. Active
/// indices and fragments are derived on every call, never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Build a set, enforcing the condition limit
    pub fn from_conditions(conditions: Vec<Condition>) -> Result<Self, ConditionError> {
        let set = Self {
            name: None,
            conditions,
        };
        set.check_limits()?;
        Ok(set)
    }

    pub fn check_limits(&self) -> Result<(), ConditionError> {
        let count = self.conditions.len();
        if count > MAX_CONDITIONS as usize {
            return Err(ConditionError::TooManyConditions { count });
        }
        Ok(())
    }

    /// Number of conditions, active or not
    pub fn total(&self) -> u32 {
        u32::try_from(self.conditions.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Condition> {
        position(index).and_then(|p| self.conditions.get(p))
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut Condition> {
        position(index).and_then(|p| self.conditions.get_mut(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Condition)> {
        (1u32..).zip(self.conditions.iter())
    }

    /// Append a condition and return its 1-based index
    pub fn push(&mut self, condition: Condition) -> Result<u32, ConditionError> {
        if self.conditions.len() >= MAX_CONDITIONS as usize {
            return Err(ConditionError::TooManyConditions {
                count: self.conditions.len() + 1,
            });
        }
        self.conditions.push(condition);
        Ok(self.total())
    }

    /// Remove a condition; later conditions move down one position
    pub fn remove(&mut self, index: u32) -> Option<Condition> {
        let p = position(index).filter(|p| *p < self.conditions.len())?;
        Some(self.conditions.remove(p))
    }

    /// Clear a condition's value, keeping its position; false when the index is unknown
    pub fn clear_value(&mut self, index: u32) -> bool {
        match self.get_mut(index) {
            Some(condition) => {
                condition.value = ConditionValue::Empty;
                true
            }
            None => false,
        }
    }

    /// Replace a condition's value; false when the index is unknown
    pub fn set_value(&mut self, index: u32, value: ConditionValue) -> bool {
        match self.get_mut(index) {
            Some(condition) => {
                condition.value = value;
                true
            }
            None => false,
        }
    }

    /// Indices of conditions currently holding a value
    pub fn active_indices(&self) -> IndexSet {
        self.iter()
            .filter(|(_, condition)| condition.is_active())
            .map(|(index, _)| index)
            .collect()
    }

    /// Snapshot used by the validator
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext::new(self.active_indices(), self.total())
    }

    /// Predicate fragments of all active conditions, keyed by index
    pub fn fragments(&self) -> Result<FragmentMap, ConditionError> {
        self.check_limits()?;

        let mut fragments = FragmentMap::new();
        for (index, condition) in self.iter() {
            if let Some(fragment) = condition.fragment()? {
                fragments.insert(index, fragment);
            }
        }
        Ok(fragments)
    }
}

fn position(index: u32) -> Option<usize> {
    index.checked_sub(1).map(|p| p as usize)
}
