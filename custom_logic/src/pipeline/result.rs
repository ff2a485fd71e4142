use crate::substitution::ComposedPredicate;
use crate::validation::IndexSet;
use std::time::Duration;

/// Outcome of a full composition run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub predicate: ComposedPredicate,
    pub active: IndexSet,
    pub used: IndexSet,
    pub custom_logic_applied: bool,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        predicate: ComposedPredicate,
        active: IndexSet,
        used: IndexSet,
        custom_logic_applied: bool,
        token_count: usize,
        processing_duration: Duration,
    ) -> Self {
        Self {
            predicate,
            active,
            used,
            custom_logic_applied,
            token_count,
            processing_duration,
        }
    }

    /// Predicate text safe to append after `WHERE ... AND`
    pub fn where_fragment(&self) -> String {
        self.predicate.embeddable()
    }

    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Custom logic composition succeeded",
            "active" => self.active.len(),
            "custom_logic" => self.custom_logic_applied,
            "tokens" => self.token_count,
            "duration_ms" => format!("{:.3}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
