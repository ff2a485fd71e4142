use crate::config::compile_time::conditions::{MAX_CONDITIONS, MAX_SELECTION_VALUES};
use crate::lexical::{get_expression_limits, ExpressionLimits};
use crate::validation::{IndexBound, ValidationMode};

/// Information about pipeline capabilities
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_stages: usize,
    pub expression_limits: ExpressionLimits,
    pub max_conditions: u32,
    pub max_selection_values: usize,
    pub validation_modes: Vec<ValidationMode>,
    pub index_bounds: Vec<IndexBound>,
    pub build_profile: &'static str,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        let join = |items: Vec<String>| items.join(", ");
        format!(
            "Custom Logic Pipeline:\n\
             - Pipeline Stages: {}\n\
             - Max Expression Length: {}\n\
             - Max Tokens: {}\n\
             - Max Nesting Depth: {}\n\
             - Max Conditions: {}\n\
             - Max Selection Values: {}\n\
             - Validation Modes: {}\n\
             - Index Bounds: {}\n\
             - Build Profile: {}",
            self.pipeline_stages,
            self.expression_limits.max_expression_length,
            self.expression_limits.max_token_count,
            self.expression_limits.max_nesting_depth,
            self.max_conditions,
            self.max_selection_values,
            join(self.validation_modes.iter().map(|m| m.to_string()).collect()),
            join(self.index_bounds.iter().map(|b| b.to_string()).collect()),
            self.build_profile
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage custom logic pipeline supporting up to {} conditions",
            self.pipeline_stages, self.max_conditions
        )
    }
}

/// Get pipeline capabilities information
pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        pipeline_stages: 3,
        expression_limits: get_expression_limits(),
        max_conditions: MAX_CONDITIONS,
        max_selection_values: MAX_SELECTION_VALUES,
        validation_modes: vec![ValidationMode::Eager, ValidationMode::Lazy],
        index_bounds: vec![IndexBound::TotalConditions, IndexBound::ActiveCount],
        build_profile: crate::config::build_info::profile(),
    }
}
