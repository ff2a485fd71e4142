use crate::logging::codes;

/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating custom logic pipeline configuration");

    crate::lexical::validate_tokenization()?;
    crate::validation::init_validation_logging()?;

    let stage_codes = [
        codes::conditions::INVALID_FIELD_NAME,
        codes::conditions::TOO_MANY_CONDITIONS,
        codes::conditions::TOO_MANY_SELECTION_VALUES,
        codes::conditions::INVERTED_RANGE,
        codes::conditions::FRAGMENT_TOO_LONG,
        codes::composition::SUBSTITUTION_FAILED,
        codes::composition::APPLY_BLOCKED,
    ];
    for code in &stage_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Pipeline error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Custom logic pipeline validation succeeded",
        "stages_validated" => 3,
        "condition_analysis" => true,
        "validation" => true,
        "substitution" => true
    );

    Ok(())
}
