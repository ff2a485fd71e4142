// build.rs - TOML-driven limit constants for the custom logic engine
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    expression: ExpressionLimits,
    conditions: ConditionLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ExpressionLimits {
    max_expression_length: usize,
    max_token_count: usize,
    max_nesting_depth: usize,
}

#[derive(serde::Deserialize)]
struct ConditionLimits {
    max_conditions: u32,
    max_selection_values: usize,
    max_fragment_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CUSTOM_LOGIC_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=CUSTOM_LOGIC_CONFIG_DIR");

    let profile =
        env::var("CUSTOM_LOGIC_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("CUSTOM_LOGIC_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the custom_logic directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 100_000;
    const ABSOLUTE_MAX_CONDITIONS: u32 = 10_000;
    const ABSOLUTE_MAX_NESTING_DEPTH: usize = 256;

    if config.expression.max_expression_length == 0
        || config.expression.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH
    {
        panic!("LIMITS: max_expression_length must be in 1..={ABSOLUTE_MAX_EXPRESSION_LENGTH}");
    }

    if config.expression.max_token_count == 0 {
        panic!("LIMITS: max_token_count cannot be zero");
    }

    if config.expression.max_nesting_depth == 0
        || config.expression.max_nesting_depth > ABSOLUTE_MAX_NESTING_DEPTH
    {
        panic!("LIMITS: max_nesting_depth must be in 1..={ABSOLUTE_MAX_NESTING_DEPTH}");
    }

    if config.conditions.max_conditions == 0
        || config.conditions.max_conditions > ABSOLUTE_MAX_CONDITIONS
    {
        panic!("LIMITS: max_conditions must be in 1..={ABSOLUTE_MAX_CONDITIONS}");
    }

    if profile == "production" && config.expression.max_expression_length > 10_000 {
        panic!("PRODUCTION: max_expression_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod expression {{
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_NESTING_DEPTH: usize = {};
    }}

    pub mod conditions {{
        pub const MAX_CONDITIONS: u32 = {};
        pub const MAX_SELECTION_VALUES: usize = {};
        pub const MAX_FRAGMENT_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.expression.max_expression_length,
        config.expression.max_token_count,
        config.expression.max_nesting_depth,
        config.conditions.max_conditions,
        config.conditions.max_selection_values,
        config.conditions.max_fragment_length,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
