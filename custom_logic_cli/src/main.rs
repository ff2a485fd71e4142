//! # Custom Logic CLI
//!
//! Validates custom AND/OR logic against a condition list and composes the
//! final filter predicate.
//!
//! ```bash
//! custom-logic check --conditions filters.json --logic "1 OR (2 AND 3)"
//! custom-logic compose --conditions filters.json --logic "1 OR 2" --json
//! custom-logic default-logic --conditions filters.json
//! custom-logic substitute --logic "1 OR 2" --fragment "1=City = 'Pune'" --fragment "2=Beds > 2"
//! ```

use clap::{Parser, Subcommand};
use custom_logic::config::RuntimeConfig;
use custom_logic::logging::{self, LogCrateLogger, LogLevel, LoggingService};
use custom_logic::pipeline::{self, PipelineOptions};
use custom_logic::substitution::{self, FragmentMap, SubstitutionOptions};
use custom_logic::{
    check, default_logic, Condition, ConditionSet, IndexBound, ValidationError, ValidationOptions,
};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Custom logic validation and predicate composition
#[derive(Parser, Debug)]
#[command(name = "custom-logic")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log output (-v errors, -vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Runtime preferences file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a logic expression against a condition list
    Check {
        /// Condition list (JSON)
        #[arg(short, long)]
        conditions: PathBuf,

        /// Logic expression, e.g. "1 AND (2 OR 3)"
        #[arg(short, long)]
        logic: String,

        /// Index bound: total_conditions or active_count
        #[arg(long)]
        bound: Option<IndexBound>,
    },

    /// Validate and compose the final predicate
    Compose {
        /// Condition list (JSON)
        #[arg(short, long)]
        conditions: PathBuf,

        /// Logic expression; omitted or blank means AND of all active conditions
        #[arg(short, long)]
        logic: Option<String>,

        /// Index bound: total_conditions or active_count
        #[arg(long)]
        bound: Option<IndexBound>,

        /// Wrap a top-level AND/OR in one pair of parentheses
        #[arg(long)]
        wrap: bool,
    },

    /// Print the expression used when custom logic is first enabled
    DefaultLogic {
        /// Condition list (JSON)
        #[arg(short, long)]
        conditions: PathBuf,
    },

    /// Substitute fragments into an expression without validating it
    Substitute {
        /// Logic expression
        #[arg(short, long)]
        logic: String,

        /// Fragment for one index, as N=TEXT (repeatable)
        #[arg(short, long = "fragment", value_parser = parse_fragment)]
        fragments: Vec<(u32, String)>,

        /// Wrap a top-level AND/OR in one pair of parentheses
        #[arg(long)]
        wrap: bool,
    },

    /// Show pipeline limits and build information
    Info,
}

/// What a command printed and whether it succeeded
#[derive(Debug)]
struct Outcome {
    output: String,
    success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }

    fn failed(output: String) -> Self {
        Self {
            output,
            success: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConditionsFile {
    List(Vec<Condition>),
    Set(ConditionSet),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let outcome = run(&cli)?;
    println!("{}", outcome.output);

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: u8) -> CliResult<()> {
    let filter = match verbose {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .try_init()?;

    let service = LoggingService::new(Arc::new(LogCrateLogger::new()), LogLevel::Debug);
    logging::init_global_logging_with_service(Arc::new(service))?;

    custom_logic::log_debug!("Custom logic CLI starting",
        "version" => env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn run(cli: &Cli) -> CliResult<Outcome> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_file(path)?,
        None => RuntimeConfig::default(),
    };
    // first call wins
    let _ = logging::config::init_runtime_preferences(config.logging.clone());

    match &cli.command {
        Commands::Check {
            conditions,
            logic,
            bound,
        } => {
            let set = load_conditions(conditions)?;
            let bound = bound.unwrap_or(config.validation.bound);
            Ok(run_check(&set, logic, bound, cli.json))
        }
        Commands::Compose {
            conditions,
            logic,
            bound,
            wrap,
        } => {
            let set = load_conditions(conditions)?;
            let mut options = PipelineOptions::from(&config);
            if let Some(bound) = bound {
                options.validation = ValidationOptions::new(*bound);
            }
            options.substitution.wrap_top_level |= *wrap;
            run_compose(&set, logic.as_deref(), &options, cli.json)
        }
        Commands::DefaultLogic { conditions } => {
            let set = load_conditions(conditions)?;
            let logic = default_logic(&set.active_indices());
            let output = if cli.json {
                json!({ "logic": logic }).to_string()
            } else {
                logic
            };
            Ok(Outcome::ok(output))
        }
        Commands::Substitute {
            logic,
            fragments,
            wrap,
        } => {
            let mut options = SubstitutionOptions::from(&config.substitution);
            options.wrap_top_level |= *wrap;
            let map: FragmentMap = fragments.iter().cloned().collect();
            let predicate = substitution::substitute(logic, &map, &options)?;
            let output = if cli.json {
                serde_json::to_string_pretty(&predicate)?
            } else {
                predicate.expression
            };
            Ok(Outcome::ok(output))
        }
        Commands::Info => {
            let info = pipeline::get_pipeline_info();
            Ok(Outcome::ok(format!(
                "{}\n{}\n{}",
                info.report(),
                custom_logic::config::build_info::source_info(),
                logging::get_system_diagnostics()
            )))
        }
    }
}

/// Read a condition list; accepts either a bare array or `{ "name", "conditions" }`
fn load_conditions(path: &Path) -> CliResult<ConditionSet> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read conditions file {}: {}", path.display(), e))?;

    let set = match serde_json::from_str::<ConditionsFile>(&content)? {
        ConditionsFile::List(conditions) => ConditionSet::from_conditions(conditions)?,
        ConditionsFile::Set(set) => {
            set.check_limits()?;
            set
        }
    };
    Ok(set)
}

fn run_check(set: &ConditionSet, logic: &str, bound: IndexBound, as_json: bool) -> Outcome {
    let context = set.validation_context();
    match check(logic, &context, &ValidationOptions::new(bound)) {
        None => {
            let output = if as_json {
                json!({ "valid": true, "logic": logic }).to_string()
            } else {
                "Logic is valid".to_string()
            };
            Outcome::ok(output)
        }
        Some(error) => Outcome::failed(render_validation_error(&error, logic, as_json)),
    }
}

fn run_compose(
    set: &ConditionSet,
    logic: Option<&str>,
    options: &PipelineOptions,
    as_json: bool,
) -> CliResult<Outcome> {
    match pipeline::compose_filter(set, logic, options) {
        Ok(result) => {
            let output = if as_json {
                serde_json::to_string_pretty(&json!({
                    "predicate": result.predicate.expression,
                    "where_fragment": result.where_fragment(),
                    "active": result.active,
                    "used": result.used,
                    "custom_logic_applied": result.custom_logic_applied,
                }))?
            } else {
                result.predicate.expression
            };
            Ok(Outcome::ok(output))
        }
        Err(error) => match error.validation_error() {
            Some(validation) => Ok(Outcome::failed(render_validation_error(
                validation,
                logic.unwrap_or_default(),
                as_json,
            ))),
            None => Err(error.into()),
        },
    }
}

fn render_validation_error(error: &ValidationError, logic: &str, as_json: bool) -> String {
    if as_json {
        return json!({
            "valid": false,
            "code": error.error_code().as_str(),
            "kind": error.kind().as_str(),
            "message": error.to_string(),
            "column": error.span().map(|span| span.column()),
        })
        .to_string();
    }

    let mut output = format!("error[{}]: {}", error.error_code(), error);
    if let Some(span) = error.span() {
        let normalized = custom_logic::lexical::normalize(logic);
        output.push('\n');
        output.push_str(&span.underline(&normalized.display));
    }
    output.push_str(&format!("\n  help: {}", error.recommended_action()));
    output
}

fn parse_fragment(value: &str) -> Result<(u32, String), String> {
    let (index, text) = value
        .split_once('=')
        .ok_or_else(|| format!("expected N=TEXT, got '{}'", value))?;
    let index = index
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid condition number '{}'", index.trim()))?;
    Ok((index, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    const LISTING_FILTERS: &str = r#"[
        {"field": "City", "value": {"type": "selection", "values": ["Pune"]}},
        {"field": "Price", "value": {"type": "number_range", "min": 100, "max": 200}},
        {"field": "Status"}
    ]"#;

    fn conditions_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fragment() {
        assert_eq!(
            parse_fragment("2=Price >= 100").unwrap(),
            (2, "Price >= 100".to_string())
        );
        assert!(parse_fragment("Price").is_err());
        assert!(parse_fragment("x=1").is_err());
    }

    #[test]
    fn test_load_conditions_accepts_both_shapes() {
        let list = conditions_file(LISTING_FILTERS);
        let set = load_conditions(list.path()).unwrap();
        assert_eq!(set.total(), 3);

        let named = conditions_file(&format!(
            r#"{{"name": "listing", "conditions": {}}}"#,
            LISTING_FILTERS
        ));
        let set = load_conditions(named.path()).unwrap();
        assert_eq!(set.name.as_deref(), Some("listing"));
        assert_eq!(set.active_indices().len(), 2);
    }

    #[test]
    fn test_check_reports_first_error() {
        let file = conditions_file(LISTING_FILTERS);
        let set = load_conditions(file.path()).unwrap();

        let outcome = run_check(&set, "1 OR 3", IndexBound::TotalConditions, false);
        assert!(!outcome.success);
        assert!(outcome
            .output
            .contains("Condition is not used in the logic: 2; condition has no value: 3"));

        let outcome = run_check(&set, "1 OR 2", IndexBound::TotalConditions, true);
        assert!(outcome.success);
        assert!(outcome.output.contains("\"valid\":true"));
    }

    #[test]
    fn test_check_underlines_span() {
        let file = conditions_file(LISTING_FILTERS);
        let set = load_conditions(file.path()).unwrap();

        let outcome = run_check(&set, "1 OR", IndexBound::TotalConditions, false);
        assert!(!outcome.success);
        assert!(outcome.output.contains("1 OR\n  ^^"));
    }

    #[test]
    fn test_check_takes_no_mode_flag() {
        let base = ["custom-logic", "check", "-c", "filters.json", "-l", "1 OR 2"];
        assert_matches!(
            Cli::try_parse_from(base).map(|cli| cli.command),
            Ok(Commands::Check { bound: None, .. })
        );

        let with_mode = base.iter().copied().chain(["--mode", "lazy"]);
        assert!(Cli::try_parse_from(with_mode).is_err());
    }

    #[test]
    fn test_compose() {
        let file = conditions_file(LISTING_FILTERS);
        let set = load_conditions(file.path()).unwrap();

        let outcome = run_compose(&set, Some("1 OR 2"), &PipelineOptions::default(), false).unwrap();
        assert!(outcome.success);
        assert_eq!(
            outcome.output,
            "(City = 'Pune') OR (Price >= 100 AND Price <= 200)"
        );

        let outcome = run_compose(&set, Some("1 AND"), &PipelineOptions::default(), true).unwrap();
        assert!(!outcome.success);
        assert!(outcome.output.contains("\"valid\":false"));
    }

    #[test]
    fn test_missing_conditions_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_conditions(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
