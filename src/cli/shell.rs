//! Hand-parsed CLI surface and session wiring.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::interaction::{PromptInteraction, ScriptedInteraction};
use crate::cli::io;
use crate::cli::output::{self, OutputPreferences};
use crate::config::{self, ConfigManager};
use crate::errors::CliError;
use crate::schema::{FieldSchema, RecordSchema, StepSchema};
use crate::session::{NavigationController, WizardEngine, WizardOutcome, WizardState};
use crate::storage::JsonSubmissionStore;

const USAGE: &str = "\
Usage: intake_core_cli [OPTIONS]

Runs one intake wizard session.

Options:
  --definition <path>       Load the wizard definition (JSON) from <path>
  --submissions-dir <path>  Write accepted submissions under <path>
  --script                  Read actions from stdin instead of prompting
                            (set <field> <value>, next, back, submit, cancel)
  --quiet                   Suppress informational output
  --help                    Show this help text";

#[derive(Debug, Default)]
struct CliOptions {
    definition: Option<PathBuf>,
    submissions_dir: Option<PathBuf>,
    script: bool,
    quiet: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<CliOptions, CliError> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--definition" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("--definition needs a path".to_string()))?;
                options.definition = Some(PathBuf::from(value));
            }
            "--submissions-dir" => {
                let value = iter.next().ok_or_else(|| {
                    CliError::Usage("--submissions-dir needs a path".to_string())
                })?;
                options.submissions_dir = Some(PathBuf::from(value));
            }
            "--script" => options.script = true,
            "--quiet" => options.quiet = true,
            "--help" | "-h" => options.help = true,
            other => {
                return Err(CliError::Usage(format!(
                    "unrecognized option `{other}` (see --help)"
                )))
            }
        }
    }
    Ok(options)
}

/// Entry point used by the binary: wires config, schema, renderer, and the
/// submission store into one wizard session.
pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = ConfigManager::new()?.load()?;
    let script = options.script || std::env::var_os("INTAKE_CORE_CLI_SCRIPT").is_some();
    output::set_preferences(OutputPreferences {
        quiet: options.quiet || config.quiet,
        plain: script,
    });

    let schema = load_schema(
        options
            .definition
            .as_deref()
            .or(config.definition_path.as_deref()),
    )?;
    let submissions_dir = options
        .submissions_dir
        .or(config.submissions_dir)
        .unwrap_or_else(config::default_submissions_dir);

    let state = WizardState::new(Arc::new(schema));
    let mut controller = NavigationController::new(state);
    let mut store = JsonSubmissionStore::new(submissions_dir);

    let outcome = if script {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        let mut interaction = ScriptedInteraction::from_script(&raw).with_echo();
        WizardEngine::new(&mut controller).run(&mut interaction, &mut store)
    } else {
        let mut interaction = PromptInteraction::new();
        WizardEngine::new(&mut controller).run(&mut interaction, &mut store)
    };

    match outcome {
        WizardOutcome::Submitted(snapshot) => {
            io::print_success(format!(
                "Application submitted (session {}).",
                snapshot.session
            ));
            if let Some(path) = store.last_written() {
                io::print_info(format!("Saved to {}", path.display()));
            }
        }
        WizardOutcome::Cancelled => {
            io::print_warning("Wizard cancelled; nothing was submitted.");
        }
    }
    Ok(())
}

fn load_schema(path: Option<&std::path::Path>) -> Result<RecordSchema, CliError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(RecordSchema::from_json(&raw)?)
        }
        None => Ok(builtin_definition()),
    }
}

/// Built-in job application wizard used when no definition file is given.
fn builtin_definition() -> RecordSchema {
    let steps = vec![
        StepSchema::new(
            "personal",
            "Personal details",
            vec![
                FieldSchema::text("first_name", "First name"),
                FieldSchema::text("last_name", "Last name").optional(),
                FieldSchema::email("email", "Email address"),
            ],
        ),
        StepSchema::new(
            "position",
            "Position",
            vec![
                FieldSchema::text("role", "Role applied for"),
                FieldSchema::text("experience", "Relevant experience")
                    .optional()
                    .with_help("A short summary; you can leave this empty."),
            ],
        ),
        StepSchema::new(
            "availability",
            "Availability",
            vec![
                FieldSchema::flag("full_time", "Available full time"),
                FieldSchema::text("notice", "Notice period")
                    .with_help("How soon you can start, e.g. `two weeks`."),
                FieldSchema::text("notes", "Anything else we should know").optional(),
            ],
        ),
    ];
    RecordSchema::new("job-application", steps)
        .expect("built-in definition satisfies the schema invariants")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_definition_is_well_formed() {
        let schema = builtin_definition();
        assert_eq!(schema.step_count(), 3);
        assert_eq!(schema.step(0).unwrap().name(), "personal");
        assert_eq!(schema.step(2).unwrap().name(), "availability");
    }

    #[test]
    fn parse_args_collects_options() {
        let args: Vec<String> = [
            "--definition",
            "wizard.json",
            "--submissions-dir",
            "out",
            "--script",
            "--quiet",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        let options = parse_args(&args).unwrap();
        assert_eq!(options.definition.as_deref(), Some("wizard.json".as_ref()));
        assert_eq!(options.submissions_dir.as_deref(), Some("out".as_ref()));
        assert!(options.script);
        assert!(options.quiet);
        assert!(!options.help);
    }

    #[test]
    fn parse_args_rejects_unknown_options() {
        let args = vec!["--frobnicate".to_string()];
        assert!(matches!(parse_args(&args), Err(CliError::Usage(_))));
    }

    #[test]
    fn parse_args_requires_option_values() {
        let args = vec!["--definition".to_string()];
        assert!(matches!(parse_args(&args), Err(CliError::Usage(_))));
    }
}
