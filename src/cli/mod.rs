//! CLI argument parsing for promptforge.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// promptforge: constrained LLM generation from declarative blueprints.
///
/// A blueprint names a role, a task template, behavioral rules and the JSON
/// shape the answer must have. promptforge calls the model until the output
/// satisfies the shape and the HARD rules, feeding violations back on each
/// retry, and grades outputs against the blueprint's tests.
#[derive(Parser, Debug)]
#[command(name = "promptforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./promptforge.yaml; missing file means defaults).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for promptforge.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a blueprint against the configured model.
    ///
    /// Retries up to three times, showing the model the previous attempt's
    /// violations, and prints the accepted JSON output.
    Execute(ExecuteArgs),

    /// Print the system and user prompts without calling the model.
    Prompt(PromptArgs),

    /// Check an existing output file against a blueprint's schema and HARD rules.
    Check(CheckArgs),

    /// Blueprint test commands.
    Test(TestCommand),

    /// Blueprint store commands.
    Blueprint(BlueprintCommand),
}

/// Input values shared by `execute` and `prompt`.
#[derive(clap::Args, Debug, Default)]
pub struct InputArgs {
    /// Input value as KEY=VALUE; VALUE is parsed as JSON when possible (repeatable).
    #[arg(short, long = "input", value_name = "KEY=VALUE")]
    pub inputs: Vec<String>,

    /// JSON object file with input values; `--input` entries override it.
    #[arg(long, value_name = "FILE")]
    pub inputs_file: Option<PathBuf>,
}

/// Arguments for the `execute` command.
#[derive(Parser, Debug)]
pub struct ExecuteArgs {
    /// Blueprint file (.yaml, .yml or .json).
    pub blueprint: PathBuf,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print the `{ok, result, duration}` JSON envelope.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `prompt` command.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Blueprint file (.yaml, .yml or .json).
    pub blueprint: PathBuf,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Render the prompt as a retry after these violations (repeatable).
    #[arg(long = "violation", value_name = "TEXT")]
    pub violations: Vec<String>,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Blueprint file (.yaml, .yml or .json).
    pub blueprint: PathBuf,

    /// File containing the candidate JSON output.
    pub output: PathBuf,
}

/// Test subcommands.
#[derive(Parser, Debug)]
pub struct TestCommand {
    #[command(subcommand)]
    pub action: TestAction,
}

/// Available test actions.
#[derive(Subcommand, Debug)]
pub enum TestAction {
    /// Run one test by id and grade its assertions.
    Run(TestRunArgs),

    /// List every test in the blueprint store.
    List(StoreArgs),
}

/// Arguments for the `test run` command.
#[derive(Parser, Debug)]
pub struct TestRunArgs {
    /// Test id.
    pub test_id: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Print the `{ok, passed, result, duration, assertionResults}` JSON envelope.
    #[arg(long)]
    pub json: bool,
}

/// Blueprint subcommands.
#[derive(Parser, Debug)]
pub struct BlueprintCommand {
    #[command(subcommand)]
    pub action: BlueprintAction,
}

/// Available blueprint actions.
#[derive(Subcommand, Debug)]
pub enum BlueprintAction {
    /// List blueprints in the store.
    List(StoreArgs),
}

/// Location of the blueprint store.
#[derive(clap::Args, Debug, Default)]
pub struct StoreArgs {
    /// Blueprints directory (overrides `blueprints_dir` in config).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
