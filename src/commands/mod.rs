//! Command implementations for promptforge.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers they share: config loading, input
//! parsing, store opening and run-log recording.

mod blueprints;
mod check;
mod execute;
mod prompt;
mod test_cmd;


use crate::blueprint::Inputs;
use crate::cli::{BlueprintAction, Cli, Command, InputArgs, StoreArgs, TestAction};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{ForgeError, Result};
use crate::events::{Event, append_event};
use crate::store::BlueprintStore;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Execute(args) => execute::cmd_execute(&config, args),
        Command::Prompt(args) => prompt::cmd_prompt(args),
        Command::Check(args) => check::cmd_check(args),
        Command::Test(test_cmd) => match test_cmd.action {
            TestAction::Run(args) => test_cmd::cmd_test_run(&config, args),
            TestAction::List(args) => test_cmd::cmd_test_list(&config, args),
        },
        Command::Blueprint(bp_cmd) => match bp_cmd.action {
            BlueprintAction::List(args) => blueprints::cmd_blueprint_list(&config, args),
        },
    }
}

/// Load the config named by `--config`, or `promptforge.yaml` if present.
///
/// An explicit path must exist; the default path may be absent.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(DEFAULT_CONFIG_FILE),
    }
}

/// Merge `--inputs-file` and `--input` values; `--input` wins on conflicts.
fn resolve_inputs(args: &InputArgs) -> Result<Inputs> {
    let mut inputs = match &args.inputs_file {
        Some(path) => read_inputs_file(path)?,
        None => Inputs::new(),
    };

    for pair in &args.inputs {
        let (key, value) = parse_input_pair(pair)?;
        inputs.insert(key, value);
    }

    Ok(inputs)
}

/// Parse `KEY=VALUE`. VALUE is JSON if it parses as JSON, otherwise a plain string.
fn parse_input_pair(pair: &str) -> Result<(String, Value)> {
    let (key, raw) = pair.split_once('=').ok_or_else(|| {
        ForgeError::UserError(format!(
            "invalid input '{}': expected KEY=VALUE",
            pair
        ))
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ForgeError::UserError(format!(
            "invalid input '{}': key must not be empty",
            pair
        )));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn read_inputs_file(path: &Path) -> Result<Inputs> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ForgeError::UserError(format!(
            "failed to read inputs file '{}': {}",
            path.display(),
            e
        ))
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ForgeError::UserError(format!(
            "inputs file '{}' must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(ForgeError::UserError(format!(
            "failed to parse inputs file '{}': {}",
            path.display(),
            e
        ))),
    }
}

fn open_store(config: &Config, args: &StoreArgs) -> Result<BlueprintStore> {
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.blueprints_dir));
    BlueprintStore::open(dir, &config.blueprint_patterns)
}

/// Append to the run log if one is configured.
///
/// A failed write is logged and otherwise ignored; it never changes a
/// command's outcome.
fn record_event(config: &Config, event: Event) {
    if let Some(path) = &config.events_file
        && let Err(e) = append_event(path, &event)
    {
        tracing::warn!(error = %e, "failed to record run event");
    }
}

/// Print a JSON value on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ForgeError::UserError(format!("failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
