//! Implementation of the `promptforge execute` command.

use super::{print_json, record_event, resolve_inputs};
use crate::blueprint::Blueprint;
use crate::cli::ExecuteArgs;
use crate::config::Config;
use crate::envelope::{ErrorResponse, ExecuteResponse};
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::executor::PromptExecutor;
use serde_json::json;

pub fn cmd_execute(config: &Config, args: ExecuteArgs) -> Result<()> {
    let blueprint = Blueprint::load(&args.blueprint)?;
    let inputs = resolve_inputs(&args.inputs)?;
    let executor = PromptExecutor::new(config.model_client()?);

    match executor.execute(&blueprint, &inputs) {
        Ok(result) => {
            record_event(
                config,
                Event::new(EventAction::Execute)
                    .with_blueprint(&blueprint.id)
                    .with_details(json!({
                        "attempts": result.attempts,
                        "duration_ms": result.duration_millis(),
                        "model": config.model,
                    })),
            );

            if args.json {
                print_json(&ExecuteResponse::from(&result))
            } else {
                print_json(&result.data)
            }
        }
        Err(err) => {
            record_event(
                config,
                Event::new(EventAction::ExecuteFailed)
                    .with_blueprint(&blueprint.id)
                    .with_details(json!({
                        "error": err.to_string(),
                        "model": config.model,
                    })),
            );

            if args.json {
                print_json(&ErrorResponse::new("Failed to execute", &err))?;
            }
            Err(err)
        }
    }
}
