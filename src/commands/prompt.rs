//! Implementation of the `promptforge prompt` command.

use super::resolve_inputs;
use crate::blueprint::Blueprint;
use crate::cli::PromptArgs;
use crate::error::Result;
use crate::prompt::{PromptBuilder, substitute, user_prompt};
use crate::schema::OutputContract;

/// Print the system and user prompts an execution would send.
pub fn cmd_prompt(args: PromptArgs) -> Result<()> {
    let blueprint = Blueprint::load(&args.blueprint)?;
    let inputs = resolve_inputs(&args.inputs)?;

    let missing = blueprint.missing_inputs(&inputs);
    if !missing.is_empty() {
        eprintln!("warning: no value for input slot(s): {}", missing.join(", "));
    }

    let contract = OutputContract::from_schema(&blueprint.output_schema);
    let system = PromptBuilder::new(&blueprint, &contract).build(&args.violations);
    let user = user_prompt(&substitute(&blueprint.task_template, &inputs));

    println!("--- system ---");
    println!("{}", system);
    println!("--- user ---");
    println!("{}", user);
    Ok(())
}
