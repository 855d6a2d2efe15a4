//! Implementation of the `promptforge check` command.
//!
//! Applies one attempt's worth of validation (parse, schema, HARD rules) to
//! an output that already exists, without calling a model.

use crate::blueprint::Blueprint;
use crate::cli::CheckArgs;
use crate::error::{ForgeError, Result};
use crate::executor::check_output;

pub fn cmd_check(args: CheckArgs) -> Result<()> {
    let blueprint = Blueprint::load(&args.blueprint)?;
    let content = std::fs::read_to_string(&args.output).map_err(|e| {
        ForgeError::UserError(format!(
            "failed to read output file '{}': {}",
            args.output.display(),
            e
        ))
    })?;

    match check_output(&blueprint, &content) {
        None => {
            println!("OK: output satisfies '{}'", blueprint.name);
            Ok(())
        }
        Some(rejection) => {
            let violations = rejection.violations();
            println!("Output rejected ({}):", rejection.kind());
            for violation in &violations {
                println!("  - {}", violation);
            }
            Err(ForgeError::Rejected(violations))
        }
    }
}
