//! Implementation of the `promptforge blueprint list` command.

use super::open_store;
use crate::cli::StoreArgs;
use crate::config::Config;
use crate::error::Result;

pub fn cmd_blueprint_list(config: &Config, args: StoreArgs) -> Result<()> {
    let store = open_store(config, &args)?;

    if store.is_empty() {
        println!("No blueprints found in {}", store.root().display());
        return Ok(());
    }

    for entry in store.blueprints() {
        let bp = &entry.blueprint;
        println!(
            "{:20} {:24} rules: {} (hard: {}), tests: {}  [{}]",
            bp.id,
            bp.name,
            bp.rules.len(),
            bp.hard_rules().count(),
            bp.tests.len(),
            entry.path.display()
        );
    }
    Ok(())
}
