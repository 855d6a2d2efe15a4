//! Implementation of the `promptforge test` commands.

use super::{open_store, print_json, record_event};
use crate::cli::{StoreArgs, TestRunArgs};
use crate::config::Config;
use crate::envelope::{ErrorResponse, TestRunResponse};
use crate::error::{ForgeError, Result};
use crate::events::{Event, EventAction};
use crate::executor::PromptExecutor;
use crate::runner::{TestReport, run_test};
use serde_json::json;

/// Run one test and grade it. Exits non-zero when any assertion fails.
pub fn cmd_test_run(config: &Config, args: TestRunArgs) -> Result<()> {
    let store = open_store(config, &args.store)?;
    let (blueprint, test) = store.test(&args.test_id)?;
    let executor = PromptExecutor::new(config.model_client()?);

    let report = match run_test(&executor, blueprint, test) {
        Ok(report) => report,
        Err(err) => {
            record_event(
                config,
                Event::new(EventAction::ExecuteFailed)
                    .with_blueprint(&blueprint.id)
                    .with_test(&test.id)
                    .with_details(json!({"error": err.to_string()})),
            );
            if args.json {
                print_json(&ErrorResponse::new("Test execution failed", &err))?;
            }
            return Err(err);
        }
    };

    record_event(
        config,
        Event::new(EventAction::TestRun)
            .with_blueprint(&blueprint.id)
            .with_test(&test.id)
            .with_details(json!({
                "passed": report.passed,
                "attempts": report.result.attempts,
                "duration_ms": report.result.duration_millis(),
                "failed_assertions": report.failed().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            })),
    );

    if args.json {
        print_json(&TestRunResponse::from(&report))?;
    } else {
        print_report(&report);
    }

    if report.passed {
        Ok(())
    } else {
        Err(ForgeError::TestFailed(format!(
            "test '{}': {} of {} assertion(s) failed",
            report.test_id,
            report.failed().count(),
            report.assertion_results.len()
        )))
    }
}

fn print_report(report: &TestReport) {
    let verdict = if report.passed { "PASS" } else { "FAIL" };
    println!(
        "{} {} ({} attempt(s), {:.0} ms)",
        verdict,
        report.test_id,
        report.result.attempts,
        report.result.duration_millis()
    );
    for result in &report.assertion_results {
        let mark = if result.passed { "ok" } else { "FAILED" };
        println!("  [{}] {}: {}", mark, result.id, result.message);
    }
}

pub fn cmd_test_list(config: &Config, args: StoreArgs) -> Result<()> {
    let store = open_store(config, &args)?;

    if store.tests().next().is_none() {
        println!("No tests found in {}", store.root().display());
        return Ok(());
    }

    for (blueprint, test) in store.tests() {
        println!(
            "{:20} {:20} {} ({} assertion(s))",
            test.id,
            blueprint.id,
            test.name,
            test.assertions().len()
        );
    }
    Ok(())
}
