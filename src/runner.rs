//! Runs a blueprint's regression test and grades the output.

use crate::assertions::{self, AssertionResult};
use crate::blueprint::{Blueprint, PromptTest};
use crate::error::Result;
use crate::executor::{ExecutionResult, PromptExecutor};
use crate::model::ModelClient;

/// Outcome of one test run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    pub test_id: String,
    /// True iff every assertion passed (vacuously true with none).
    pub passed: bool,
    pub result: ExecutionResult,
    pub assertion_results: Vec<AssertionResult>,
}

impl TestReport {
    pub fn failed(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertion_results.iter().filter(|r| !r.passed)
    }
}

/// Execute `test.inputs` against `blueprint` and grade the accepted output.
///
/// Execution failures propagate unchanged; failing assertions are reported
/// in the returned [`TestReport`].
pub fn run_test<C: ModelClient>(
    executor: &PromptExecutor<C>,
    blueprint: &Blueprint,
    test: &PromptTest,
) -> Result<TestReport> {
    let span = tracing::info_span!("test", id = %test.id);
    let _enter = span.enter();

    let result = executor.execute(blueprint, &test.inputs)?;
    let assertion_results = assertions::run(&result.data, test.assertions());
    let passed = assertion_results.iter().all(|r| r.passed);

    tracing::info!(
        passed,
        assertions = assertion_results.len(),
        "test graded"
    );

    Ok(TestReport {
        test_id: test.id.clone(),
        passed,
        result,
        assertion_results,
    })
}
