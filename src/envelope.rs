//! JSON envelopes printed by `--json`.
//!
//! Shapes:
//! - success: `{"ok": true, "result": {...}, "duration": 812.4}`
//! - failure: `{"ok": false, "message": "...", "error": "..."}`
//! - test run: `{"ok": true, "passed": bool, "result", "duration", "assertionResults"}`
//!
//! `duration` is in milliseconds.

use crate::assertions::AssertionResult;
use crate::executor::ExecutionResult;
use crate::runner::TestReport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub ok: bool,
    pub result: Map<String, Value>,
    pub duration: f64,
}

impl From<&ExecutionResult> for ExecuteResponse {
    fn from(result: &ExecutionResult) -> Self {
        Self {
            ok: true,
            result: result.data.clone(),
            duration: result.duration_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    /// `message` is a short context line (`Failed to execute`); `error` is the cause.
    pub fn new(message: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            message: message.into(),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunResponse {
    pub ok: bool,
    pub passed: bool,
    pub result: Map<String, Value>,
    pub duration: f64,
    pub assertion_results: Vec<AssertionResult>,
}

impl From<&TestReport> for TestRunResponse {
    fn from(report: &TestReport) -> Self {
        Self {
            ok: true,
            passed: report.passed,
            result: report.result.data.clone(),
            duration: report.result.duration_millis(),
            assertion_results: report.assertion_results.clone(),
        }
    }
}
