//! States of one execution and the reasons an attempt can be rejected.

use crate::rules::RuleViolation;
use crate::schema::SchemaIssue;
use serde_json::{Map, Value};
use std::time::Duration;

use super::ExecutionResult;

/// Message fed back to the model when its reply did not parse.
pub const INVALID_JSON_VIOLATION: &str = "Response was not valid JSON.";

/// Why an attempt's output was not accepted. Always retryable.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The reply was not well-formed JSON.
    InvalidJson,
    /// The reply did not match the output contract.
    Schema(Vec<SchemaIssue>),
    /// The reply mentioned a forbidden word.
    Rules(Vec<RuleViolation>),
}

impl Rejection {
    /// Violation messages to show the model on the next attempt.
    pub fn violations(&self) -> Vec<String> {
        match self {
            Rejection::InvalidJson => vec![INVALID_JSON_VIOLATION.to_string()],
            Rejection::Schema(issues) => issues
                .iter()
                .map(|issue| format!("Schema Violation: {}", issue))
                .collect(),
            Rejection::Rules(found) => found.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::InvalidJson => "parse",
            Rejection::Schema(_) => "schema",
            Rejection::Rules(_) => "rules",
        }
    }
}

/// One step of the retry loop.
///
/// `attempt` is zero-based. Only `Calling` can fail fatally; every
/// rejection path goes through `Retrying`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionState {
    /// Render the system prompt with the previous attempt's violations.
    Building {
        attempt: u32,
        violations: Vec<String>,
    },
    /// Send the prompt to the model.
    Calling { attempt: u32, system_prompt: String },
    /// Parse the raw completion.
    Parsing {
        attempt: u32,
        raw: String,
        elapsed: Duration,
    },
    /// Check the parsed output against the contract.
    Validating {
        attempt: u32,
        output: Value,
        elapsed: Duration,
    },
    /// Check the conforming output against HARD rules.
    RuleChecking {
        attempt: u32,
        data: Map<String, Value>,
        elapsed: Duration,
    },
    /// The attempt was rejected; decide between another attempt and giving up.
    Retrying { attempt: u32, rejection: Rejection },
    /// Terminal: an accepted output.
    Success(ExecutionResult),
    /// Terminal: the budget ran out. Carries the last attempt's violations only.
    Exhausted {
        attempts: u32,
        violations: Vec<String>,
    },
}

impl ExecutionState {
    pub fn start() -> Self {
        ExecutionState::Building {
            attempt: 0,
            violations: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Success(_) | ExecutionState::Exhausted { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionState::Building { .. } => "building",
            ExecutionState::Calling { .. } => "calling",
            ExecutionState::Parsing { .. } => "parsing",
            ExecutionState::Validating { .. } => "validating",
            ExecutionState::RuleChecking { .. } => "rule_checking",
            ExecutionState::Retrying { .. } => "retrying",
            ExecutionState::Success(_) => "success",
            ExecutionState::Exhausted { .. } => "exhausted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_violation_text() {
        assert_eq!(
            Rejection::InvalidJson.violations(),
            vec!["Response was not valid JSON.".to_string()]
        );
    }

    #[test]
    fn test_schema_violation_format() {
        let rejection = Rejection::Schema(vec![SchemaIssue {
            path: "confidence".to_string(),
            message: "Expected number, received string".to_string(),
        }]);
        assert_eq!(
            rejection.violations(),
            vec!["Schema Violation: confidence - Expected number, received string".to_string()]
        );
        assert_eq!(rejection.kind(), "schema");
    }

    #[test]
    fn test_rule_violation_format() {
        let rejection = Rejection::Rules(vec![RuleViolation {
            rule_id: "r1".to_string(),
            word: "GDPR".to_string(),
        }]);
        assert_eq!(
            rejection.violations(),
            vec!["Violation: Mentioned forbidden word \"GDPR\".".to_string()]
        );
    }

    #[test]
    fn test_start_state() {
        let state = ExecutionState::start();
        assert_eq!(state.name(), "building");
        assert!(!state.is_terminal());
        assert!(
            ExecutionState::Exhausted {
                attempts: 3,
                violations: vec![]
            }
            .is_terminal()
        );
    }
}
