//! The constrained-generation loop.
//!
//! `PromptExecutor::execute` drives an explicit state machine:
//!
//! ```text
//! Building -> Calling -> Parsing -> Validating -> RuleChecking -> Success
//!                 |          |           |              |
//!              (fatal)       +-----------+--------------+-> Retrying -> Building
//!                                                                  \-> Exhausted
//! ```
//!
//! Each rejected attempt's violations are rendered into the next system
//! prompt, so every retry is more constrained than the last. The budget is a
//! fixed attempt count; there is no wall-clock deadline.

mod state;


pub use state::{ExecutionState, INVALID_JSON_VIOLATION, Rejection};

use crate::blueprint::{Blueprint, Inputs};
use crate::error::{ForgeError, Result};
use crate::model::{ModelClient, ModelRequest};
use crate::prompt::{PromptBuilder, substitute, user_prompt};
use crate::rules::RuleChecker;
use crate::schema::OutputContract;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};

/// Attempts per execution.
pub const MAX_ATTEMPTS: u32 = 3;

/// Accepted output of one execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// The validated JSON object, including fields outside the schema.
    pub data: Map<String, Value>,
    /// Duration of the model call that produced `data`.
    pub duration: Duration,
    /// Number of model calls made (1-based).
    pub attempts: u32,
}

impl ExecutionResult {
    pub fn duration_millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Runs blueprints against an injected model client.
///
/// Holds no per-execution state, so a single executor can serve concurrent
/// callers when its client is `Sync`.
#[derive(Debug, Clone)]
pub struct PromptExecutor<C> {
    client: C,
}

impl<C: ModelClient> PromptExecutor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Produce an output for `blueprint` that passes its schema and HARD rules.
    ///
    /// # Errors
    ///
    /// * `ForgeError::Transport` - the provider failed or returned no content
    /// * `ForgeError::RetriesExhausted` - no compliant output in `MAX_ATTEMPTS` calls
    pub fn execute(&self, blueprint: &Blueprint, inputs: &Inputs) -> Result<ExecutionResult> {
        let span = tracing::info_span!("execute", blueprint = %blueprint.id);
        let _enter = span.enter();

        let run = Execution::prepare(blueprint, inputs);
        let mut state = ExecutionState::start();

        loop {
            state = match state {
                ExecutionState::Success(result) => {
                    tracing::info!(
                        attempts = result.attempts,
                        duration_ms = result.duration_millis(),
                        "execution succeeded"
                    );
                    return Ok(result);
                }
                ExecutionState::Exhausted {
                    attempts,
                    violations,
                } => {
                    tracing::warn!(attempts, ?violations, "execution exhausted its attempts");
                    return Err(ForgeError::RetriesExhausted {
                        attempts,
                        violations,
                    });
                }
                other => run.step(&self.client, other)?,
            };
        }
    }
}

/// The acceptance checks one attempt's raw reply goes through.
///
/// `execute` runs the stages one state at a time; [`check_output`] runs
/// them back to back on a reply that already exists.
#[derive(Debug, Clone)]
pub struct AttemptCheck {
    contract: OutputContract,
    rules: RuleChecker,
}

impl AttemptCheck {
    pub fn new(blueprint: &Blueprint) -> Self {
        Self {
            contract: OutputContract::from_schema(&blueprint.output_schema),
            rules: RuleChecker::new(&blueprint.rules),
        }
    }

    pub fn contract(&self) -> &OutputContract {
        &self.contract
    }

    /// Parse, validate and rule-check `raw`.
    pub fn check(&self, raw: &str) -> std::result::Result<Map<String, Value>, Rejection> {
        let output = self.parse(raw)?;
        let data = self.conform(output)?;
        self.enforce_rules(&data)?;
        Ok(data)
    }

    fn parse(&self, raw: &str) -> std::result::Result<Value, Rejection> {
        serde_json::from_str(raw).map_err(|_| Rejection::InvalidJson)
    }

    fn conform(&self, output: Value) -> std::result::Result<Map<String, Value>, Rejection> {
        self.contract.conform(output).map_err(Rejection::Schema)
    }

    fn enforce_rules(&self, data: &Map<String, Value>) -> std::result::Result<(), Rejection> {
        let found = self.rules.check(data);
        if found.is_empty() {
            Ok(())
        } else {
            Err(Rejection::Rules(found))
        }
    }
}

/// Why `raw` would be rejected as an attempt's reply for `blueprint`, if at all.
pub fn check_output(blueprint: &Blueprint, raw: &str) -> Option<Rejection> {
    AttemptCheck::new(blueprint).check(raw).err()
}

/// Everything derived from the blueprint and inputs once per execution.
struct Execution {
    user_prompt: String,
    prompts: PromptBuilder,
    checks: AttemptCheck,
    max_attempts: u32,
}

impl Execution {
    fn prepare(blueprint: &Blueprint, inputs: &Inputs) -> Self {
        let missing = blueprint.missing_inputs(inputs);
        if !missing.is_empty() {
            tracing::warn!(?missing, "declared input slots have no value");
        }

        let checks = AttemptCheck::new(blueprint);
        let task = substitute(&blueprint.task_template, inputs);

        Self {
            user_prompt: user_prompt(&task),
            prompts: PromptBuilder::new(blueprint, checks.contract()),
            checks,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Advance one non-terminal state. Only a transport failure is an `Err`.
    fn step<C: ModelClient>(&self, client: &C, state: ExecutionState) -> Result<ExecutionState> {
        tracing::trace!(state = state.name(), "step");

        let next = match state {
            ExecutionState::Building {
                attempt,
                violations,
            } => ExecutionState::Calling {
                attempt,
                system_prompt: self.prompts.build(&violations),
            },

            ExecutionState::Calling {
                attempt,
                system_prompt,
            } => {
                let request = ModelRequest::json(system_prompt, self.user_prompt.clone());

                tracing::debug!(attempt = attempt + 1, "calling model");
                let started = Instant::now();
                let response = client.complete(&request)?;
                let elapsed = started.elapsed();

                let raw = response
                    .usable_content()
                    .ok_or_else(|| ForgeError::Transport("No response from LLM".to_string()))?;

                ExecutionState::Parsing {
                    attempt,
                    raw: raw.to_string(),
                    elapsed,
                }
            }

            ExecutionState::Parsing {
                attempt,
                raw,
                elapsed,
            } => match self.checks.parse(&raw) {
                Ok(output) => ExecutionState::Validating {
                    attempt,
                    output,
                    elapsed,
                },
                Err(rejection) => ExecutionState::Retrying { attempt, rejection },
            },

            ExecutionState::Validating {
                attempt,
                output,
                elapsed,
            } => match self.checks.conform(output) {
                Ok(data) => ExecutionState::RuleChecking {
                    attempt,
                    data,
                    elapsed,
                },
                Err(rejection) => ExecutionState::Retrying { attempt, rejection },
            },

            ExecutionState::RuleChecking {
                attempt,
                data,
                elapsed,
            } => match self.checks.enforce_rules(&data) {
                Ok(()) => ExecutionState::Success(ExecutionResult {
                    data,
                    duration: elapsed,
                    attempts: attempt + 1,
                }),
                Err(rejection) => ExecutionState::Retrying { attempt, rejection },
            },

            ExecutionState::Retrying { attempt, rejection } => {
                let violations = rejection.violations();
                tracing::warn!(
                    attempt = attempt + 1,
                    kind = rejection.kind(),
                    ?violations,
                    "attempt rejected"
                );

                let next_attempt = attempt + 1;
                if next_attempt < self.max_attempts {
                    ExecutionState::Building {
                        attempt: next_attempt,
                        violations,
                    }
                } else {
                    ExecutionState::Exhausted {
                        attempts: next_attempt,
                        violations,
                    }
                }
            }

            terminal @ (ExecutionState::Success(_) | ExecutionState::Exhausted { .. }) => terminal,
        };

        Ok(next)
    }
}
