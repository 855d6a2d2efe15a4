//! promptforge: constrained LLM generation.
//!
//! A [`Blueprint`](blueprint::Blueprint) describes a task: a role, a task
//! template with `{slot}` placeholders, behavioral rules and the JSON shape
//! the answer must have. [`PromptExecutor`](executor::PromptExecutor) calls a
//! [`ModelClient`](model::ModelClient) until the output satisfies the shape
//! and every HARD rule, feeding each attempt's violations into the next
//! prompt, for at most three attempts. The [`assertions`] engine then grades
//! accepted outputs against a blueprint's tests.

pub mod assertions;
pub mod blueprint;
pub mod cli;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod executor;
pub mod exit_codes;
pub mod logging;
pub mod model;
pub mod prompt;
pub mod rules;
pub mod runner;
pub mod schema;
pub mod store;

#[cfg(test)]
mod test_support;
