//! Blueprint model: the operator-authored description of one LLM task.
//!
//! A blueprint bundles a role, a task template with `{slot}` placeholders,
//! behavioral rules, declared input slots, and the required output shape.
//! Blueprint files may also embed regression tests.
//!
//! Blueprints are read-only for the pipeline: nothing in this crate mutates
//! one after it is loaded.

mod io;
mod types;


// Re-export public API
pub use io::BlueprintFormat;
pub use types::{Blueprint, InputSlot, Inputs, PromptTest, Rule, RuleKind, SlotType};
