//! Assertion engine for grading a finished output.
//!
//! Each assertion names a field by dotted path (`summary`, `meta.tags.0`,
//! `items[1].name`) and compares the value found there against an expected
//! value. Assertions are evaluated independently and in order; a mismatch is
//! data in the returned [`AssertionResult`], never an error.

mod engine;
mod path;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{render_value, run};
pub use path::lookup;
pub use types::{Assertion, AssertionKind, AssertionResult};
