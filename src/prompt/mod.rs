//! Prompt construction for constrained generation.
//!
//! - **Template**: `{slot}` substitution of blueprint inputs into the task text
//! - **System**: the system prompt (role, rules, output shape, prior violations)
//!
//! # Template Syntax
//!
//! ```text
//! Summarize {document} for {audience}.
//! ```
//!
//! Placeholder names are one or more ASCII word characters. A placeholder
//! without a matching input is left in the text untouched; there is no
//! escape syntax for literal braces.

mod system;
mod template;

pub use system::{PromptBuilder, user_prompt};
pub use template::{inputs, substitute, value_text};
