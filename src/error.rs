//! Error types for promptforge.
//!
//! Uses thiserror for derive macros. Only terminal outcomes live here:
//! retryable rejections (bad JSON, schema issues, rule hits) are handled
//! inside the executor and never surface as a `ForgeError`.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for promptforge operations.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// User provided invalid arguments, or a file/config could not be used.
    #[error("{0}")]
    UserError(String),

    /// A blueprint or test id could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// The model provider returned no usable content. Never retried.
    #[error("model transport failed: {0}")]
    Transport(String),

    /// The attempt budget was consumed without a compliant output.
    ///
    /// Only the final attempt's violations are carried.
    #[error(
        "Failed to produce a valid response after {attempts} attempts. Last violations: {}",
        violations.join(", ")
    )]
    RetriesExhausted {
        attempts: u32,
        violations: Vec<String>,
    },

    /// A candidate output failed schema or rule checks (`check` command).
    #[error("output rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),

    /// A test run completed but not every assertion passed.
    #[error("{0}")]
    TestFailed(String),
}

impl ForgeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ForgeError::UserError(_) | ForgeError::NotFound(_) => exit_codes::USER_ERROR,
            ForgeError::Transport(_) => exit_codes::TRANSPORT_FAILURE,
            ForgeError::RetriesExhausted { .. } | ForgeError::Rejected(_) => {
                exit_codes::EXECUTION_FAILURE
            }
            ForgeError::TestFailed(_) => exit_codes::TEST_FAILURE,
        }
    }
}

/// Result type alias for promptforge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;
