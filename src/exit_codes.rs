//! Exit code constants for the promptforge CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable or invalid blueprint/config)
//! - 2: Execution failure (retry budget exhausted, or `check` found violations)
//! - 3: Transport failure (the model provider returned no usable content)
//! - 4: Test failure (one or more assertions did not pass)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing files, invalid blueprint or config.
pub const USER_ERROR: i32 = 1;

/// Execution failure: no compliant output within the attempt budget.
pub const EXECUTION_FAILURE: i32 = 2;

/// Transport failure: provider error or empty model response.
pub const TRANSPORT_FAILURE: i32 = 3;

/// Test failure: the output was produced but assertions failed.
pub const TEST_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            EXECUTION_FAILURE,
            TRANSPORT_FAILURE,
            TEST_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
