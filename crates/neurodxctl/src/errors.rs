//! Exit codes for neurodxctl

use neurodx_common::NeuroError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the user supplied something we refuse to process
/// (blank question, unknown condition, unsupported scan)
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Pick the exit code for a failed command
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<NeuroError>() {
        Some(e) if e.is_client_error() => EXIT_INVALID_INPUT,
        _ => EXIT_GENERAL_ERROR,
    }
}
