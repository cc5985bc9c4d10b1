//! Exit code logic for the tubegrab process.
//!
//! Single responsibility: map the failure count to the process exit outcome.

use crate::ProcessExit;

/// Any failed job makes the whole run a failure. Canceled jobs only follow a
/// failure, so they never decide the outcome on their own.
pub(crate) fn determine_exit_outcome(failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else {
        ProcessExit::Failure
    }
}
