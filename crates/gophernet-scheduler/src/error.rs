//! Error types for scheduler operations

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while starting or stopping scheduled jobs
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A job was given a zero interval
    #[error("invalid interval for {job}: must be greater than zero")]
    ZeroInterval {
        /// Job name
        job: &'static str,
    },

    /// Jobs did not stop before the shutdown deadline
    #[error("jobs still running after {0:?}")]
    ShutdownTimeout(Duration),

    /// One or more jobs panicked
    #[error("{0} job(s) panicked")]
    JobPanicked(usize),
}
