//! GopherNet Scheduler
//!
//! Background jobs that keep the catalog moving and persisted.
//!
//! # Jobs
//!
//! | Job | Default interval | Action |
//! |-----|------------------|--------|
//! | **burrow-updater** | 1 minute | `update_burrows` (age + growth) |
//! | **state-saver** | 5 minutes | `save_state` |
//! | **report-saver** | 5 minutes | `save_report` |
//!
//! Failed saves are logged and retried on the next interval. The jobs are
//! not coordinated with one another; the store serializes them.
//!
//! # Configuration
//!
//! ```toml
//! [scheduler]
//! tick_interval_secs = 60
//! save_interval_secs = 300
//! report_interval_secs = 300
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod scheduler;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use scheduler::Scheduler;
