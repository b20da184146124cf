//! Configuration for the periodic jobs
//!
//! Defines how often each job fires and how long shutdown may wait for
//! them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Intervals for the scheduled jobs
///
/// # Examples
///
/// ```
/// use gophernet_scheduler::SchedulerConfig;
/// use std::time::Duration;
///
/// let config = SchedulerConfig::default();
/// assert_eq!(config.tick_interval(), Duration::from_secs(60));
/// assert_eq!(config.save_interval(), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between burrow ticks. Burrow age is counted in these
    /// ticks, so anything other than 60 changes what a "minute" means.
    /// Default: 60
    pub tick_interval_secs: u64,

    /// Seconds between state snapshots
    /// Default: 300
    pub save_interval_secs: u64,

    /// Seconds between report writes
    /// Default: 300
    pub report_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 60,
            save_interval_secs: 300,
            report_interval_secs: 300,
        }
    }
}

impl SchedulerConfig {
    /// Tick interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Snapshot interval as Duration
    pub fn save_interval(&self) -> Duration {
        Duration::from_secs(self.save_interval_secs)
    }

    /// Report interval as Duration
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }
}
