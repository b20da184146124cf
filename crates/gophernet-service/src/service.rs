//! Service facade over the catalog store

use crate::{format_report, ServiceError};
use gophernet_domain::Burrow;
use gophernet_store::StatefulRepository;

/// Domain operations exposed to the HTTP layer and the scheduler
///
/// Object safe; callers hold it as `Arc<dyn BurrowService>`.
pub trait BurrowService: Send + Sync {
    /// Load the catalog from the state file
    fn load_initial_state(&self) -> Result<(), ServiceError>;

    /// Deep copy of every burrow, in insertion order
    fn get_all_burrows(&self) -> Vec<Burrow>;

    /// Rent a burrow by name
    fn rent_burrow(&self, name: &str) -> Result<(), ServiceError>;

    /// Render the report for the current catalog
    fn generate_report(&self) -> Result<String, ServiceError>;

    /// Persist the catalog to the state file
    fn save_state(&self) -> Result<(), ServiceError>;

    /// Render the report and persist it to the report file
    fn save_report(&self) -> Result<(), ServiceError>;

    /// Apply one tick to every burrow
    fn update_burrows(&self);
}

/// Default [`BurrowService`] backed by a [`StatefulRepository`]
#[derive(Debug)]
pub struct GopherNetService<R> {
    repo: R,
}

impl<R: StatefulRepository> GopherNetService<R> {
    /// Create a service over the given repository
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl<R: StatefulRepository> BurrowService for GopherNetService<R> {
    fn load_initial_state(&self) -> Result<(), ServiceError> {
        Ok(self.repo.load_state()?)
    }

    fn get_all_burrows(&self) -> Vec<Burrow> {
        self.repo.list_all()
    }

    fn rent_burrow(&self, name: &str) -> Result<(), ServiceError> {
        Ok(self.repo.rent(name)?)
    }

    fn generate_report(&self) -> Result<String, ServiceError> {
        // list_all hands back a copy, so formatting runs without the lock
        let burrows = self.repo.list_all();
        Ok(format_report(&burrows))
    }

    fn save_state(&self) -> Result<(), ServiceError> {
        Ok(self.repo.save_state()?)
    }

    fn save_report(&self) -> Result<(), ServiceError> {
        let report = self.generate_report()?;
        self.repo.save_report(&report)?;
        tracing::debug!(path = %self.repo.report_file().display(), "report saved");
        Ok(())
    }

    fn update_burrows(&self) {
        self.repo.tick_all();
    }
}
