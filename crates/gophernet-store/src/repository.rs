//! Repository traits
//!
//! These traits are the seam between the service layer and storage.
//! [`crate::MemoryStore`] is the production implementation; tests supply
//! their own.

use crate::StoreError;
use gophernet_domain::Burrow;
use std::path::Path;

/// In-memory catalog operations
pub trait BurrowRepository: Send + Sync {
    /// Deep copy of every burrow, in insertion order
    fn list_all(&self) -> Vec<Burrow>;

    /// Mark a burrow occupied
    ///
    /// Succeeds only if the burrow exists, is unoccupied and has not
    /// collapsed. The check and the transition are atomic.
    fn rent(&self, name: &str) -> Result<(), StoreError>;

    /// Apply one tick to every burrow
    fn tick_all(&self);

    /// Insert a burrow by name
    ///
    /// A duplicate name replaces the stored burrow but keeps its original
    /// position in the iteration order.
    fn add(&self, burrow: Burrow);
}

/// Catalog operations backed by files
pub trait StatefulRepository: BurrowRepository {
    /// Replace the catalog with the contents of the state file
    fn load_state(&self) -> Result<(), StoreError>;

    /// Overwrite the state file with the current catalog
    fn save_state(&self) -> Result<(), StoreError>;

    /// Overwrite the report file
    fn save_report(&self, report: &str) -> Result<(), StoreError>;

    /// Path of the state file
    fn state_file(&self) -> &Path;

    /// Path of the report file
    fn report_file(&self) -> &Path;
}
