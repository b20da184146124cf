//! In-memory catalog with JSON snapshot persistence

use crate::{BurrowRepository, StatefulRepository, StoreError};
use gophernet_domain::Burrow;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Burrows in insertion order plus a name index into that order
#[derive(Debug, Default)]
struct Catalog {
    burrows: Vec<Burrow>,
    index: HashMap<String, usize>,
}

impl Catalog {
    fn from_burrows(burrows: Vec<Burrow>) -> Self {
        let mut catalog = Self::default();
        for burrow in burrows {
            catalog.insert(burrow);
        }
        catalog
    }

    fn insert(&mut self, burrow: Burrow) {
        let slot = self
            .index
            .get(&burrow.name)
            .and_then(|&position| self.burrows.get_mut(position));

        match slot {
            Some(existing) => *existing = burrow,
            None => {
                self.index.insert(burrow.name.clone(), self.burrows.len());
                self.burrows.push(burrow);
            }
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Burrow> {
        let position = *self.index.get(name)?;
        self.burrows.get_mut(position)
    }
}

/// Thread-safe burrow catalog backed by a state file and a report file
///
/// All methods take `&self`; share the store between tasks with an
/// `Arc`. Lock poisoning is recovered from because every critical section
/// leaves the catalog consistent.
///
/// # Examples
///
/// ```
/// use gophernet_domain::Burrow;
/// use gophernet_store::{BurrowRepository, MemoryStore};
///
/// let store = MemoryStore::new("state.json", "report.txt");
/// store.add(Burrow::new("Burrow1", 1.5, 1.0, false, 100));
///
/// store.rent("Burrow1").unwrap();
/// assert!(store.list_all()[0].occupied);
/// assert!(store.rent("Burrow1").is_err());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
    state_file: PathBuf,
    report_file: PathBuf,
}

impl MemoryStore {
    /// Create an empty store bound to the given files
    ///
    /// Nothing is read until [`StatefulRepository::load_state`] is called.
    pub fn new(state_file: impl Into<PathBuf>, report_file: impl Into<PathBuf>) -> Self {
        Self {
            catalog: RwLock::new(Catalog::default()),
            state_file: state_file.into(),
            report_file: report_file.into(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BurrowRepository for MemoryStore {
    fn list_all(&self) -> Vec<Burrow> {
        self.read().burrows.clone()
    }

    fn rent(&self, name: &str) -> Result<(), StoreError> {
        let mut catalog = self.write();

        let burrow = catalog.get_mut(name).ok_or_else(|| StoreError::NotFound {
            name: name.to_string(),
        })?;

        if !burrow.is_available() {
            return Err(StoreError::Unavailable {
                name: name.to_string(),
            });
        }

        burrow.occupied = true;
        tracing::debug!(burrow = %name, "burrow rented");

        Ok(())
    }

    fn tick_all(&self) {
        let mut catalog = self.write();
        for burrow in &mut catalog.burrows {
            burrow.tick();
        }
    }

    fn add(&self, burrow: Burrow) {
        self.write().insert(burrow);
    }
}

impl StatefulRepository for MemoryStore {
    fn load_state(&self) -> Result<(), StoreError> {
        let mut catalog = self.write();

        let data = fs::read(&self.state_file)
            .map_err(|e| StoreError::io("failed to read state file", &self.state_file, e))?;
        let burrows: Vec<Burrow> = serde_json::from_slice(&data).map_err(StoreError::Decode)?;

        *catalog = Catalog::from_burrows(burrows);
        tracing::info!(
            path = %self.state_file.display(),
            burrows = catalog.burrows.len(),
            "state loaded"
        );

        Ok(())
    }

    fn save_state(&self) -> Result<(), StoreError> {
        let catalog = self.write();

        let mut data = serde_json::to_vec_pretty(&catalog.burrows).map_err(StoreError::Encode)?;
        data.push(b'\n');

        write_file(&self.state_file, &data)
            .map_err(|e| StoreError::io("failed to save state to file", &self.state_file, e))?;
        tracing::debug!(
            path = %self.state_file.display(),
            burrows = catalog.burrows.len(),
            "state saved"
        );

        Ok(())
    }

    fn save_report(&self, report: &str) -> Result<(), StoreError> {
        let _catalog = self.write();

        write_file(&self.report_file, report.as_bytes())
            .map_err(|e| StoreError::io("failed to save report to file", &self.report_file, e))
    }

    fn state_file(&self) -> &Path {
        &self.state_file
    }

    fn report_file(&self) -> &Path {
        &self.report_file
    }
}

/// Replace `path` with `contents`, creating it with mode 0644
fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.flush()
}
