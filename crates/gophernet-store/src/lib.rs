//! GopherNet Storage Layer
//!
//! Owns the burrow catalog and is the only component that touches the
//! state and report files.
//!
//! # Architecture
//!
//! - A single readers-writer lock guards the catalog
//! - Reads hand out deep copies, so callers never alias catalog state
//! - Every mutation and every file operation takes the exclusive side
//! - Insertion order is kept alongside the name index and survives
//!   snapshot/restore
//!
//! # Examples
//!
//! ```no_run
//! use gophernet_store::{BurrowRepository, MemoryStore, StatefulRepository};
//!
//! let store = MemoryStore::new("data/state.json", "data/report.txt");
//! store.load_state().unwrap();
//! store.rent("Burrow1").unwrap();
//! store.save_state().unwrap();
//! ```

#![warn(missing_docs)]

mod error;
mod memory;
mod repository;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{BurrowRepository, StatefulRepository};
