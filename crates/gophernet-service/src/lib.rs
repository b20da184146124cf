//! GopherNet Service Layer
//!
//! The domain API consumed by the HTTP handlers and the scheduler. It
//! composes a [`StatefulRepository`](gophernet_store::StatefulRepository)
//! with the report formatter.
//!
//! # Usage
//!
//! ```no_run
//! use gophernet_service::{BurrowService, GopherNetService};
//! use gophernet_store::MemoryStore;
//!
//! let service = GopherNetService::new(MemoryStore::new("data/state.json", "data/report.txt"));
//! service.load_initial_state().unwrap();
//! service.rent_burrow("Burrow1").unwrap();
//! println!("{}", service.generate_report().unwrap());
//! ```

#![warn(missing_docs)]

mod error;
pub mod report;
mod service;

pub use error::ServiceError;
pub use report::format_report;
pub use service::{BurrowService, GopherNetService};
