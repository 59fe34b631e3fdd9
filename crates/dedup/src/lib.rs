//! `notcore-dedup`: duplicate detection for individual registration batches.
//!
//! Pure engine crate: receives pre-materialized rows (and already-persisted
//! records), returns duplicate sets and localized diagnostics.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod builder;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod locale;
pub mod registry;
pub mod report;
pub mod scorer;
pub mod table;

pub use builder::{DuplicateSets, Entity, StoredRecord};
pub use config::{DedupSettings, DeduplicationConfig, ReportConfig};
pub use engine::{run, DedupReport};
pub use error::DedupError;
pub use locale::{Catalog, Translator};
pub use registry::{DeduplicationType, DeduplicationTypeName, LogicalOperator, ValueDomain};
pub use report::Diagnostic;
pub use table::{Comparator, Predicate, Table, Value};
