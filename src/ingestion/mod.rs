//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`Dispatcher::load`] (from [`dispatch`]) which:
//!
//! - detects the format from the artifact's file extension (case-insensitive, no sniffing)
//! - parses it into a [`crate::types::TableSet`]
//! - reports success/failure/alerts to an optional [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`excel`]

pub mod artifact;
pub mod csv;
pub mod dispatch;
pub mod excel;
pub(crate) mod frame;
pub mod observability;
pub mod options;
pub mod registry;

pub use artifact::Artifact;
pub use dispatch::{load_tables, Dispatcher};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use options::ParserOptions;
pub use registry::{FileFormat, FormatRegistry, ParsedTables, TableParser};
