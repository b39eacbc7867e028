//! `tabular-explorer` loads uploaded tabular files into named in-memory tables and backs an
//! interactive explorer on top of them: previews, scatter plots and a chat with an analysis
//! agent.
//!
//! The primary entrypoint is [`ingestion::Dispatcher::load`], which picks a parser from the
//! artifact's file extension and returns a [`types::TableSet`] (or `None` on any failure).
//!
//! ## What you can load
//!
//! **File formats (selected by extension, case-insensitive, no content sniffing):**
//!
//! - **CSV**: `.csv`, one table keyed by the file name (`sales.csv`)
//! - **Workbooks**: `.xls`, `.xlsx`, `.xlsm`, `.xlsb`, one table per sheet keyed by sheet name
//!
//! **Value types:**
//!
//! Column types are inferred from the data. Supported logical types are:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//!
//! Empty cells and NA markers (`""`, `NA`, `NaN`, `null`, ...) map to [`types::Value::Null`].
//!
//! ## Quick example: load a file
//!
//! ```rust
//! use tabular_explorer::ingestion::{Artifact, Dispatcher, ParserOptions};
//!
//! let upload = Artifact::upload("sales.csv", "date,amount\n2024-01-01,10\n2024-01-02,12.5\n");
//! let tables = Dispatcher::default()
//!     .load(&upload, &ParserOptions::new())
//!     .expect("csv loads");
//!
//! assert_eq!(tables.names(), vec!["sales.csv"]);
//! assert_eq!(tables.get("sales.csv").unwrap().shape(), (2, 2));
//!
//! // Unsupported extensions are a failure signal, not a panic.
//! let notes = Artifact::upload("notes.txt", "hello");
//! assert!(Dispatcher::default().load(&notes, &ParserOptions::new()).is_none());
//! ```
//!
//! Parser options are passed through by key; unknown keys fail the load:
//!
//! ```rust
//! use tabular_explorer::ingestion::{Artifact, Dispatcher, ParserOptions};
//!
//! let upload = Artifact::upload("data.csv", "a;b\n1;2\n");
//! let opts = ParserOptions::new().set("sep", ";");
//! assert!(Dispatcher::default().load(&upload, &opts).is_some());
//!
//! let bogus = ParserOptions::new().set("colour", "red");
//! assert!(Dispatcher::default().load(&upload, &bogus).is_none());
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: dispatcher, format registry and the CSV/workbook parsers
//! - [`types`]: tables, values and table sets
//! - [`processing`]: filter/reduce helpers
//! - [`preview`]: head/tail and random-sample views
//! - [`plot`]: scatter figures and renderers
//! - [`chat`]: transcript handling around a pluggable analysis agent
//! - [`cache`]: memoized loads
//! - [`session`]: per-user explorer state
//! - [`config`]: TOML configuration
//! - [`error`]: error types

pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod plot;
pub mod preview;
pub mod processing;
pub mod session;
pub mod types;

pub use error::{
    ChatError, ConfigError, FailureKind, IngestionError, IngestionResult, PlotError, PreviewError,
    SessionError,
};
