//! The ingestion dispatcher.
//!
//! Most callers should use [`Dispatcher::load`] (or the free function [`load_tables`]), which
//! picks a parser from the artifact's extension and normalizes the result into a
//! [`TableSet`]:
//!
//! - spreadsheets (`xls`, `xlsx`, `xlsm`, `xlsb`): one entry per sheet, keyed by sheet name
//! - `csv`: one entry keyed by the artifact's base file name (extension included)
//!
//! Every failure collapses to `None`. [`Dispatcher::try_load`] exposes the typed error for
//! callers that want it.

use std::fmt;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::TableSet;

use super::artifact::Artifact;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::options::ParserOptions;
use super::registry::{FormatRegistry, ParsedTables};

/// Routes artifacts to parsers by extension.
///
/// Stateless apart from its configuration, so one dispatcher can serve concurrent callers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: FormatRegistry,
    observer: Option<Arc<dyn IngestionObserver>>,
    alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(FormatRegistry::default())
    }
}

impl Dispatcher {
    /// A dispatcher over `registry` with no observer.
    pub fn new(registry: FormatRegistry) -> Self {
        Self {
            registry,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }

    /// Attach an observer for load outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Severity threshold at which `on_alert` is invoked (default `Critical`).
    pub fn with_alert_threshold(mut self, severity: IngestionSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Load an artifact, returning the failure signal (`None`) on any error.
    ///
    /// The error is logged and reported to the observer; it is never propagated.
    ///
    /// ```no_run
    /// use tabular_explorer::ingestion::{Artifact, Dispatcher, ParserOptions};
    ///
    /// let dispatcher = Dispatcher::default();
    /// let bytes = std::fs::read("sales.csv").unwrap_or_default();
    /// match dispatcher.load(&Artifact::upload("sales.csv", bytes), &ParserOptions::new()) {
    ///     Some(tables) => println!("tables={:?}", tables.names()),
    ///     None => eprintln!("Failed to load data. Please check the file and try again."),
    /// }
    /// ```
    pub fn load(&self, artifact: &Artifact, options: &ParserOptions) -> Option<TableSet> {
        self.try_load(artifact, options).ok()
    }

    /// Load an artifact, returning the typed error on failure.
    ///
    /// Observer and log reporting happen here, so [`Self::load`] and this method report the
    /// same events.
    pub fn try_load(&self, artifact: &Artifact, options: &ParserOptions) -> IngestionResult<TableSet> {
        let extension = artifact.extension();
        let parser = self.registry.lookup(&extension);

        let ctx = IngestionContext {
            artifact: artifact.name().into_owned(),
            format: parser.map(|p| p.format()),
        };

        let result = match parser {
            None => Err(IngestionError::UnsupportedExtension { extension }),
            Some(parser) => artifact
                .read_bytes()
                .and_then(|bytes| parser.parse(&artifact.base_name(), &bytes, options))
                .map(|parsed| name_tables(artifact, parsed)),
        };

        self.report(&ctx, &result);
        result
    }

    fn report(&self, ctx: &IngestionContext, result: &IngestionResult<TableSet>) {
        match result {
            Ok(set) => {
                let stats = IngestionStats {
                    tables: set.len(),
                    rows: set.iter().map(|(_, t)| t.row_count()).sum(),
                };
                tracing::debug!(
                    artifact = %ctx.artifact,
                    tables = stats.tables,
                    rows = stats.rows,
                    "loaded table set"
                );
                if let Some(obs) = self.observer.as_ref() {
                    obs.on_success(ctx, stats);
                }
            }
            Err(e) => {
                let sev = IngestionSeverity::for_error(e);
                tracing::warn!(
                    artifact = %ctx.artifact,
                    kind = ?e.kind(),
                    severity = ?sev,
                    "failed to load artifact: {e}"
                );
                if let Some(obs) = self.observer.as_ref() {
                    obs.on_failure(ctx, sev, e);
                    if sev >= self.alert_at_or_above {
                        obs.on_alert(ctx, sev, e);
                    }
                }
            }
        }
    }
}

/// Single tables are keyed by the artifact's base file name; named tables keep their names.
fn name_tables(artifact: &Artifact, parsed: ParsedTables) -> TableSet {
    match parsed {
        ParsedTables::Single(table) => {
            let mut set = TableSet::new();
            set.insert(artifact.base_name(), table);
            set
        }
        ParsedTables::Multiple(tables) => tables.into_iter().collect(),
    }
}

/// Load an artifact with the built-in registry; `None` on any failure.
pub fn load_tables(artifact: &Artifact, options: &ParserOptions) -> Option<TableSet> {
    Dispatcher::default().load(artifact, options)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::FailureKind;
    use crate::ingestion::registry::{FileFormat, TableParser};
    use crate::types::{DataType, Field, Schema, Table, Value};

    /// Returns a fixed table and records the option count it was called with.
    struct FixedParser {
        calls: Mutex<Vec<usize>>,
    }

    impl TableParser for FixedParser {
        fn format(&self) -> FileFormat {
            FileFormat::Csv
        }

        fn parse(&self, _name: &str, _bytes: &[u8], options: &ParserOptions) -> IngestionResult<ParsedTables> {
            self.calls.lock().unwrap().push(options.len());
            Ok(ParsedTables::Single(Table::new(
                Schema::new(vec![Field::new("x", DataType::Int64)]),
                vec![vec![Value::Int64(1)]],
            )))
        }
    }

    #[test]
    fn injected_parser_receives_options_verbatim() {
        let parser = Arc::new(FixedParser {
            calls: Mutex::new(Vec::new()),
        });
        let mut registry = FormatRegistry::empty();
        registry.register("tsv", parser.clone());
        let dispatcher = Dispatcher::new(registry);

        let opts = ParserOptions::new().set("a", 1).set("b", 2);
        let set = dispatcher
            .try_load(&Artifact::upload("dir/Data.TSV", "x\n1\n"), &opts)
            .unwrap();

        assert_eq!(set.names(), vec!["Data.TSV"]);
        assert_eq!(*parser.calls.lock().unwrap(), vec![2]);
    }

    #[test]
    fn unsupported_extension_is_reported_before_reading() {
        // The path does not exist; the extension check must fire first.
        let err = Dispatcher::default()
            .try_load(&Artifact::from("missing/notes.txt"), &ParserOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnsupportedExtension);
        assert!(err.to_string().contains("'txt'"));
    }

    #[test]
    fn names_without_extension_are_unsupported() {
        let set = load_tables(&Artifact::upload("README", "a\n1\n"), &ParserOptions::new());
        assert!(set.is_none());
    }
}
