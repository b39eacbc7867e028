//! File formats, the parser capability, and the extension registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::IngestionResult;
use crate::types::Table;

use super::csv::CsvParser;
use super::excel::ExcelParser;
use super::options::ParserOptions;

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Comma-separated values (single table).
    Csv,
    /// Legacy BIFF workbook.
    Xls,
    /// Office Open XML workbook.
    Xlsx,
    /// Macro-enabled Office Open XML workbook.
    Xlsm,
    /// Binary workbook.
    Xlsb,
}

impl FileFormat {
    /// Every built-in format, in registry order.
    pub const ALL: [FileFormat; 5] = [
        FileFormat::Csv,
        FileFormat::Xls,
        FileFormat::Xlsx,
        FileFormat::Xlsm,
        FileFormat::Xlsb,
    ];

    /// Canonical lower-case extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Xlsm => "xlsm",
            Self::Xlsb => "xlsb",
        }
    }

    /// Whether the format holds several named sheets.
    pub fn is_spreadsheet(self) -> bool {
        !matches!(self, Self::Csv)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What a parser hands back before the dispatcher names it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTables {
    /// A format that carries exactly one unnamed table.
    Single(Table),
    /// A format that carries named tables (sheets), in source order.
    Multiple(Vec<(String, Table)>),
}

/// A tabular parsing capability bound to one format.
pub trait TableParser: Send + Sync {
    /// The format this parser reads; used for diagnostics.
    fn format(&self) -> FileFormat;

    /// Parse `bytes` with the caller's options forwarded verbatim.
    ///
    /// `name` is the artifact's base file name, used to label errors for single-table formats.
    fn parse(&self, name: &str, bytes: &[u8], options: &ParserOptions) -> IngestionResult<ParsedTables>;
}

/// Fixed lookup from lower-cased extension to parser.
#[derive(Clone)]
pub struct FormatRegistry {
    parsers: BTreeMap<String, Arc<dyn TableParser>>,
}

impl FormatRegistry {
    /// A registry with no parsers.
    pub fn empty() -> Self {
        Self {
            parsers: BTreeMap::new(),
        }
    }

    /// Register `parser` for `extension`, returning the parser it replaced.
    pub fn register(
        &mut self,
        extension: &str,
        parser: Arc<dyn TableParser>,
    ) -> Option<Arc<dyn TableParser>> {
        self.parsers.insert(extension.to_ascii_lowercase(), parser)
    }

    /// Look up the parser for an extension (case-insensitive).
    pub fn lookup(&self, extension: &str) -> Option<&Arc<dyn TableParser>> {
        self.parsers.get(&extension.to_ascii_lowercase())
    }

    /// Registered extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}

impl Default for FormatRegistry {
    /// The built-in registry: `csv`, `xls`, `xlsx`, `xlsm`, `xlsb`.
    fn default() -> Self {
        let mut registry = Self::empty();
        for format in FileFormat::ALL {
            let parser: Arc<dyn TableParser> = if format.is_spreadsheet() {
                Arc::new(ExcelParser::new(format))
            } else {
                Arc::new(CsvParser)
            };
            registry.register(format.extension(), parser);
        }
        registry
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("extensions", &self.extensions().collect::<Vec<_>>())
            .finish()
    }
}
