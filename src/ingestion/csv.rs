//! CSV ingestion implementation.

use serde::Deserialize;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

use super::frame::{build_table, Cell};
use super::options::{default_header, default_true, ParserOptions, TableLayout};
use super::registry::{FileFormat, ParsedTables, TableParser};

/// Options understood by the CSV parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsvOptions {
    /// Field separator; must be a single ASCII character.
    #[serde(default = "default_delimiter", alias = "sep")]
    pub delimiter: char,
    /// Quote character; must be a single ASCII character.
    #[serde(default = "default_quotechar")]
    pub quotechar: char,
    /// Lines starting with this character are ignored.
    #[serde(default)]
    pub comment: Option<char>,
    /// Header row index after `skiprows`; `null` for headerless input.
    #[serde(default = "default_header")]
    pub header: Option<usize>,
    #[serde(default)]
    pub skiprows: usize,
    #[serde(default)]
    pub nrows: Option<usize>,
    /// Extra tokens read as null.
    #[serde(default)]
    pub na_values: Vec<String>,
    #[serde(default = "default_true")]
    pub keep_default_na: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_quotechar() -> char {
    '"'
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            quotechar: default_quotechar(),
            comment: None,
            header: default_header(),
            skiprows: 0,
            nrows: None,
            na_values: Vec::new(),
            keep_default_na: true,
        }
    }
}

impl CsvOptions {
    fn layout(&self) -> TableLayout {
        TableLayout::new(
            self.skiprows,
            self.header,
            self.nrows,
            &self.na_values,
            self.keep_default_na,
        )
    }
}

/// Parser capability for `.csv` artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl TableParser for CsvParser {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn parse(&self, name: &str, bytes: &[u8], options: &ParserOptions) -> IngestionResult<ParsedTables> {
        let opts: CsvOptions = options.decode(FileFormat::Csv)?;
        ingest_csv_from_bytes(name, bytes, &opts).map(ParsedTables::Single)
    }
}

/// Parse CSV bytes into a [`Table`]; `name` labels the table in error messages.
///
/// Rules:
///
/// - Blank lines are skipped.
/// - Column types are inferred from the data (see [`crate::types::DataType`]).
/// - A row with more fields than the header is an error; shorter rows are padded with nulls.
pub fn ingest_csv_from_bytes(name: &str, bytes: &[u8], opts: &CsvOptions) -> IngestionResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(ascii_byte("delimiter", opts.delimiter)?)
        .quote(ascii_byte("quotechar", opts.quotechar)?)
        .comment(opts.comment.map(|c| ascii_byte("comment", c)).transpose()?)
        .from_reader(bytes);
    ingest_csv_from_reader(name, &mut rdr, opts)
}

/// Parse CSV data from an existing reader.
///
/// The reader should be built with `has_headers(false)`; header handling follows `opts`.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    name: &str,
    rdr: &mut csv::Reader<R>,
    opts: &CsvOptions,
) -> IngestionResult<Table> {
    let mut grid: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(record.iter().map(|field| Cell::Text(field.to_owned())).collect());
    }
    build_table(name, grid, &opts.layout())
}

fn ascii_byte(option: &str, c: char) -> IngestionResult<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(IngestionError::InvalidParserArgument {
            format: FileFormat::Csv,
            message: format!("{option} must be a single ASCII character, got '{c}'"),
        })
    }
}
