//! Spreadsheet ingestion (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`).

use std::io::{Cursor, Read, Seek};

use calamine::{Data, Range, Reader, Sheets, Xls, Xlsb, Xlsx};
use serde::Deserialize;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

use super::frame::{build_table, Cell};
use super::options::{default_header, default_true, ParserOptions, TableLayout};
use super::registry::{FileFormat, ParsedTables, TableParser};

/// Options understood by the spreadsheet parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcelOptions {
    /// Restrict (and order) the sheets read; all sheets in workbook order when absent.
    #[serde(default)]
    pub sheets: Option<Vec<String>>,
    /// Header row index after `skiprows`; `null` for headerless sheets.
    #[serde(default = "default_header")]
    pub header: Option<usize>,
    #[serde(default)]
    pub skiprows: usize,
    #[serde(default)]
    pub nrows: Option<usize>,
    #[serde(default)]
    pub na_values: Vec<String>,
    #[serde(default = "default_true")]
    pub keep_default_na: bool,
}

impl Default for ExcelOptions {
    fn default() -> Self {
        Self {
            sheets: None,
            header: default_header(),
            skiprows: 0,
            nrows: None,
            na_values: Vec::new(),
            keep_default_na: true,
        }
    }
}

/// Parser capability for one workbook format.
#[derive(Debug, Clone, Copy)]
pub struct ExcelParser {
    format: FileFormat,
}

impl ExcelParser {
    /// A parser for `format`. A non-workbook format fails every parse with an invalid
    /// argument error.
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }
}

impl TableParser for ExcelParser {
    fn format(&self) -> FileFormat {
        self.format
    }

    fn parse(&self, _name: &str, bytes: &[u8], options: &ParserOptions) -> IngestionResult<ParsedTables> {
        let opts: ExcelOptions = options.decode(self.format)?;
        ingest_workbook_from_bytes(self.format, bytes, &opts).map(ParsedTables::Multiple)
    }
}

/// Read every selected sheet of a workbook into its own [`Table`].
///
/// Behavior:
/// - The reader is chosen from `format`; the bytes are never sniffed
/// - Sheets come back in workbook order, or in `opts.sheets` order when given
/// - An empty sheet yields an empty table
pub fn ingest_workbook_from_bytes(
    format: FileFormat,
    bytes: &[u8],
    opts: &ExcelOptions,
) -> IngestionResult<Vec<(String, Table)>> {
    let mut workbook = open_workbook(format, Cursor::new(bytes))?;

    let sheets: Vec<String> = match &opts.sheets {
        Some(names) => names.clone(),
        None => workbook.sheet_names(),
    };

    let layout = TableLayout::new(
        opts.skiprows,
        opts.header,
        opts.nrows,
        &opts.na_values,
        opts.keep_default_na,
    );

    let mut tables = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let table = ingest_sheet_range(&sheet, &range, &layout)?;
        tables.push((sheet, table));
    }
    Ok(tables)
}

fn open_workbook<RS: Read + Seek>(format: FileFormat, rs: RS) -> IngestionResult<Sheets<RS>> {
    let sheets = match format {
        FileFormat::Xls => Sheets::Xls(Xls::new(rs).map_err(calamine::Error::from)?),
        FileFormat::Xlsx | FileFormat::Xlsm => {
            Sheets::Xlsx(Xlsx::new(rs).map_err(calamine::Error::from)?)
        }
        FileFormat::Xlsb => Sheets::Xlsb(Xlsb::new(rs).map_err(calamine::Error::from)?),
        FileFormat::Csv => {
            return Err(IngestionError::InvalidParserArgument {
                format,
                message: "csv is not a workbook format".to_string(),
            });
        }
    };
    Ok(sheets)
}

fn ingest_sheet_range(
    sheet: &str,
    range: &Range<Data>,
    layout: &TableLayout,
) -> IngestionResult<Table> {
    let Some((first_row, _)) = range.start() else {
        return Ok(Table::default());
    };

    // The range begins at the first used row; pad so `skiprows` counts from sheet row 1.
    let grid: Vec<Vec<Cell>> = std::iter::repeat_with(Vec::new)
        .take(first_row as usize)
        .chain(range.rows().map(|row| row.iter().map(convert_cell).collect()))
        .collect();

    build_table(sheet, grid, layout)
}

fn convert_cell(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{e:?}")),
    }
}
