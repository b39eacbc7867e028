//! Open-ended parser configuration.
//!
//! Callers pass a [`ParserOptions`] map; each parser decodes it into its own typed options
//! struct. Unknown keys and values of the wrong shape are rejected as
//! [`IngestionError::InvalidParserArgument`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::error::{IngestionError, IngestionResult};

use super::registry::FileFormat;

/// Keyword-style parser options, forwarded verbatim to the selected parser.
///
/// ```rust
/// use tabular_explorer::ingestion::ParserOptions;
///
/// let opts = ParserOptions::new().set("delimiter", ";").set("nrows", 100);
/// assert_eq!(opts.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserOptions {
    values: Map<String, JsonValue>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stable textual form (keys sorted) used as part of cache keys.
    pub fn canonical(&self) -> String {
        let sorted: std::collections::BTreeMap<&String, &JsonValue> = self.values.iter().collect();
        serde_json::to_string(&sorted).unwrap_or_default()
    }

    /// Decode into a parser's typed options.
    pub fn decode<T: DeserializeOwned>(&self, format: FileFormat) -> IngestionResult<T> {
        serde_json::from_value(JsonValue::Object(self.values.clone())).map_err(|e| {
            IngestionError::InvalidParserArgument {
                format,
                message: e.to_string(),
            }
        })
    }
}

impl From<Map<String, JsonValue>> for ParserOptions {
    fn from(values: Map<String, JsonValue>) -> Self {
        Self { values }
    }
}

pub(crate) fn default_header() -> Option<usize> {
    Some(0)
}

pub(crate) fn default_true() -> bool {
    true
}

/// Null tokens recognized unless `keep_default_na` is false.
pub(crate) const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Layout keys shared by every parser: where the header is and which rows to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableLayout {
    /// Leading rows dropped before anything else.
    pub skiprows: usize,
    /// Header row index after skipping; `None` labels columns `0..n`.
    pub header: Option<usize>,
    /// Upper bound on data rows.
    pub nrows: Option<usize>,
    /// Text tokens read as null.
    pub na_values: Vec<String>,
}

impl TableLayout {
    pub fn new(
        skiprows: usize,
        header: Option<usize>,
        nrows: Option<usize>,
        extra_na: &[String],
        keep_default_na: bool,
    ) -> Self {
        let mut na_values: Vec<String> = if keep_default_na {
            DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        na_values.extend(extra_na.iter().cloned());
        Self {
            skiprows,
            header,
            nrows,
            na_values,
        }
    }

    /// Exact token match; `" NA "` is text, not null.
    pub fn is_na(&self, text: &str) -> bool {
        self.na_values.iter().any(|na| na == text)
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::new(0, default_header(), None, &[], true)
    }
}
