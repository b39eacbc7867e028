use thiserror::Error;

use crate::ingestion::FileFormat;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// The three failure classes a load can end in.
///
/// Callers of [`crate::ingestion::Dispatcher::load`] only ever see `None`; the class exists for
/// diagnostics (logs, observers, severities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The artifact's extension is not in the format registry.
    UnsupportedExtension,
    /// The parser rejected an option key or value.
    InvalidParserArgument,
    /// Anything else raised while reading or parsing the artifact.
    ParseFailure,
}

/// Error type returned by ingestion functions.
///
/// A single enum shared by the dispatcher and every built-in parser.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// No parser is registered for this extension (empty when the name has none).
    #[error("unsupported file extension '{extension}'")]
    UnsupportedExtension { extension: String },

    /// A parser option was not recognized or had the wrong shape.
    #[error("invalid {format} parser argument: {message}")]
    InvalidParserArgument { format: FileFormat, message: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error (malformed quoting, invalid UTF-8, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook error (corrupt file, missing sheet, ...).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The content was readable but does not form a table.
    #[error("malformed table '{table}': {message}")]
    MalformedTable { table: String, message: String },
}

impl IngestionError {
    /// Collapse this error onto its failure class.
    pub fn kind(&self) -> FailureKind {
        match self {
            IngestionError::UnsupportedExtension { .. } => FailureKind::UnsupportedExtension,
            IngestionError::InvalidParserArgument { .. } => FailureKind::InvalidParserArgument,
            IngestionError::Io(_)
            | IngestionError::Csv(_)
            | IngestionError::Excel(_)
            | IngestionError::MalformedTable { .. } => FailureKind::ParseFailure,
        }
    }

    /// Whether the error originated in I/O (directly or inside the CSV reader).
    pub fn is_io(&self) -> bool {
        match self {
            IngestionError::Io(_) => true,
            IngestionError::Csv(err) => matches!(err.kind(), ::csv::ErrorKind::Io(_)),
            IngestionError::Excel(calamine::Error::Io(_)) => true,
            _ => false,
        }
    }
}

/// Errors produced when building a preview of a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreviewError {
    /// A random sample must draw at least one row and no more rows than the table has.
    #[error("cannot sample {requested} rows from a table with {available} rows")]
    InvalidSampleSize { requested: usize, available: usize },
}

/// Errors produced when building a scatter figure.
#[derive(Debug, Error, PartialEq)]
pub enum PlotError {
    /// The requested axis column is not part of the table.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Marker size outside `1..=10`.
    #[error("marker size {size} is outside 1..=10")]
    InvalidMarkerSize { size: u8 },

    /// The renderer could not serialize the figure.
    #[error("render failed: {message}")]
    Render { message: String },
}

/// Failure reported by a [`crate::chat::ConversationalAnalysisAgent`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AgentError {
    pub message: String,
}

impl AgentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors produced by a chat turn.
#[derive(Debug, Error, PartialEq)]
pub enum ChatError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("Please add your API key to continue.")]
    MissingApiKey,

    #[error("temperature {0} is outside 0.0..=0.5")]
    InvalidTemperature(f64),

    #[error("Sorry, an error occurred while processing your request: {0}")]
    Agent(#[from] AgentError),
}

/// Errors surfaced by a [`crate::session::Session`].
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Failed to load data. Please check the file and try again.")]
    LoadFailed,

    #[error("no table has been loaded")]
    NothingLoaded,

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Errors produced while loading an [`crate::config::ExplorerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
