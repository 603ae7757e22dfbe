//! Error types.
//!
//! Domain errors are typed enums so callers (and tests) can match on them.
//! `AppError` is what the binary reports: a message plus a process exit code.

use thiserror::Error;

/// Failure to build the dataset from its source. Always fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open data source '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV headers: {0}")]
    Headers(#[source] csv::Error),

    #[error("CSV parse error on line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column: `{0}`")]
    MissingColumn(String),

    #[error("line {line}: invalid date '{value}' (expected DD/MM/YYYY)")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: missing value for required column `{column}`")]
    MissingValue { line: usize, column: String },

    #[error("line {line}: `{column}` has unknown code '{value}' (expected 0 or 1)")]
    UnknownCode {
        line: usize,
        column: String,
        value: String,
    },

    #[error("response column `{0}` is not numeric")]
    NonNumericResponse(String),

    #[error("data source contains no rows")]
    Empty,
}

/// Selection index outside the bounds of the current dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("month index {index} out of range (0..{len})")]
    MonthOutOfRange { index: usize, len: usize },

    #[error("season index {index} out of range (0..{len})")]
    SeasonOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` must be numeric for this chart")]
    NotNumeric(String),
}

/// A control change that the controller refuses to apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("`{0}` is not a selectable x-axis field")]
    UnknownXField(String),

    #[error("`{0}` is not a selectable y-axis field")]
    UnknownYField(String),

    #[error("chart kind `{kind}` is not available for `{field}`")]
    UnsupportedKind { kind: String, field: String },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<DataLoadError> for AppError {
    fn from(err: DataLoadError) -> Self {
        let code = match err {
            DataLoadError::Empty => 3,
            _ => 2,
        };
        AppError::new(code, format!("Failed to load dataset: {err}"))
    }
}

impl From<ControlError> for AppError {
    fn from(err: ControlError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::new(2, err.to_string())
    }
}
