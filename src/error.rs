use chrono::{DateTime, Utc};
use thiserror::Error;

pub type MicrogridResult<T> = Result<T, MicrogridError>;

#[derive(Debug, Error)]
pub enum MicrogridError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    System(#[from] SystemError),
}

/// Errors related to vector codecs, data loading and time series lookups.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Invalid {kind} vector: expected {expected} elements, got {actual}")]
    Shape {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Timestamp {ts} is outside the covered data range [{first}, {last}]")]
    TimestampOutOfRange {
        ts: DateTime<Utc>,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
    },

    #[error("No sample recorded for hour {0}")]
    MissingSample(DateTime<Utc>),

    #[error("Duplicate sample for hour {0}")]
    DuplicateSample(DateTime<Utc>),

    #[error("Time series is empty")]
    EmptySeries,

    #[error("Missing column: '{0}'")]
    MissingColumn(String),

    #[error("Null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Data frame error: {0}")]
    DataFrame(String),

    #[error("Failed timestamp conversion: {0}")]
    TimestampConversion(String),
}

impl From<polars::error::PolarsError> for DataError {
    fn from(e: polars::error::PolarsError) -> Self {
        DataError::DataFrame(e.to_string())
    }
}

impl From<polars::error::PolarsError> for MicrogridError {
    fn from(e: polars::error::PolarsError) -> Self {
        MicrogridError::Data(e.into())
    }
}

/// Errors related to the Gym Environment configuration and execution loop.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Invalid environment state: {0}")]
    InvalidState(String),

    #[error("Unsupported render mode: '{0}'")]
    UnsupportedRenderMode(String),

    #[error(
        "Start time {start} is outside the admissible range [{earliest}, {latest}] for the configured episode length"
    )]
    StartOutOfRange {
        start: DateTime<Utc>,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    #[error("Invalid environment configuration: {0}")]
    InvalidConfig(String),
}

/// Errors related to File I/O and serialization.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO operation failed")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write data: {0}")]
    WriteFailed(String),

    #[error("Failed to read data: {0}")]
    ReadFailed(String),
}

/// Errors related to internal invariants.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Missing internal field: {0}")]
    MissingField(String),
}
