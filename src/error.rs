use std::fmt::{self, Display};
use std::io;

/// Provides `HerdImmunityError` and maps other errors to
/// convert to a `HerdImmunityError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum HerdImmunityError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    ParameterError(String),
    ReportError(String),
    HerdImmunityError(String),
}

impl From<io::Error> for HerdImmunityError {
    fn from(error: io::Error) -> Self {
        HerdImmunityError::IoError(error)
    }
}

impl From<serde_json::Error> for HerdImmunityError {
    fn from(error: serde_json::Error) -> Self {
        HerdImmunityError::JsonError(error)
    }
}

impl From<csv::Error> for HerdImmunityError {
    fn from(error: csv::Error) -> Self {
        HerdImmunityError::CsvError(error)
    }
}

impl From<String> for HerdImmunityError {
    fn from(error: String) -> Self {
        HerdImmunityError::HerdImmunityError(error)
    }
}

impl From<&str> for HerdImmunityError {
    fn from(error: &str) -> Self {
        HerdImmunityError::HerdImmunityError(error.to_string())
    }
}

impl std::error::Error for HerdImmunityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HerdImmunityError::IoError(error) => Some(error),
            HerdImmunityError::JsonError(error) => Some(error),
            HerdImmunityError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for HerdImmunityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HerdImmunityError::IoError(error) => write!(f, "Error: I/O failure: {error}"),
            HerdImmunityError::JsonError(error) => write!(f, "Error: invalid JSON: {error}"),
            HerdImmunityError::CsvError(error) => write!(f, "Error: CSV failure: {error}"),
            HerdImmunityError::ParameterError(message)
            | HerdImmunityError::ReportError(message)
            | HerdImmunityError::HerdImmunityError(message) => write!(f, "Error: {message}"),
        }
    }
}
