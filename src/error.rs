use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `SimError` and maps to other errors to
/// convert to a `SimError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SimError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    InvalidParameter(String),
    ReportError(String),
    SimError(String),
}

impl From<io::Error> for SimError {
    fn from(error: io::Error) -> Self {
        SimError::IoError(error)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(error: serde_json::Error) -> Self {
        SimError::JsonError(error)
    }
}

impl From<csv::Error> for SimError {
    fn from(error: csv::Error) -> Self {
        SimError::CSVError(error)
    }
}

impl From<rand_distr::NormalError> for SimError {
    fn from(error: rand_distr::NormalError) -> Self {
        SimError::InvalidParameter(error.to_string())
    }
}

impl From<String> for SimError {
    fn from(error: String) -> Self {
        SimError::SimError(error)
    }
}

impl From<&str> for SimError {
    fn from(error: &str) -> Self {
        SimError::SimError(error.to_string())
    }
}

impl std::error::Error for SimError {}

impl Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::IoError(error) => write!(f, "I/O error: {error}"),
            SimError::JsonError(error) => write!(f, "JSON error: {error}"),
            SimError::CSVError(error) => write!(f, "CSV error: {error}"),
            SimError::InvalidParameter(message) => write!(f, "invalid parameter: {message}"),
            SimError::ReportError(message) => write!(f, "report error: {message}"),
            SimError::SimError(message) => write!(f, "Error: {message}"),
        }
    }
}
