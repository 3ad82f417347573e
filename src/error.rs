#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use rand::distributions::WeightedError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashError>;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Invalid sampling weights: {0}")]
    Weights(#[from] WeightedError),

    #[error("{0}")]
    General(String),
}

#[cfg(feature = "python")]
impl From<DashError> for PyErr {
    fn from(err: DashError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
