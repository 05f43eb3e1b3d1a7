//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid lattice size, unknown initial condition or a pattern that does not fit.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A probability outside `[0, 1]`.
    #[error("Range error: {0}")]
    Range(String),

    /// Operating on an empty series or a malformed lattice.
    #[error("Invalid state: {0}")]
    State(String),
}

impl Error {
    /// Check that `value` is a probability, naming the parameter on failure.
    pub fn check_probability(name: &str, value: f64) -> Result<f64> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(Error::Range(format!("{} = {} is outside [0, 1]", name, value)))
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
