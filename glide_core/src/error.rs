use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RelayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("device adapter error: {0}")]
    Adapter(String),
    #[error("dispatch thread did not stop within {0:?}")]
    ShutdownTimeout(Duration),
    #[error("malformed record: {0} bytes")]
    Malformed(usize),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
