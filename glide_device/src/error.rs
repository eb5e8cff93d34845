use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device write failed: {0}")]
    Write(String),
    #[error("device disconnected")]
    Disconnected,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
