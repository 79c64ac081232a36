//! Printer transport errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    /// TCP connect to a 9100 printer failed
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bluetooth SPP / USB serial port could not be opened or written
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Connectivity pre-check failed; nothing was written
    #[error("Printer offline: {0}")]
    Offline(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Unknown connection kind, vendor or paper width
    #[error("Invalid printer config: {0}")]
    InvalidConfig(String),

    /// The blocking serial write task panicked or was cancelled
    #[error("Print task failed: {0}")]
    Task(String),
}

pub type PrintResult<T> = Result<T, PrintError>;
