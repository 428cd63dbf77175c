use std::path::PathBuf;

/// Errors that can occur when opening or using the serial transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The requested baud rate is not one the device supports.
    #[error("invalid baud rate: {baud} (must be one of 19200, 57600, 115200)")]
    InvalidBaud { baud: u32 },

    /// Failed to open the serial port at the given path.
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: PathBuf,
        source: serialport::Error,
    },

    /// An I/O error occurred on the open port.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
