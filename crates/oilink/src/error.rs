use oilink_wire::{OpCode, WireError};

/// Errors that can occur in command and query operations.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A command argument is outside its protocol range; nothing was written.
    #[error("invalid {param}: {value} (allowed {min}..={max})")]
    InvalidArgument {
        param: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// A requested sensor packet id has no registered length; nothing was
    /// written.
    #[error("unknown sensor packet id requested: {0}")]
    UnknownSensor(u8),

    /// Failed to open or configure the transport.
    #[error("transport error: {0}")]
    Transport(#[from] oilink_transport::TransportError),

    /// One half of a command write did not complete. The device may have
    /// seen a partial command, so protocol state is desynchronized.
    #[error("failed writing {stage} of command {op:?}: {source}")]
    Write {
        op: OpCode,
        stage: &'static str,
        source: std::io::Error,
    },

    /// A bounded sensor read failed; `partial` holds what arrived.
    #[error("failed reading sensor data for packet id {code}: {source}")]
    Read {
        code: u8,
        partial: Vec<u8>,
        source: std::io::Error,
    },

    /// A batched sensor read failed mid-list; `complete` holds the entries
    /// decoded so far, `partial` what arrived of the failing entry.
    #[error("failed reading sensor data for packet id {code}: {source}")]
    BatchRead {
        code: u8,
        complete: Vec<Vec<u8>>,
        partial: Vec<u8>,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that terminate a stream session.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Frame integrity violation (bad header, length or checksum). The
    /// session cannot resynchronize and has been terminated.
    #[error("stream frame error: {0}")]
    Wire(#[from] WireError),

    /// The stream-start or pause command failed.
    #[error(transparent)]
    Command(#[from] DriverError),

    /// An unrecoverable read error in the frame loop.
    #[error("stream read error: {0}")]
    Io(#[from] std::io::Error),
}
