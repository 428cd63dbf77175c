/// Errors that can occur while encoding or decoding protocol data.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The sensor packet id has no registered payload length.
    #[error("unknown sensor packet id: {0}")]
    UnknownSensor(u8),

    /// A stream frame did not start with the header byte 19.
    #[error("stream frame does not start with header 19 (found {found:#04x})")]
    Desync { found: u8 },

    /// The requested packet set does not fit a frame's one-byte length field.
    #[error("frame data of {len} bytes exceeds the one-byte length field")]
    Oversized { len: usize },

    /// The frame's length byte disagrees with the expected payload length.
    #[error("invalid frame data length: {found}, expected {expected}")]
    LengthMismatch { found: u8, expected: u8 },

    /// The byte sum from the length byte through the checksum byte was not 0.
    #[error("frame checksum mismatch (byte sum {sum:#04x}, expected 0)")]
    ChecksumMismatch { sum: u8 },

    /// The frame ended before all declared packet entries were read.
    #[error("truncated frame: {remaining} bytes left, needed {needed}")]
    Truncated { remaining: usize, needed: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
