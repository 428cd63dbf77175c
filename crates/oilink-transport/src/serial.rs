use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, TransportError};

/// Baud rates the device accepts on its serial interface.
pub const SUPPORTED_BAUDS: [u32; 3] = [19_200, 57_600, 115_200];

/// Default baud rate for the command/telemetry interface.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Read timeout applied to the port.
///
/// Bounded so frame-accumulation loops above observe `TimedOut` as a
/// transient condition instead of blocking indefinitely on a quiet device.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// A connected serial link — implements Read + Write.
///
/// This is the byte-duplex channel every other oilink component writes
/// commands to and reads sensor data from.
pub struct SerialLink {
    inner: Box<dyn serialport::SerialPort>,
}

impl SerialLink {
    /// Open and configure the serial port at `path`.
    ///
    /// Fails with [`TransportError::InvalidBaud`] before touching the port if
    /// `baud` is not one of [`SUPPORTED_BAUDS`].
    pub fn open(path: impl AsRef<Path>, baud: u32) -> Result<Self> {
        if !SUPPORTED_BAUDS.contains(&baud) {
            return Err(TransportError::InvalidBaud { baud });
        }

        let path = path.as_ref();
        let port = serialport::new(path.to_string_lossy(), baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| TransportError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;

        info!(?path, baud, "opened serial port");
        Ok(Self { inner: port })
    }

    /// Open the port at the default baud rate.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, DEFAULT_BAUD)
    }

    /// The configured baud rate, as reported by the port.
    pub fn baud(&self) -> Result<u32> {
        self.inner.baud_rate().map_err(|e| {
            TransportError::Io(std::io::Error::other(e.to_string()))
        })
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("port", &self.inner.name())
            .finish()
    }
}
