//! Serial transport boundary for the oilink robot driver.
//!
//! Opens and configures the physical serial port and exposes it as a plain
//! byte-duplex stream ([`SerialLink`] implements `Read + Write`). Everything
//! above this crate is generic over `Read + Write`; nothing else in the
//! workspace touches the serial port directly.

pub mod error;
pub mod serial;

pub use error::{Result, TransportError};
pub use serial::{SerialLink, DEFAULT_BAUD, SUPPORTED_BAUDS};
