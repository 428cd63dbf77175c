//! Host-side driver for serial-attached robots speaking the Open Interface
//! protocol.
//!
//! The device listens for single-byte op codes, optionally followed by a
//! fixed-format big-endian payload, and answers sensor requests with raw
//! payload bytes — on demand ([`Driver::sensors`], [`Driver::query_list`])
//! or as a continuous stream of checksummed multi-packet frames
//! ([`Driver::stream`]).
//!
//! ```no_run
//! use oilink::{Driver, SensorCode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut driver = Driver::open("/dev/ttyUSB0")?;
//! driver.start()?;
//! driver.safe()?;
//! driver.drive(200, -100)?;
//!
//! let charge = driver.sensors(SensorCode::BATTERY_CHARGE)?;
//! println!("battery charge: {charge:?}");
//!
//! let stream = driver.stream(&[SensorCode::DISTANCE, SensorCode::ANGLE])?;
//! if let Some(frame) = stream.recv() {
//!     for (code, data) in &frame.entries {
//!         println!("packet {code}: {data:?}");
//!     }
//! }
//! let (_driver, outcome) = stream.pause();
//! outcome?;
//! # Ok(())
//! # }
//! ```
//!
//! The driver is generic over any `Read + Write` byte-duplex channel;
//! [`Driver::open`] wires in the serial transport from `oilink-transport`.

pub mod driver;
pub mod error;
pub mod stream;

pub use driver::Driver;
pub use error::{DriverError, Result, StreamError};
pub use stream::SensorStream;

pub use oilink_transport::SerialLink;
pub use oilink_wire::{OpCode, SensorCode, StreamFrame};
