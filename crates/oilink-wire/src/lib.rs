//! Op codes, sensor registry and wire codec for the oilink robot protocol.
//!
//! This is the pure protocol layer: no I/O. It defines the single-byte
//! command op codes, the sensor packet identifiers with their registered
//! payload lengths, the big-endian payload encoder, and the codec for the
//! checksummed multi-packet frames the device emits in stream mode:
//!
//! ```text
//! ┌────────────┬────────────┬──────────────────────────────┬──────────────┐
//! │ Header (1) │ Length (1) │ (id:1, payload:len(id)) × k  │ Checksum (1) │
//! │ 0x13       │ N          │                              │              │
//! └────────────┴────────────┴──────────────────────────────┴──────────────┘
//! ```
//!
//! The checksum byte is chosen so the byte sum from the length byte through
//! the checksum byte is 0 mod 256.

pub mod error;
pub mod frame;
pub mod opcode;
pub mod pack;
pub mod sensor;

pub use error::{Result, WireError};
pub use frame::{decode_frame, encode_frame, frame_len, StreamFrame, FRAME_OVERHEAD, STREAM_HEADER};
pub use opcode::OpCode;
pub use pack::{pack, Value};
pub use sensor::{packet_len, SensorCode};
