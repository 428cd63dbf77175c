use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tracing::debug;

use oilink_transport::SerialLink;
use oilink_wire::{pack, packet_len, OpCode, SensorCode, Value};

use crate::error::{DriverError, Result};

/// Drive wheel velocity bounds, mm/s.
const VELOCITY_MIN: i16 = -500;
const VELOCITY_MAX: i16 = 500;

/// Turn radius bounds, mm.
const RADIUS_MIN: i16 = -2000;
const RADIUS_MAX: i16 = 2000;

/// Protocol sentinels for "drive straight". Outside the numeric radius range
/// but protocol-legal, so they bypass validation.
const RADIUS_STRAIGHT: i16 = 0x7FFF_u16 as i16;
const RADIUS_STRAIGHT_ALT: i16 = 0x8000_u16 as i16;

/// Host-side command/telemetry driver over a byte-duplex transport.
///
/// The driver owns the transport: command and query calls execute
/// synchronously on the caller's thread and block until their bounded read
/// completes or fails. Starting a stream ([`Driver::stream`]) moves the
/// transport into the stream's reader thread; pausing moves it back.
pub struct Driver<T> {
    link: T,
}

impl Driver<SerialLink> {
    /// Open the serial port at `path` with the default baud rate.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SerialLink::open_default(path)?))
    }
}

impl<T> Driver<T> {
    /// Create a driver over an already-connected transport.
    pub fn new(link: T) -> Self {
        Self { link }
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.link
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.link
    }

    /// Consume the driver and return the transport.
    pub fn into_inner(self) -> T {
        self.link
    }
}

impl<T: Read + Write> Driver<T> {
    /// Write a command: the op-code byte followed by the payload bytes.
    ///
    /// Validation-free escape hatch for op codes without a dedicated method.
    /// A failure in either half leaves the device in an unknown protocol
    /// state; the error names which half did not complete.
    pub fn send(&mut self, op: OpCode, payload: &[u8]) -> Result<()> {
        send_command(&mut self.link, op, payload)
    }

    /// Start the command interface. Must precede all other commands; also
    /// switches the device to passive mode.
    pub fn start(&mut self) -> Result<()> {
        self.send(OpCode::Start, &[])
    }

    /// Switch to passive mode (same wire command as [`Driver::start`]).
    pub fn passive(&mut self) -> Result<()> {
        self.start()
    }

    /// Enable user control with safety restrictions active.
    pub fn safe(&mut self) -> Result<()> {
        self.send(OpCode::Safe, &[])
    }

    /// Enable full control, disabling safety restrictions.
    pub fn full(&mut self) -> Result<()> {
        self.send(OpCode::Full, &[])
    }

    /// Legacy equivalent of [`Driver::safe`]: passive first, then Control.
    pub fn control(&mut self) -> Result<()> {
        self.passive()?;
        self.send(OpCode::Control, &[])
    }

    /// Start the default cleaning mode.
    pub fn clean(&mut self) -> Result<()> {
        self.send(OpCode::Cover, &[])
    }

    /// Start the spot cleaning mode.
    pub fn spot(&mut self) -> Result<()> {
        self.send(OpCode::Spot, &[])
    }

    /// Send the robot to its dock.
    pub fn seek_dock(&mut self) -> Result<()> {
        self.send(OpCode::Dock, &[])
    }

    /// Control the drive wheels by average velocity (mm/s) and turn radius
    /// (mm).
    ///
    /// Velocity must lie in [-500, 500] and radius in [-2000, 2000], except
    /// for the "drive straight" sentinels (32767 / -32768) which pass
    /// through. Validation happens before any byte is written.
    pub fn drive(&mut self, velocity: i16, radius: i16) -> Result<()> {
        check_range("velocity", velocity, VELOCITY_MIN, VELOCITY_MAX)?;
        if radius != RADIUS_STRAIGHT && radius != RADIUS_STRAIGHT_ALT {
            check_range("radius", radius, RADIUS_MIN, RADIUS_MAX)?;
        }
        self.send(
            OpCode::Drive,
            &pack(&[Value::I16(velocity), Value::I16(radius)]),
        )
    }

    /// Stop the wheels; equivalent to `drive(0, 0)`.
    pub fn stop(&mut self) -> Result<()> {
        self.drive(0, 0)
    }

    /// Control the two drive wheels independently (mm/s, each in
    /// [-500, 500]).
    pub fn direct_drive(&mut self, right: i16, left: i16) -> Result<()> {
        check_range("right velocity", right, VELOCITY_MIN, VELOCITY_MAX)?;
        check_range("left velocity", left, VELOCITY_MIN, VELOCITY_MAX)?;
        self.send(
            OpCode::DriveDirect,
            &pack(&[Value::I16(right), Value::I16(left)]),
        )
    }

    /// Set the LEDs: advance and play as bits, the power LED by color
    /// (0 = green, 255 = red) and intensity (0 = off, 255 = full).
    pub fn leds(
        &mut self,
        advance: bool,
        play: bool,
        power_color: u8,
        power_intensity: u8,
    ) -> Result<()> {
        let mut bits = 0u8;
        if advance {
            bits |= 0x08;
        }
        if play {
            bits |= 0x02;
        }
        self.send(
            OpCode::Leds,
            &pack(&[
                Value::U8(bits),
                Value::U8(power_color),
                Value::U8(power_intensity),
            ]),
        )
    }

    /// Request a single sensor packet and read its full payload.
    ///
    /// The transport may deliver fewer bytes than requested per read; the
    /// read loops until the registered length is accumulated. On a read
    /// failure the partially filled buffer travels with the error.
    pub fn sensors(&mut self, code: SensorCode) -> Result<Vec<u8>> {
        let len = packet_len(code).ok_or(DriverError::UnknownSensor(code.0))? as usize;
        self.send(OpCode::Sensors, &[code.into()])?;

        let mut buf = vec![0u8; len];
        match read_full(&mut self.link, &mut buf) {
            Ok(()) => Ok(buf),
            Err((filled, source)) => {
                buf.truncate(filled);
                Err(DriverError::Read {
                    code: code.0,
                    partial: buf,
                    source,
                })
            }
        }
    }

    /// Request a list of sensor packets in one round trip.
    ///
    /// Every code is validated against the registry before anything is
    /// written. The device answers in request order, so the result is
    /// positionally aligned with `codes`. A read failure mid-list carries
    /// the entries decoded so far.
    pub fn query_list(&mut self, codes: &[SensorCode]) -> Result<Vec<Vec<u8>>> {
        let mut lens = Vec::with_capacity(codes.len());
        for &code in codes {
            lens.push(packet_len(code).ok_or(DriverError::UnknownSensor(code.0))? as usize);
        }

        self.send(OpCode::QueryList, &request_payload(codes))?;

        let mut results: Vec<Vec<u8>> = Vec::with_capacity(codes.len());
        for (&code, &len) in codes.iter().zip(&lens) {
            let mut buf = vec![0u8; len];
            match read_full(&mut self.link, &mut buf) {
                Ok(()) => results.push(buf),
                Err((filled, source)) => {
                    buf.truncate(filled);
                    return Err(DriverError::BatchRead {
                        code: code.0,
                        complete: results,
                        partial: buf,
                        source,
                    });
                }
            }
        }
        Ok(results)
    }
}

/// Build the `[count][id]×count` payload shared by batched requests.
pub(crate) fn request_payload(codes: &[SensorCode]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(codes.len() + 1);
    payload.push(codes.len() as u8);
    payload.extend(codes.iter().map(|&code| u8::from(code)));
    payload
}

/// Write the op-code byte, then the payload bytes, then flush.
pub(crate) fn send_command(link: &mut impl Write, op: OpCode, payload: &[u8]) -> Result<()> {
    debug!(?op, ?payload, "writing command");
    write_full(link, &[op.into()]).map_err(|source| DriverError::Write {
        op,
        stage: "opcode",
        source,
    })?;
    if !payload.is_empty() {
        write_full(link, payload).map_err(|source| DriverError::Write {
            op,
            stage: "payload",
            source,
        })?;
    }
    flush_full(link).map_err(|source| DriverError::Write {
        op,
        stage: "flush",
        source,
    })
}

fn check_range(param: &'static str, value: i16, min: i16, max: i16) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DriverError::InvalidArgument {
            param,
            value: value as i32,
            min: min as i32,
            max: max as i32,
        })
    }
}

/// Write all of `buf`, retrying interrupted and would-block writes.
fn write_full(w: &mut impl Write, buf: &[u8]) -> std::io::Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match w.write(&buf[offset..]) {
            Ok(0) => {
                return Err(std::io::Error::new(
                    ErrorKind::WriteZero,
                    "transport closed mid-write",
                ))
            }
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn flush_full(w: &mut impl Write) -> std::io::Result<()> {
    loop {
        match w.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Accumulate exactly `buf.len()` bytes: explicit offset, retry on
/// interruption, fail on EOF. On error returns how many bytes had arrived.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::result::Result<(), (usize, std::io::Error)> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err((
                    filled,
                    std::io::Error::new(ErrorKind::UnexpectedEof, "transport closed mid-read"),
                ))
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err((filled, err)),
        }
    }
    Ok(())
}
