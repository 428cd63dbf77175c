use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};
use crate::sensor::{packet_len, SensorCode};

/// Header sentinel every stream frame starts with.
pub const STREAM_HEADER: u8 = 19;

/// Fixed framing overhead: header byte, length byte and checksum byte.
pub const FRAME_OVERHEAD: usize = 3;

/// One decoded stream frame: the (packet id, raw payload) entries in wire
/// order, which matches the order the stream was requested with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub entries: Vec<(SensorCode, Bytes)>,
}

/// Total wire size of a stream frame carrying the given packet ids.
///
/// `3 + count` framing bytes (header, length, one id byte per entry,
/// checksum) plus the registered payload length of each packet. Fails with
/// [`WireError::UnknownSensor`] if any id is unregistered, or with
/// [`WireError::Oversized`] if the data bytes would not fit the one-byte
/// length field, so callers can reject a bad request before touching the
/// transport.
pub fn frame_len(codes: &[SensorCode]) -> Result<usize> {
    let mut len = FRAME_OVERHEAD + codes.len();
    for &code in codes {
        let payload = packet_len(code).ok_or(WireError::UnknownSensor(code.0))? as usize;
        len += payload;
    }
    let data = len - FRAME_OVERHEAD;
    if data > u8::MAX as usize {
        return Err(WireError::Oversized { len: data });
    }
    Ok(len)
}

/// Decode one complete stream frame from `buf`.
///
/// `buf` must hold exactly the frame as read off the wire. Validation order:
/// header sentinel, declared length, entry walk, checksum. The checksum
/// invariant is that the wrapping byte sum from the length byte through the
/// checksum byte is 0 mod 256.
pub fn decode_frame(buf: &[u8]) -> Result<StreamFrame> {
    if buf.len() < FRAME_OVERHEAD {
        return Err(WireError::Truncated {
            remaining: buf.len(),
            needed: FRAME_OVERHEAD,
        });
    }
    if buf[0] != STREAM_HEADER {
        return Err(WireError::Desync { found: buf[0] });
    }

    let expected = (buf.len() - FRAME_OVERHEAD) as u8;
    if buf[1] != expected {
        return Err(WireError::LengthMismatch {
            found: buf[1],
            expected,
        });
    }

    let mut entries = Vec::new();
    let mut pos = 2;
    // Walk alternating (id, payload) entries; the final byte is the checksum.
    while pos < buf.len() - 1 {
        let code = SensorCode(buf[pos]);
        let len = packet_len(code).ok_or(WireError::UnknownSensor(code.0))? as usize;
        let start = pos + 1;
        let end = start + len;
        if end > buf.len() - 1 {
            return Err(WireError::Truncated {
                remaining: buf.len() - 1 - start,
                needed: len,
            });
        }
        entries.push((code, Bytes::copy_from_slice(&buf[start..end])));
        pos = end;
    }

    let sum = buf[1..].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != 0 {
        return Err(WireError::ChecksumMismatch { sum });
    }

    Ok(StreamFrame { entries })
}

/// Encode a stream frame into `dst`: header, length byte, entries, checksum.
///
/// The inverse of [`decode_frame`]; used by tests and device simulators.
pub fn encode_frame(entries: &[(SensorCode, &[u8])], dst: &mut BytesMut) {
    let data_len: usize = entries.iter().map(|(_, p)| 1 + p.len()).sum();
    debug_assert!(data_len <= u8::MAX as usize, "frame data does not fit the length byte");

    dst.reserve(FRAME_OVERHEAD + data_len);
    dst.put_u8(STREAM_HEADER);
    dst.put_u8(data_len as u8);

    let mut sum = data_len as u8;
    for (code, payload) in entries {
        dst.put_u8(code.0);
        dst.put_slice(payload);
        sum = payload
            .iter()
            .fold(sum.wrapping_add(code.0), |acc, &b| acc.wrapping_add(b));
    }
    dst.put_u8(sum.wrapping_neg());
}
