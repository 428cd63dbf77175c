use bytes::{BufMut, Bytes, BytesMut};

/// A typed integer argument for a command payload.
///
/// The width and signedness are carried by the variant, so a value can never
/// disagree with its declared wire width. Numeric range policy (e.g. drive
/// velocity limits) belongs to the command layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
}

/// Serialize an ordered sequence of typed integers as big-endian bytes.
///
/// Produces the exact concatenation of each value's big-endian
/// representation: no length prefix, no padding.
pub fn pack(values: &[Value]) -> Bytes {
    let mut buf = BytesMut::with_capacity(values.len() * 2);
    for value in values {
        match *value {
            Value::U8(v) => buf.put_u8(v),
            Value::I8(v) => buf.put_i8(v),
            Value::U16(v) => buf.put_u16(v),
            Value::I16(v) => buf.put_i16(v),
        }
    }
    buf.freeze()
}
