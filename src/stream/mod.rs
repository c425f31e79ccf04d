//! Length-prefixed primitive codecs over `std::io` streams.
//!
//! These helpers fix the byte layout shared by every answer-value codec in
//! this crate. All multi-byte values are little-endian.
//!
//! ## Wire primitives
//!
//! ```text
//! count           u32
//! component       f64
//! optional string presence u8 (0|1), then u32 byte length + UTF-8 bytes
//! ```

use std::io::{ErrorKind, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::util::{Error, Result};

/// Upper bound on an encoded string payload.
///
/// A length prefix above this is treated as stream corruption rather than
/// honored with an allocation.
pub const MAX_STRING_BYTES: u32 = 16 * 1024 * 1024;

/// Map a truncated read to [`Error::UnexpectedEof`], keeping other I/O
/// failures as-is.
fn eof_while(what: &'static str) -> impl FnOnce(std::io::Error) -> Error {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::UnexpectedEof(what)
        } else {
            Error::Io(e)
        }
    }
}

/// Write an element count.
pub fn write_count<W: Write + ?Sized>(out: &mut W, count: usize) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| Error::invalid_stream(format!("count {count} exceeds u32 range")))?;
    out.write_u32::<LittleEndian>(count)?;
    Ok(())
}

/// Read an element count.
pub fn read_count<R: Read + ?Sized>(input: &mut R) -> Result<usize> {
    let count = input
        .read_u32::<LittleEndian>()
        .map_err(eof_while("element count"))?;
    Ok(count as usize)
}

/// Write a single byte.
pub fn write_u8<W: Write + ?Sized>(out: &mut W, value: u8) -> Result<()> {
    out.write_u8(value)?;
    Ok(())
}

/// Read a single byte.
pub fn read_u8<R: Read + ?Sized>(input: &mut R, what: &'static str) -> Result<u8> {
    input.read_u8().map_err(eof_while(what))
}

/// Write one numeric component.
pub fn write_f64<W: Write + ?Sized>(out: &mut W, value: f64) -> Result<()> {
    out.write_f64::<LittleEndian>(value)?;
    Ok(())
}

/// Read one numeric component.
pub fn read_f64<R: Read + ?Sized>(input: &mut R) -> Result<f64> {
    input
        .read_f64::<LittleEndian>()
        .map_err(eof_while("numeric component"))
}

/// Write an optional string: presence byte, then length-prefixed UTF-8.
pub fn write_opt_string<W: Write + ?Sized>(out: &mut W, value: Option<&str>) -> Result<()> {
    match value {
        None => {
            out.write_u8(0)?;
        }
        Some(s) => {
            out.write_u8(1)?;
            let len = u32::try_from(s.len())
                .map_err(|_| Error::invalid_stream("string exceeds u32 length".to_string()))?;
            if len > MAX_STRING_BYTES {
                return Err(Error::invalid_stream(format!("string of {len} bytes too large")));
            }
            out.write_u32::<LittleEndian>(len)?;
            out.write_all(s.as_bytes())?;
        }
    }
    Ok(())
}

/// Read an optional string written by [`write_opt_string`].
pub fn read_opt_string<R: Read + ?Sized>(input: &mut R) -> Result<Option<String>> {
    match read_u8(input, "string presence flag")? {
        0 => Ok(None),
        1 => {
            let len = input
                .read_u32::<LittleEndian>()
                .map_err(eof_while("string length"))?;
            if len > MAX_STRING_BYTES {
                return Err(Error::invalid_stream(format!(
                    "string length {len} exceeds {MAX_STRING_BYTES} bytes"
                )));
            }
            let mut buf = vec![0u8; len as usize];
            input.read_exact(&mut buf).map_err(eof_while("string payload"))?;
            Ok(Some(String::from_utf8(buf)?))
        }
        flag => Err(Error::invalid_stream(format!("invalid presence flag: {flag}"))),
    }
}
