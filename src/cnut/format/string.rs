//! Length-prefixed strings and tagged string objects.
//!
//! # Encoding
//! ```text
//! string:        [arch-sized length][length raw bytes]
//! string object: [u32 tag] then, for the String tag, a string
//! ```
//! Strings carry no terminator and no character set; they are returned as raw bytes.

use std::io::{Read, Seek};
use byteorder::{NativeEndian, ReadBytesExt};
use log::{trace, warn};

use crate::cnut::types::error::{ReaderError, Result};
use crate::cnut::types::models::{Architecture, StringObjectTag};
use crate::cnut::utils;

/// Payload bytes are copied through a buffer of this size.
const CHUNK_SIZE: usize = 128;

/// Reads a length-prefixed string.
///
/// The length is validated before anything is allocated: it must be
/// non-negative, at most `max_len`, and no longer than what is left in the stream.
///
/// `stream_end` caches the stream length across calls; it is filled on first use.
pub fn read_string<R: Read + Seek + ?Sized>(
    stream: &mut R,
    arch: Architecture,
    max_len: u64,
    stream_end: &mut Option<u64>,
) -> Result<Vec<u8>> {
    let len = utils::read_signed_number(stream, arch)?;
    trace!("String length: {}", len);

    if len < 0 {
        warn!("Negative string length {}", len);
        return Err(ReaderError::NegativeLength(len));
    }
    let len = len as u64;
    if len == 0 {
        return Ok(Vec::new());
    }
    if len > max_len {
        warn!("String length {} exceeds configured limit {}", len, max_len);
        return Err(ReaderError::StringTooLong { len, limit: max_len });
    }
    let end = match *stream_end {
        Some(end) => end,
        None => *stream_end.insert(utils::stream_len(stream)?),
    };
    let remaining = end.saturating_sub(stream.stream_position()?);
    if len > remaining {
        warn!("String length {} exceeds the {} bytes left in the stream", len, remaining);
        return Err(ReaderError::StringTooLong { len, limit: remaining });
    }

    let len = len as usize;
    let mut out = Vec::with_capacity(len);
    let mut chunk = [0u8; CHUNK_SIZE];
    while out.len() < len {
        let n = (len - out.len()).min(CHUNK_SIZE);
        stream.read_exact(&mut chunk[..n])?;
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}

/// Reads a string object: a 32-bit type tag followed by its payload.
///
/// - `String` tag: a length-prefixed string follows.
/// - `Null` tag: no payload, yields an empty string.
/// - Any other tag: [`ReaderError::UnexpectedStringTag`], after consuming only the tag.
pub fn read_string_object<R: Read + Seek + ?Sized>(
    stream: &mut R,
    arch: Architecture,
    max_len: u64,
    stream_end: &mut Option<u64>,
) -> Result<Vec<u8>> {
    let raw_tag = stream.read_u32::<NativeEndian>()?;
    trace!("String object tag: {:#010x}", raw_tag);

    match StringObjectTag::try_from(raw_tag) {
        Ok(StringObjectTag::String) => read_string(stream, arch, max_len, stream_end),
        Ok(StringObjectTag::Null) => Ok(Vec::new()),
        Err(e) => {
            warn!("Unexpected string object tag {:#010x}", raw_tag);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn payload_longer_than_one_chunk_is_read_whole() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(CHUNK_SIZE * 3 + 5).collect();
        let mut bytes = (payload.len() as u32).to_ne_bytes().to_vec();
        bytes.extend_from_slice(&payload);
        let mut stream = Cursor::new(bytes);

        let got = read_string(&mut stream, Architecture::Arch32, u64::MAX, &mut None).unwrap();
        assert_eq!(got, payload);
    }

    #[test]
    fn length_past_end_of_stream_is_rejected_before_reading() {
        let mut bytes = 100u64.to_ne_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let mut stream = Cursor::new(bytes);

        let err =
            read_string(&mut stream, Architecture::Arch64, u64::MAX, &mut None).unwrap_err();
        assert!(matches!(err, ReaderError::StringTooLong { len: 100, limit: 5 }));
        assert_eq!(stream.position(), 8);
    }
}
