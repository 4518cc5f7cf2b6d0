//! Low-level byte reading utilities

use std::io::{Read, Seek, SeekFrom};
use byteorder::{NativeEndian, ReadBytesExt};
use encoding_rs::Encoding;

use super::types::error::{ReaderError, Result};
use super::types::models::Architecture;

/// Read a 4 or 8 byte unsigned number in host byte order.
///
/// Used for every architecture-sized field (lengths, markers).
/// 4-byte values are zero-extended.
pub fn read_number<R: Read + ?Sized>(reader: &mut R, arch: Architecture) -> Result<u64> {
    match arch.number_width()? {
        8 => Ok(reader.read_u64::<NativeEndian>()?),
        _ => Ok(reader.read_u32::<NativeEndian>()? as u64),
    }
}

/// Read a 4 or 8 byte signed number in host byte order.
///
/// 4-byte values are sign-extended.
pub fn read_signed_number<R: Read + ?Sized>(reader: &mut R, arch: Architecture) -> Result<i64> {
    match arch.number_width()? {
        8 => Ok(reader.read_i64::<NativeEndian>()?),
        _ => Ok(reader.read_i32::<NativeEndian>()? as i64),
    }
}

/// Fill `buf` completely or fail. An empty buffer never touches the reader.
pub fn read_exact_or_skip<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    if buf.is_empty() {
        return Ok(());
    }
    reader.read_exact(buf).map_err(ReaderError::from)
}

/// Total length of a seekable stream. The cursor is left where it was.
pub fn stream_len<R: Seek + ?Sized>(stream: &mut R) -> Result<u64> {
    let pos = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    if pos != end {
        stream.seek(SeekFrom::Start(pos))?;
    }
    Ok(end)
}

/// Map an encoding label to an `encoding_rs` encoding.
///
/// Accepts WHATWG labels plus the common shorthands `sjis` and `gbk`.
/// Unknown labels fall back to UTF-8.
pub fn parse_encoding(label: &str) -> &'static Encoding {
    let normalized = label.trim().to_ascii_lowercase();
    let label = match normalized.as_str() {
        "sjis" | "shiftjis" => "shift_jis",
        "gbk" | "gb2312" => "gb18030",
        "utf8" => "utf-8",
        other => other,
    };
    Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8)
}

/// Decode raw bytes with the given encoding, replacing malformed sequences.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn four_byte_numbers_extend_by_signedness() {
        let bytes = (-2i32).to_ne_bytes();
        assert_eq!(read_signed_number(&mut Cursor::new(bytes), Architecture::Arch32).unwrap(), -2);
        assert_eq!(
            read_number(&mut Cursor::new(bytes), Architecture::Arch32).unwrap(),
            0xffff_fffe
        );
    }

    #[test]
    fn eight_byte_numbers_use_full_width() {
        let bytes = 0x0102_0304_0506_0708u64.to_ne_bytes();
        let mut cursor = Cursor::new(bytes);
        assert_eq!(read_number(&mut cursor, Architecture::Arch64).unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn unknown_architecture_reads_nothing() {
        let mut cursor = Cursor::new(vec![0u8; 8]);
        assert!(matches!(
            read_number(&mut cursor, Architecture::Unknown),
            Err(ReaderError::UnknownArchitecture)
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn stream_len_keeps_cursor() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        cursor.set_position(3);
        assert_eq!(stream_len(&mut cursor).unwrap(), 10);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn encoding_labels_resolve() {
        assert_eq!(parse_encoding("UTF-8"), encoding_rs::UTF_8);
        assert_eq!(parse_encoding("sjis"), encoding_rs::SHIFT_JIS);
        assert_eq!(parse_encoding("gbk"), encoding_rs::GB18030);
        assert_eq!(parse_encoding("no-such-charset"), encoding_rs::UTF_8);
    }
}
