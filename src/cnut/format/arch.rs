//! Architecture detection from the `SQIR` signature.

use std::io::{self, Read, Seek, SeekFrom};
use log::{debug, trace};

use crate::cnut::types::error::Result;
use crate::cnut::types::models::{Architecture, ARCH_PROBE_OFFSET, SQIR_MAGIC};

/// Probes the signature at [`ARCH_PROBE_OFFSET`] and returns the architecture it implies.
///
/// # Resolution order
/// 1. 8 bytes at the probe offset equal to `SQIR` as a `u64` → [`Architecture::Arch64`]
/// 2. 4 bytes at the probe offset equal to `SQIR` as a `u32` → [`Architecture::Arch32`]
/// 3. Otherwise → [`Architecture::Unknown`]
///
/// A stream too short to hold a probe is a non-match, not an error.
/// The cursor is restored to its original position on every path.
pub fn detect<R: Read + Seek + ?Sized>(stream: &mut R) -> Result<Architecture> {
    let saved = stream.stream_position()?;
    let probed = probe(stream);
    stream.seek(SeekFrom::Start(saved))?;
    trace!("Architecture probe done, cursor restored to {}", saved);
    probed
}

fn probe<R: Read + Seek + ?Sized>(stream: &mut R) -> Result<Architecture> {
    if let Some(wide) = read_probe::<R, 8>(stream)? {
        let value = u64::from_ne_bytes(wide);
        debug!("64-bit probe: {:#018x}", value);
        if value == SQIR_MAGIC as u64 {
            return Ok(Architecture::Arch64);
        }
    }

    if let Some(narrow) = read_probe::<R, 4>(stream)? {
        let value = u32::from_ne_bytes(narrow);
        debug!("32-bit probe: {:#010x}", value);
        if value == SQIR_MAGIC {
            return Ok(Architecture::Arch32);
        }
    }

    Ok(Architecture::Unknown)
}

/// Reads `N` bytes at the probe offset, or `None` if the stream ends first.
fn read_probe<R: Read + Seek + ?Sized, const N: usize>(stream: &mut R) -> Result<Option<[u8; N]>> {
    stream.seek(SeekFrom::Start(ARCH_PROBE_OFFSET))?;
    let mut buf = [0u8; N];
    match stream.read_exact(&mut buf) {
        Ok(()) => Ok(Some(buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn image(signature: &[u8], tail: &[u8]) -> Cursor<Vec<u8>> {
        let mut bytes = vec![0xfa, 0xfa];
        bytes.extend_from_slice(signature);
        bytes.extend_from_slice(tail);
        Cursor::new(bytes)
    }

    #[test]
    fn narrow_signature_followed_by_data_is_32_bit() {
        let mut stream = image(&SQIR_MAGIC.to_ne_bytes(), &1u32.to_ne_bytes());
        assert_eq!(detect(&mut stream).unwrap(), Architecture::Arch32);
    }

    #[test]
    fn wide_signature_is_64_bit() {
        let mut stream = image(&(SQIR_MAGIC as u64).to_ne_bytes(), &[]);
        assert_eq!(detect(&mut stream).unwrap(), Architecture::Arch64);
    }

    #[test]
    fn narrow_signature_at_end_of_stream_is_32_bit() {
        let mut stream = image(&SQIR_MAGIC.to_ne_bytes(), &[]);
        assert_eq!(detect(&mut stream).unwrap(), Architecture::Arch32);
    }

    #[test]
    fn short_stream_is_unknown_and_cursor_restored() {
        let mut stream = Cursor::new(vec![0xfa, 0xfa, 0x52]);
        stream.set_position(1);
        assert_eq!(detect(&mut stream).unwrap(), Architecture::Unknown);
        assert_eq!(stream.position(), 1);
    }

    /// Seekable stream whose reads always fail with a device error.
    struct Faulty(Cursor<Vec<u8>>);

    impl Read for Faulty {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device fault"))
        }
    }

    impl Seek for Faulty {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.0.seek(pos)
        }
    }

    #[test]
    fn read_fault_is_returned_and_cursor_restored() {
        let mut stream = Faulty(Cursor::new(vec![0u8; 16]));
        stream.0.set_position(7);

        let err = detect(&mut stream).unwrap_err();
        assert!(err.is_io());
        assert_eq!(stream.0.position(), 7);

        let mut reader = crate::cnut::reader::BinaryReader::new(&mut stream);
        assert!(reader.detect_architecture().unwrap_err().is_io());
        assert_eq!(reader.architecture(), Architecture::Unknown);
        assert_eq!(reader.position().unwrap(), 7);
    }
}
