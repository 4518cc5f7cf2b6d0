use std::io::{Read, Seek, SeekFrom};
use byteorder::{NativeEndian, ReadBytesExt};
use encoding_rs::Encoding;
use log::{debug, info};

use super::format::{arch, marker, string};
use super::types::error::{ReaderError, Result};
use super::types::models::{Architecture, ReaderOptions, PART_MAGIC};
use super::utils;

/// Sequential reader over a compiled bytecode image.
///
/// The reader borrows a caller-owned stream and decodes fields in the order
/// the caller asks for them. It never opens, closes or replaces the stream.
///
/// Architecture-sized fields (see [`read_arch_uint`](Self::read_arch_uint)) need
/// a resolved [`Architecture`], either from [`detect_architecture`](Self::detect_architecture),
/// [`set_architecture`](Self::set_architecture) or [`ReaderOptions::architecture`].
/// Once resolved, the architecture is fixed for the lifetime of the reader.
///
/// All values are decoded in host byte order.
#[derive(Debug)]
pub struct BinaryReader<'a, R: Read + Seek + ?Sized> {
    stream: &'a mut R,
    /// `options.architecture` is the live tag, updated when it is resolved.
    options: ReaderOptions,
    /// Stream length, measured once on first need.
    stream_end: Option<u64>,
}

impl<'a, R: Read + Seek + ?Sized> BinaryReader<'a, R> {
    /// Binds a reader to `stream` with default options and an unknown architecture.
    pub fn new(stream: &'a mut R) -> Self {
        Self::with_options(stream, ReaderOptions::default())
    }

    /// Binds a reader to `stream`.
    ///
    /// If `options.architecture` is resolved, it is used as-is and detection becomes a no-op.
    pub fn with_options(stream: &'a mut R, options: ReaderOptions) -> Self {
        Self {
            stream,
            options,
            stream_end: None,
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.options.architecture
    }

    /// Current options. `architecture` reflects the resolved tag, not only the initial one.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Resolves the architecture from the `SQIR` signature near the start of the stream.
    ///
    /// Leaves the cursor where it was. Returns [`Architecture::Unknown`] if neither
    /// width matches; in that case a later call may still resolve it.
    /// If the architecture is already resolved, returns it without probing.
    pub fn detect_architecture(&mut self) -> Result<Architecture> {
        let current = self.options.architecture;
        if current.is_resolved() {
            debug!("Architecture already resolved as {}, skipping probe", current);
            return Ok(current);
        }
        let detected = arch::detect(&mut *self.stream)?;
        if detected.is_resolved() {
            info!("Detected {} image", detected);
        } else {
            info!("No SQIR signature found, architecture unknown");
        }
        self.options.architecture = detected;
        Ok(detected)
    }

    /// Sets the architecture for callers that know it out of band.
    ///
    /// # Errors
    /// [`ReaderError::ArchitectureAlreadyResolved`] if a different architecture is already set.
    pub fn set_architecture(&mut self, requested: Architecture) -> Result<()> {
        let current = self.options.architecture;
        if current.is_resolved() && current != requested {
            return Err(ReaderError::ArchitectureAlreadyResolved {
                current,
                requested,
            });
        }
        self.options.architecture = requested;
        Ok(())
    }

    /// Current cursor position, in bytes from the start of the stream.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.stream.stream_position()?)
    }

    /// Moves the cursor to an absolute position.
    pub fn seek_to(&mut self, pos: u64) -> Result<u64> {
        Ok(self.stream.seek(SeekFrom::Start(pos))?)
    }

    /// Advances the cursor by `count` bytes without reading them.
    pub fn skip(&mut self, count: u64) -> Result<u64> {
        let offset = i64::try_from(count).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "skip distance overflows i64")
        })?;
        Ok(self.stream.seek(SeekFrom::Current(offset))?)
    }

    /// Total length of the underlying stream. The cursor is not moved.
    ///
    /// Measured once and cached; the stream is not expected to grow while being read.
    pub fn stream_len(&mut self) -> Result<u64> {
        match self.stream_end {
            Some(end) => Ok(end),
            None => Ok(*self.stream_end.insert(utils::stream_len(&mut *self.stream)?)),
        }
    }

    /// Reads an unsigned architecture-sized integer (4 or 8 bytes, zero-extended).
    pub fn read_arch_uint(&mut self) -> Result<u64> {
        utils::read_number(&mut *self.stream, self.options.architecture)
    }

    /// Reads a signed architecture-sized integer (4 or 8 bytes, sign-extended).
    pub fn read_arch_int(&mut self) -> Result<i64> {
        utils::read_signed_number(&mut *self.stream, self.options.architecture)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.stream.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.stream.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.stream.read_u16::<NativeEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.stream.read_i16::<NativeEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.stream.read_u32::<NativeEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.stream.read_i32::<NativeEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.stream.read_u64::<NativeEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.stream.read_i64::<NativeEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.stream.read_f32::<NativeEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.stream.read_f64::<NativeEndian>()?)
    }

    /// Reads a one-byte boolean. Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.stream.read_u8()? != 0)
    }

    /// Fills `buf` from the stream. An empty `buf` returns at once without touching the stream.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        utils::read_exact_or_skip(&mut *self.stream, buf)
    }

    /// Reads `len` raw bytes into a new buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Checks that the next architecture-sized integer is the `PART` marker.
    pub fn confirm_marker(&mut self) -> Result<()> {
        self.confirm_marker_value(PART_MAGIC)
    }

    /// Checks that the next architecture-sized integer equals a packed tag,
    /// e.g. [`pack_tag(b"TRAP")`](crate::cnut::types::models::pack_tag).
    pub fn confirm_marker_value(&mut self, expected: u32) -> Result<()> {
        marker::confirm(&mut *self.stream, self.options.architecture, expected)
    }

    /// Reads a length-prefixed string as raw bytes.
    ///
    /// # Errors
    /// - [`ReaderError::NegativeLength`] for a negative length prefix
    /// - [`ReaderError::StringTooLong`] if the length exceeds
    ///   [`ReaderOptions::max_string_len`] or the bytes left in the stream
    pub fn read_string(&mut self) -> Result<Vec<u8>> {
        string::read_string(
            &mut *self.stream,
            self.options.architecture,
            self.options.max_string_len,
            &mut self.stream_end,
        )
    }

    /// Reads a tagged string object as raw bytes. A `Null` object yields an empty string.
    pub fn read_string_object(&mut self) -> Result<Vec<u8>> {
        string::read_string_object(
            &mut *self.stream,
            self.options.architecture,
            self.options.max_string_len,
            &mut self.stream_end,
        )
    }

    /// Reads a length-prefixed string and decodes it, replacing malformed sequences.
    pub fn read_text(&mut self, encoding: &'static Encoding) -> Result<String> {
        let bytes = self.read_string()?;
        Ok(utils::decode_text(&bytes, encoding))
    }

    /// Reads a string object and decodes it, replacing malformed sequences.
    pub fn read_string_object_text(&mut self, encoding: &'static Encoding) -> Result<String> {
        let bytes = self.read_string_object()?;
        Ok(utils::decode_text(&bytes, encoding))
    }
}
