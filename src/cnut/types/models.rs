//! Core data structures for the bytecode image reader.
//!
//! This module defines:
//! - The architecture tag selecting 4 or 8 byte "architecture-sized" fields
//! - Packed magic constants (`SQIR`, `PART`)
//! - String object type tags
//! - Reader configuration

use std::fmt;

use super::error::{ReaderError, Result};

/// Packs a 4-character tag into an integer, first character in the most significant byte.
pub const fn pack_tag(tag: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*tag)
}

/// Signature used to detect the integer width of an image (`'SQIR'`).
pub const SQIR_MAGIC: u32 = pack_tag(b"SQIR");

/// Structural checkpoint between sections of an image (`'PART'`).
pub const PART_MAGIC: u32 = pack_tag(b"PART");

/// Byte offset of the architecture probe, measured from the start of the stream.
pub const ARCH_PROBE_OFFSET: u64 = 2;

/// Default upper bound on a single string payload (16 MiB).
pub const DEFAULT_MAX_STRING_LEN: u64 = 16 * 1024 * 1024;

/// Width of architecture-sized integers in an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Architecture {
    #[default]
    Unknown,
    Arch32,
    Arch64,
}

impl Architecture {
    /// Returns the byte width for architecture-sized fields.
    ///
    /// - Arch32: 4 bytes
    /// - Arch64: 8 bytes
    /// - Unknown: error, the width must be resolved first
    pub fn number_width(&self) -> Result<usize> {
        match self {
            Architecture::Arch32 => Ok(4),
            Architecture::Arch64 => Ok(8),
            Architecture::Unknown => Err(ReaderError::UnknownArchitecture),
        }
    }

    pub fn is_resolved(&self) -> bool {
        *self != Architecture::Unknown
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Architecture::Unknown => write!(f, "unknown"),
            Architecture::Arch32 => write!(f, "32-bit"),
            Architecture::Arch64 => write!(f, "64-bit"),
        }
    }
}

/// Type tags that prefix a string object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringObjectTag {
    String = 0x0800_0010,
    Null = 0x0100_0001,
}

impl TryFrom<u32> for StringObjectTag {
    type Error = ReaderError;
    fn try_from(value: u32) -> Result<Self> {
        match value {
            0x0800_0010 => Ok(Self::String),
            0x0100_0001 => Ok(Self::Null),
            _ => Err(ReaderError::UnexpectedStringTag(value)),
        }
    }
}

/// Coarse classification of [`ReaderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stream could not deliver the requested bytes.
    Io,
    /// The bytes were delivered but violate a structural expectation.
    Format,
}

/// Tunables for a [`BinaryReader`](crate::cnut::reader::BinaryReader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Largest string payload accepted before failing with `StringTooLong`.
    pub max_string_len: u64,
    /// Architecture known out of band. `Unknown` leaves it to detection.
    pub architecture: Architecture,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            architecture: Architecture::Unknown,
        }
    }
}

impl ReaderOptions {
    pub fn with_max_string_len(mut self, max_string_len: u64) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }
}

/// Renders a packed tag back to its characters for messages, e.g. `0x50415254` -> `PART`.
pub fn tag_name(tag: u32) -> String {
    tag.to_be_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_first_character_into_high_byte() {
        assert_eq!(SQIR_MAGIC, 0x5351_4952);
        assert_eq!(PART_MAGIC, 0x5041_5254);
        assert_eq!(tag_name(PART_MAGIC), "PART");
    }

    #[test]
    fn unknown_architecture_has_no_width() {
        assert_eq!(Architecture::Arch32.number_width().unwrap(), 4);
        assert_eq!(Architecture::Arch64.number_width().unwrap(), 8);
        assert!(matches!(
            Architecture::Unknown.number_width(),
            Err(ReaderError::UnknownArchitecture)
        ));
    }

    #[test]
    fn string_object_tags_round_trip_through_try_from() {
        assert_eq!(StringObjectTag::try_from(0x0800_0010).unwrap(), StringObjectTag::String);
        assert_eq!(StringObjectTag::try_from(0x0100_0001).unwrap(), StringObjectTag::Null);
        assert!(matches!(
            StringObjectTag::try_from(0xdead_beef),
            Err(ReaderError::UnexpectedStringTag(0xdead_beef))
        ));
    }
}
