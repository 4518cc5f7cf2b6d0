//! Custom error types for the cnut-reader crate.

use thiserror::Error;

use super::models::{Architecture, ErrorKind};

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The underlying stream could not supply the requested bytes (EOF, device fault, bad seek).
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// An architecture-sized field was requested before the architecture was resolved.
    #[error("Architecture is unknown; detect or set it before reading architecture-sized fields")]
    UnknownArchitecture,

    /// A resolved architecture tag cannot be replaced for the lifetime of a reader.
    #[error("Architecture already resolved as {current}, refusing to switch to {requested}")]
    ArchitectureAlreadyResolved {
        current: Architecture,
        requested: Architecture,
    },

    /// A structural marker did not match the expected packed tag.
    #[error("Bad format of source binary file: expected marker {expected:?}, found {found:#x}")]
    MarkerMismatch { expected: String, found: u64 },

    /// A string object carried a type tag other than `String` or `Null`.
    #[error("Expected string object not found: unexpected tag {0:#010x}")]
    UnexpectedStringTag(u32),

    /// A string length prefix decoded to a negative value.
    #[error("Invalid string length: {0}")]
    NegativeLength(i64),

    /// A string length prefix exceeds the configured bound or the bytes left in the stream.
    #[error("String length {len} exceeds limit of {limit} bytes")]
    StringTooLong { len: u64, limit: u64 },
}

impl ReaderError {
    /// Classifies the error as a stream fault or a structural violation.
    ///
    /// Callers typically abort on [`ErrorKind::Io`] and may try to
    /// resynchronize on [`ErrorKind::Format`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }

    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

/// A convenience `Result` type alias using the crate's `ReaderError` type.
pub type Result<T> = std::result::Result<T, ReaderError>;
