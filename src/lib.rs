//! # cnut-reader
//!
//! A sequential reader for compiled Squirrel-style bytecode images.
//! Detects whether architecture-sized integers are 4 or 8 bytes wide, decodes
//! host-order primitives, length-prefixed strings and string objects, and
//! validates `PART` section markers.
//!
//! The record walker built on top of this (functions, literals, instructions)
//! drives the reader field by field; the reader itself knows no record layout.
pub mod cnut;

// Re-export the main types for convenience
pub use cnut::{
    BinaryReader,
    ReaderError,
    Result,
    types::models::{
        pack_tag,
        Architecture,
        ErrorKind,
        ReaderOptions,
        StringObjectTag,
        DEFAULT_MAX_STRING_LEN,
        PART_MAGIC,
        SQIR_MAGIC,
    },
    utils::parse_encoding,
};
