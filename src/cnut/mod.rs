//! Core reader module for compiled bytecode images.

pub mod format;
pub mod reader;
pub mod types;
pub mod utils;

pub use reader::BinaryReader;
pub use types::error::{ReaderError, Result};
