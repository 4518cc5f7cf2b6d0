//! Section marker validation.

use std::io::Read;
use log::{debug, warn};

use crate::cnut::types::error::{ReaderError, Result};
use crate::cnut::types::models::{tag_name, Architecture};
use crate::cnut::utils;

/// Reads one architecture-sized integer and checks it against a packed tag.
///
/// The value carries no payload; a match only confirms the reader is in step with the image.
pub fn confirm<R: Read + ?Sized>(stream: &mut R, arch: Architecture, expected: u32) -> Result<()> {
    let found = utils::read_number(stream, arch)?;
    if found != expected as u64 {
        warn!("Marker mismatch: expected {}, found {:#x}", tag_name(expected), found);
        return Err(ReaderError::MarkerMismatch {
            expected: tag_name(expected),
            found,
        });
    }
    debug!("Marker {} confirmed", tag_name(expected));
    Ok(())
}
