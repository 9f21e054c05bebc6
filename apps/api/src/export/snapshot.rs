//! Reads pixel dimensions from a PNG snapshot without decoding it.
//!
//! Layout: 8-byte signature, then the IHDR chunk (4-byte length, `IHDR`,
//! 4-byte big-endian width, 4-byte big-endian height, ...).

use thiserror::Error;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const IHDR_END: usize = 24;

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Snapshot is not a PNG image")]
    NotPng,

    #[error("Snapshot is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("Snapshot has zero width or height")]
    ZeroDimension,
}

/// Returns `(width, height)` in pixels.
pub fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32), SnapshotError> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..8] != PNG_SIGNATURE {
        return Err(SnapshotError::NotPng);
    }
    if bytes.len() < IHDR_END {
        return Err(SnapshotError::Truncated(bytes.len()));
    }
    if &bytes[12..16] != b"IHDR" {
        return Err(SnapshotError::NotPng);
    }

    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    if width == 0 || height == 0 {
        return Err(SnapshotError::ZeroDimension);
    }
    Ok((width, height))
}
