//! Inflate downloaded release archives

use std::io::Read;

use flate2::read::{MultiGzDecoder, ZlibDecoder};

use crate::error::InstallError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflate a gzip stream (all members), or a zlib stream when the gzip
/// magic is absent.
pub fn inflate(compressed: &[u8]) -> Result<Vec<u8>, InstallError> {
    let mut raw = Vec::new();
    let result = if compressed.starts_with(&GZIP_MAGIC) {
        MultiGzDecoder::new(compressed).read_to_end(&mut raw)
    } else {
        ZlibDecoder::new(compressed).read_to_end(&mut raw)
    };
    result.map_err(InstallError::Decompress)?;
    Ok(raw)
}
