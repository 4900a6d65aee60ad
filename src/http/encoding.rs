//! Response body compression.
//!
//! Only gzip is ever produced. The level matches zlib's best compression.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

pub const GZIP: &str = "gzip";

#[derive(Debug, thiserror::Error)]
#[error("gzip compression failed: {0}")]
pub struct CompressionError(#[from] std::io::Error);

/// Compresses `data` into a complete gzip member.
pub fn gzip(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), Compression::best());
    encoder.write_all(data).map_err(|err| {
        tracing::trace!("error writing gzip stream: {}", err);
        err
    })?;
    Ok(encoder.finish()?)
}
