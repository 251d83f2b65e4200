//! Gzip inflation of the downloaded snapshot.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Inflate a gzip stream into the raw database image.
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut image = Vec::with_capacity(compressed.len().saturating_mul(4));

    decoder
        .read_to_end(&mut image)
        .map_err(|e| Error::Decompress(e.to_string()))?;

    tracing::debug!(
        "Decompressed {} bytes into {} bytes",
        compressed.len(),
        image.len()
    );

    Ok(image)
}
