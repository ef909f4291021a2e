use std::io::{self, Write};

use flate2::{Compression, write::GzEncoder};

/// Gzip `data` at the given level (0-9).
///
/// # Errors
///
/// Returns an error if the encoder fails to write.
pub fn gzip(data: &[u8], level: u32) -> io::Result<Vec<u8>> {
  let mut encoder =
    GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::new(level));
  encoder.write_all(data)?;
  encoder.finish()
}
