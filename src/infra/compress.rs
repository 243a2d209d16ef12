//! Gzip compression of index artifacts.
//!
//! Remote readers fetch the `.gz` artifacts over HTTP, so the output must be
//! plain gzip with no framing of our own.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// Gzip-encode a UTF-8 text artifact.
pub fn compress(text: &str) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder.finish()
}

/// Decode a gzip artifact back into UTF-8 text.
pub fn decompress(binary: &[u8]) -> Result<String, std::io::Error> {
    let mut decoder = GzDecoder::new(binary);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_text() {
        let text = "{\"Id\":1,\"BlogMetadataList\":[]}";
        let binary = compress(text).expect("compressible text");
        assert_ne!(binary.as_slice(), text.as_bytes());
        assert_eq!(decompress(&binary).expect("valid gzip"), text);
    }

    #[test]
    fn round_trips_empty_string() {
        let binary = compress("").expect("compressible text");
        assert_eq!(decompress(&binary).expect("valid gzip"), "");
    }

    #[test]
    fn round_trips_multibyte_text() {
        let text = "标题 — ein größerer Test 📝";
        let binary = compress(text).expect("compressible text");
        assert_eq!(decompress(&binary).expect("valid gzip"), text);
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(decompress(b"not gzip at all").is_err());
    }
}
