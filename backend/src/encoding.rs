// Decoding of mirrored HTML pages.
// Undecodable bytes become U+FFFD instead of failing the page.

use encoding_rs::{Encoding, UTF_16LE, UTF_16BE, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub text: String,
    pub encoding: &'static str,
    pub had_errors: bool,
}

/// Decodes page bytes to UTF-8 text with Unix line endings.
pub fn decode_html(bytes: &[u8]) -> DecodedPage {
    let (encoding, bom_len) = detect_encoding(bytes);

    // decode_without_bom_handling keeps the sniffed encoding, the BOM is skipped by hand
    let (decoded, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);

    if had_errors {
        tracing::warn!("Replaced undecodable bytes while decoding as {}", encoding.name());
    }

    DecodedPage {
        text: decoded.replace("\r\n", "\n"),
        encoding: encoding.name(),
        had_errors,
    }
}

/// Detects the encoding by examining the BOM. Returns the encoding and the BOM length.
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return (UTF_16LE, 2);
    }

    if bytes.starts_with(&[0xFE, 0xFF]) {
        return (UTF_16BE, 2);
    }

    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return (UTF_8, 3);
    }

    (UTF_8, 0)
}
