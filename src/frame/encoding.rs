//! Text decoding with a permissive fallback.
//!
//! Inputs are decoded as UTF-8 first. When that fails the bytes are decoded
//! once more as windows-1252, which maps every byte to a character and never
//! fails.

use encoding_rs::WINDOWS_1252;
use std::fmt;
use tracing::warn;

/// Encoding that produced the decoded text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1252,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Windows1252 => write!(f, "windows-1252"),
        }
    }
}

/// Decode raw bytes, retrying with windows-1252 on invalid UTF-8
pub fn decode_with_fallback(bytes: &[u8]) -> (String, TextEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            let text = text.strip_prefix('\u{feff}').unwrap_or(text);
            (text.to_owned(), TextEncoding::Utf8)
        }
        Err(error) => {
            warn!(
                "Input is not valid UTF-8 ({}), retrying with {}",
                error,
                TextEncoding::Windows1252
            );
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text.into_owned(), TextEncoding::Windows1252)
        }
    }
}
