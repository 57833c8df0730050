//! Text decoding for plain subtitle payloads
//!
//! Subtitle bytes arrive with a declared encoding tag. Decoding honours a
//! byte order mark when present, falls back to the declared encoding, and
//! normalizes line endings so every extractor sees `\n` only.
//!
//! # Example
//!
//! ```rust
//! use caption_core::utils::{decode_text, TextEncoding};
//!
//! let bytes = b"\xEF\xBB\xBFLine 1\r\nLine 2";
//! assert_eq!(decode_text(bytes, TextEncoding::Utf8)?, "Line 1\nLine 2");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{utils::CaptionError, Result};
use core::str;

/// Declared encoding of a plain subtitle payload
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    /// UTF-8
    #[default]
    Utf8,
    /// UTF-16 little endian
    Utf16Le,
    /// UTF-16 big endian
    Utf16Be,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
    /// Use the BOM if present, else UTF-8 when valid, else Latin-1
    Auto,
}

impl TextEncoding {
    /// Encoding name for log messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Latin1 => "ISO-8859-1",
            Self::Auto => "auto",
        }
    }
}

/// Byte Order Mark (BOM) signatures the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomType {
    /// UTF-8 BOM (EF BB BF)
    Utf8,
    /// UTF-16 Little Endian (FF FE)
    Utf16Le,
    /// UTF-16 Big Endian (FE FF)
    Utf16Be,
}

impl BomType {
    /// Get byte signature for this BOM type
    #[must_use]
    pub const fn signature(self) -> &'static [u8] {
        match self {
            Self::Utf8 => &[0xEF, 0xBB, 0xBF],
            Self::Utf16Le => &[0xFF, 0xFE],
            Self::Utf16Be => &[0xFE, 0xFF],
        }
    }

    /// Encoding this BOM announces
    #[must_use]
    pub const fn encoding(self) -> TextEncoding {
        match self {
            Self::Utf8 => TextEncoding::Utf8,
            Self::Utf16Le => TextEncoding::Utf16Le,
            Self::Utf16Be => TextEncoding::Utf16Be,
        }
    }
}

/// Detect BOM type from byte sequence
///
/// Returns the detected BOM type and the number of bytes to skip.
#[must_use]
pub fn detect_bom(bytes: &[u8]) -> Option<(BomType, usize)> {
    [BomType::Utf8, BomType::Utf16Le, BomType::Utf16Be]
        .into_iter()
        .find(|bom| bytes.starts_with(bom.signature()))
        .map(|bom| (bom, bom.signature().len()))
}

/// Decode a payload to a `String` with normalized line endings
///
/// A BOM overrides the declared encoding.
///
/// # Errors
///
/// Returns [`CaptionError::Decode`] when the bytes are not valid in the
/// effective encoding (including odd-length UTF-16 input).
pub fn decode_text(bytes: &[u8], declared: TextEncoding) -> Result<String> {
    let (encoding, body) = match detect_bom(bytes) {
        Some((bom, skip)) => (bom.encoding(), &bytes[skip..]),
        None => (declared, bytes),
    };

    let text = match encoding {
        TextEncoding::Utf8 => str::from_utf8(body)?.to_string(),
        TextEncoding::Utf16Le => decode_utf16(body, u16::from_le_bytes)?,
        TextEncoding::Utf16Be => decode_utf16(body, u16::from_be_bytes)?,
        TextEncoding::Latin1 => decode_latin1(body),
        TextEncoding::Auto => match str::from_utf8(body) {
            Ok(text) => text.to_string(),
            Err(_) => decode_latin1(body),
        },
    };

    Ok(normalize_line_endings(&text))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(CaptionError::decode(format!(
            "UTF-16 payload has odd length {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Normalize line endings to Unix style (\n)
///
/// Converts Windows (\r\n) and classic Mac (\r) line endings to Unix (\n).
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    // Replace \r\n first, then \r to avoid double conversion
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_boms() {
        assert_eq!(
            detect_bom(&[0xEF, 0xBB, 0xBF, b'H']),
            Some((BomType::Utf8, 3))
        );
        assert_eq!(detect_bom(&[0xFF, 0xFE, b'H', 0]), Some((BomType::Utf16Le, 2)));
        assert_eq!(detect_bom(&[0xFE, 0xFF, 0, b'H']), Some((BomType::Utf16Be, 2)));
        assert_eq!(detect_bom(b"Hi"), None);
    }

    #[test]
    fn decode_utf16_both_orders() {
        let le = [b'H', 0, b'i', 0];
        let be = [0, b'H', 0, b'i'];
        assert_eq!(decode_text(&le, TextEncoding::Utf16Le).unwrap(), "Hi");
        assert_eq!(decode_text(&be, TextEncoding::Utf16Be).unwrap(), "Hi");
    }

    #[test]
    fn bom_overrides_declared_encoding() {
        let bytes = [0xFF, 0xFE, b'o', 0, b'k', 0];
        assert_eq!(decode_text(&bytes, TextEncoding::Utf8).unwrap(), "ok");
    }

    #[test]
    fn odd_utf16_is_rejected() {
        let err = decode_text(&[b'H', 0, b'i'], TextEncoding::Utf16Le).unwrap_err();
        assert!(matches!(err, CaptionError::Decode(_)));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(decode_text(&[0xC3, 0x28], TextEncoding::Utf8).is_err());
    }

    #[test]
    fn latin1_and_auto() {
        let bytes = [b'c', b'a', b'f', 0xE9];
        assert_eq!(decode_text(&bytes, TextEncoding::Latin1).unwrap(), "café");
        assert_eq!(decode_text(&bytes, TextEncoding::Auto).unwrap(), "café");
        assert_eq!(
            decode_text("café".as_bytes(), TextEncoding::Auto).unwrap(),
            "café"
        );
    }

    #[test]
    fn line_endings() {
        assert_eq!(
            normalize_line_endings("Line 1\r\nLine 2\rLine 3\n"),
            "Line 1\nLine 2\nLine 3\n"
        );
    }
}
