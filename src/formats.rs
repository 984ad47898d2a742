//! Content-based format detection
//!
//! Plugins decide whether a buffer is theirs by looking at its bytes, not
//! at the file name: a mislabelled `.png` that is really a JPEG still
//! reaches the JPEG transform.

use std::fmt;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const UTF8_BOM: &str = "\u{feff}";

/// Formats the default plugin list knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Svg,
    /// Anything else; copied through untouched
    Other,
}

impl SourceFormat {
    pub fn detect(data: &[u8]) -> Self {
        if is_jpeg(data) {
            SourceFormat::Jpeg
        } else if is_png(data) {
            SourceFormat::Png
        } else if is_svg(data) {
            SourceFormat::Svg
        } else {
            SourceFormat::Other
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Png => "PNG",
            SourceFormat::Svg => "SVG",
            SourceFormat::Other => "other",
        };
        write!(f, "{}", name)
    }
}

pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&JPEG_SIGNATURE)
}

pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

/// True when the document's root element is `<svg>`, after skipping an
/// optional BOM, XML declaration, processing instructions, comments and
/// a doctype.
pub fn is_svg(data: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(data) else {
        return false;
    };
    let mut rest = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("<?") {
            match after.find("?>") {
                Some(end) => rest = &after[end + 2..],
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = &after[end + 3..],
                None => return false,
            }
        } else if rest.starts_with("<!DOCTYPE") || rest.starts_with("<!doctype") {
            match skip_doctype(rest) {
                Some(after) => rest = after,
                None => return false,
            }
        } else {
            break;
        }
    }

    match rest.strip_prefix("<svg") {
        Some(after) => after
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/'),
        None => false,
    }
}

/// Skips a doctype declaration, including a bracketed internal subset.
fn skip_doctype(input: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (idx, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => return Some(&input[idx + 1..]),
            _ => {}
        }
    }
    None
}
