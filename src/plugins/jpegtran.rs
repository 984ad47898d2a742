//! Lossless JPEG transform.
//!
//! Rewrites the marker stream without touching entropy-coded data, so
//! the decoded pixels are bit-identical. What shrinks is metadata: EXIF,
//! XMP, ICC, maker notes, thumbnails and comments, following jpegtran's
//! `-copy` semantics.

use super::Plugin;
use crate::error::{CompressionError, Result};
use crate::formats::is_jpeg;

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const TEM: u8 = 0x01;
const APP0: u8 = 0xE0;
const APP14: u8 = 0xEE;
const COM: u8 = 0xFE;

/// Which optional segments survive the rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerPolicy {
    /// Keep only the JFIF and Adobe headers
    #[default]
    None,
    /// Also keep COM segments
    Comments,
    /// Keep every segment; only trailing garbage is dropped
    All,
}

impl MarkerPolicy {
    fn keeps(&self, marker: u8, payload: &[u8]) -> bool {
        match marker {
            APP0 => *self == MarkerPolicy::All || payload.starts_with(b"JFIF\0"),
            // Adobe header carries the colour transform flag
            APP14 => *self == MarkerPolicy::All || payload.starts_with(b"Adobe"),
            0xE1..=0xEF => *self == MarkerPolicy::All,
            COM => *self != MarkerPolicy::None,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JpegtranPlugin {
    pub copy: MarkerPolicy,
}

impl JpegtranPlugin {
    pub fn new(copy: MarkerPolicy) -> Self {
        Self { copy }
    }
}

impl Plugin for JpegtranPlugin {
    fn name(&self) -> &str {
        "jpegtran"
    }

    fn accepts(&self, data: &[u8]) -> bool {
        is_jpeg(data)
    }

    fn optimize(&self, data: &[u8]) -> Result<Vec<u8>> {
        strip_markers(data, self.copy)
    }
}

fn malformed(msg: impl Into<String>) -> CompressionError {
    CompressionError::MalformedJpeg(msg.into())
}

/// Copies `data` segment by segment, dropping what `policy` rejects.
pub fn strip_markers(data: &[u8], policy: MarkerPolicy) -> Result<Vec<u8>> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return Err(malformed("missing SOI marker"));
    }

    let mut out = Vec::with_capacity(data.len());
    out.extend_from_slice(&[0xFF, SOI]);
    let mut pos = 2;
    let mut seen_scan = false;

    loop {
        if pos >= data.len() {
            if !seen_scan {
                return Err(malformed("unexpected end of stream before EOI"));
            }
            // Truncated after image data: terminate it the way a decoder would.
            crate::warn!("JPEG ends without EOI after {} bytes, terminating it", data.len());
            out.extend_from_slice(&[0xFF, EOI]);
            return Ok(out);
        }
        if data[pos] != 0xFF {
            return Err(malformed(format!("expected marker at offset {}", pos)));
        }
        // Any number of 0xFF fill bytes may precede a marker code.
        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        let Some(&marker) = data.get(pos) else {
            return Err(malformed("unexpected end of stream in marker"));
        };
        pos += 1;

        match marker {
            EOI => {
                out.extend_from_slice(&[0xFF, EOI]);
                return Ok(out);
            }
            TEM | 0xD0..=0xD7 => {
                out.extend_from_slice(&[0xFF, marker]);
            }
            _ => {
                let (segment_end, payload) = read_segment(data, pos)?;
                if policy.keeps(marker, payload) {
                    out.extend_from_slice(&[0xFF, marker]);
                    out.extend_from_slice(&data[pos..segment_end]);
                }
                pos = segment_end;

                if marker == SOS {
                    seen_scan = true;
                    let scan_end = entropy_data_end(data, pos);
                    out.extend_from_slice(&data[pos..scan_end]);
                    pos = scan_end;
                }
            }
        }
    }
}

/// Reads the big-endian length at `pos` and returns the segment end and
/// its payload (the bytes after the length field).
fn read_segment(data: &[u8], pos: usize) -> Result<(usize, &[u8])> {
    let Some(length_bytes) = data.get(pos..pos + 2) else {
        return Err(malformed("truncated segment length"));
    };
    let length = u16::from_be_bytes([length_bytes[0], length_bytes[1]]) as usize;
    if length < 2 {
        return Err(malformed(format!("invalid segment length {}", length)));
    }
    let end = pos + length;
    if end > data.len() {
        return Err(malformed("segment extends past end of stream"));
    }
    Ok((end, &data[pos + 2..end]))
}

/// Scans entropy-coded bytes and returns the offset of the next real
/// marker. Stuffed zeros (`FF 00`) and restart markers are part of the scan.
fn entropy_data_end(data: &[u8], from: usize) -> usize {
    let mut i = from;
    while i + 1 < data.len() {
        if data[i] == 0xFF {
            match data[i + 1] {
                0x00 | 0xD0..=0xD7 => i += 2,
                0xFF => i += 1,
                _ => return i,
            }
        } else {
            i += 1;
        }
    }
    data.len()
}
