//! SVG structural optimization via `usvg`.
//!
//! `usvg` parses the document into a simplified tree (resolved styles,
//! no editor metadata, collapsed groups, absolute paths) and writes it
//! back without whitespace.

use super::Plugin;
use crate::constants::DEFAULT_SVG_PRECISION;
use crate::error::{CompressionError, Result};
use crate::formats::is_svg;

#[derive(Debug, Clone)]
pub struct SvgoOptions {
    /// Decimal places kept for coordinates
    pub coordinates_precision: u8,
    /// Decimal places kept for transform matrices
    pub transforms_precision: u8,
    /// Keep `<text>` as text instead of outlining it
    pub preserve_text: bool,
}

impl Default for SvgoOptions {
    fn default() -> Self {
        Self {
            coordinates_precision: DEFAULT_SVG_PRECISION,
            transforms_precision: DEFAULT_SVG_PRECISION + 5,
            preserve_text: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SvgoPlugin {
    options: SvgoOptions,
}

impl SvgoPlugin {
    pub fn new(options: SvgoOptions) -> Self {
        Self { options }
    }
}

impl Plugin for SvgoPlugin {
    fn name(&self) -> &str {
        "svgo"
    }

    fn accepts(&self, data: &[u8]) -> bool {
        is_svg(data)
    }

    fn optimize(&self, data: &[u8]) -> Result<Vec<u8>> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default())
            .map_err(|e| CompressionError::SvgOptimization(e.to_string()))?;

        let write_options = usvg::WriteOptions {
            coordinates_precision: self.options.coordinates_precision,
            transforms_precision: self.options.transforms_precision,
            preserve_text: self.options.preserve_text,
            indent: usvg::Indent::None,
            attributes_indent: usvg::Indent::None,
            ..usvg::WriteOptions::default()
        };

        Ok(tree.to_string(&write_options).into_bytes())
    }
}
