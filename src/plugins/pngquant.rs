//! Lossy PNG quantization.
//!
//! Reduces a truecolour PNG to an 8-bit palette with `imagequant`, writes
//! it as an indexed PNG and then squeezes the deflate stream with
//! `oxipng`.

use super::Plugin;
use crate::constants::{
    DEFAULT_DITHERING_LEVEL, DEFAULT_PNGQUANT_SPEED, LIBDEFLATER_LEVEL, OXIPNG_PRESET,
};
use crate::error::{CompressionError, Result};
use crate::formats::is_png;
use crate::quality::QualityRange;
use image::ImageFormat;
use oxipng::Deflaters;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PngquantOptions {
    pub quality: QualityRange,
    /// 1 (slowest, best) to 10 (fastest)
    pub speed: u8,
    /// 0.0 disables dithering, 1.0 is full Floyd-Steinberg
    pub dithering: f32,
    /// Run the quantized file through oxipng
    pub recompress: bool,
}

impl Default for PngquantOptions {
    fn default() -> Self {
        Self {
            quality: QualityRange::default(),
            speed: DEFAULT_PNGQUANT_SPEED,
            dithering: DEFAULT_DITHERING_LEVEL,
            recompress: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PngquantPlugin {
    options: PngquantOptions,
}

impl PngquantPlugin {
    pub fn new(options: PngquantOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PngquantOptions {
        &self.options
    }
}

impl Plugin for PngquantPlugin {
    fn name(&self) -> &str {
        "pngquant"
    }

    fn accepts(&self, data: &[u8]) -> bool {
        is_png(data)
    }

    fn optimize(&self, data: &[u8]) -> Result<Vec<u8>> {
        let Some((palette, indices, width, height)) = quantize(data, &self.options)? else {
            crate::verbose!(
                "pngquant: quality floor {} not reachable, keeping original",
                self.options.quality.min
            );
            return Ok(data.to_vec());
        };

        let encoded = encode_indexed(&palette, &indices, width, height)?;

        if self.options.recompress {
            recompress(&encoded)
        } else {
            Ok(encoded)
        }
    }
}

fn quant_error(e: imagequant::Error) -> CompressionError {
    CompressionError::PngQuantization(e.to_string())
}

/// Returns `None` when the quality floor cannot be met.
fn quantize(
    data: &[u8],
    options: &PngquantOptions,
) -> Result<Option<(Vec<imagequant::RGBA>, Vec<u8>, u32, u32)>> {
    let rgba = image::load_from_memory_with_format(data, ImageFormat::Png)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<imagequant::RGBA> = rgba
        .pixels()
        .map(|p| imagequant::RGBA::new(p[0], p[1], p[2], p[3]))
        .collect();

    if let Some((palette, indices)) = exact_palette(&pixels) {
        crate::verbose!("pngquant: {} colours fit a palette as-is", palette.len());
        return Ok(Some((palette, indices, width, height)));
    }

    let mut attributes = imagequant::new();
    attributes
        .set_speed(i32::from(options.speed))
        .map_err(quant_error)?;
    attributes
        .set_quality(options.quality.min, options.quality.max)
        .map_err(quant_error)?;

    let mut img = attributes
        .new_image(pixels, width as usize, height as usize, 0.0)
        .map_err(quant_error)?;

    let mut result = match attributes.quantize(&mut img) {
        Ok(result) => result,
        Err(imagequant::Error::QualityTooLow) => return Ok(None),
        Err(e) => return Err(quant_error(e)),
    };
    result
        .set_dithering_level(options.dithering)
        .map_err(quant_error)?;

    let (palette, indices) = result.remapped(&mut img).map_err(quant_error)?;
    Ok(Some((palette, indices, width, height)))
}

/// Palette and indices for an image that already has at most 256
/// distinct colours. Such images are not quantized at all, so every
/// quality range yields the same file.
fn exact_palette(pixels: &[imagequant::RGBA]) -> Option<(Vec<imagequant::RGBA>, Vec<u8>)> {
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::new();
    let mut palette = Vec::new();
    let mut indices = Vec::with_capacity(pixels.len());

    for pixel in pixels {
        let key = [pixel.r, pixel.g, pixel.b, pixel.a];
        let index = match lookup.get(&key) {
            Some(&index) => index,
            None => {
                let index = u8::try_from(palette.len()).ok()?;
                palette.push(*pixel);
                lookup.insert(key, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Writes an 8-bit indexed PNG. Alpha goes into tRNS, trimmed of
/// trailing opaque entries.
fn encode_indexed(
    palette: &[imagequant::RGBA],
    indices: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let rgb: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let mut alpha: Vec<u8> = palette.iter().map(|c| c.a).collect();
    while alpha.last() == Some(&u8::MAX) {
        alpha.pop();
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(rgb);
        if !alpha.is_empty() {
            encoder.set_trns(alpha);
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(indices)?;
        writer.finish()?;
    }
    Ok(buffer)
}

/// Lossless deflate pass over the indexed file.
fn recompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut options = oxipng::Options::from_preset(OXIPNG_PRESET);
    options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_LEVEL,
    };

    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}
