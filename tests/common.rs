#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub const SAMPLE_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with Inkscape (http://www.inkscape.org/) -->
<svg
   xmlns="http://www.w3.org/2000/svg"
   xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
   width="64"
   height="64"
   viewBox="0 0 64 64">
  <metadata id="metadata5">exported by an editor</metadata>
  <g inkscape:label="Layer 1" inkscape:groupmode="layer" id="layer1">
    <circle style="fill:#336699;fill-opacity:1;stroke:#000000;stroke-width:2.000000" cx="32.000000" cy="32.000000" r="24.000000" id="circle1" />
  </g>
</svg>
"#;

/// 24 flat colours scattered over 8x8 blocks; fits a palette under
/// every quality range.
pub fn blocks_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let i = ((x / 8).wrapping_mul(2_654_435_761) ^ (y / 8).wrapping_mul(40_503)) % 24;
        Rgba([(i * 10) as u8, (250 - i * 9) as u8, ((i * 37) % 200 + 40) as u8, 255])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Smooth two-axis gradient; too many colours for an exact palette but
/// easy to quantize.
pub fn smooth_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            ((x + y) * 127 / (width + height)) as u8,
            255,
        ])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub fn png_color_type(data: &[u8]) -> png::ColorType {
    let reader = png::Decoder::new(Cursor::new(data)).read_info().unwrap();
    reader.info().color_type
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
    });
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 90)
        .encode_image(&img)
        .unwrap();
    buffer
}

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() + 2) as u16;
    let mut seg = vec![0xFF, marker];
    seg.extend_from_slice(&length.to_be_bytes());
    seg.extend_from_slice(payload);
    seg
}

/// A real JPEG with an EXIF block and a comment spliced in after SOI.
pub fn jpeg_with_metadata(width: u32, height: u32) -> Vec<u8> {
    let clean = jpeg_bytes(width, height);
    let mut data = clean[..2].to_vec();
    data.extend(segment(0xE1, &[b"Exif\0\0".as_slice(), &[0x42; 512]].concat()));
    data.extend(segment(0xFE, b"shot on a very expensive camera"));
    data.extend_from_slice(&clean[2..]);
    data
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    fs::write(path, blocks_png_bytes(width, height)).unwrap();
}

pub fn write_jpeg(path: &Path) {
    fs::write(path, jpeg_with_metadata(32, 32)).unwrap();
}

pub fn write_svg(path: &Path) {
    fs::write(path, SAMPLE_SVG).unwrap();
}

/// `images/` with one file per supported format plus two that the
/// default pattern must not pick up.
pub fn create_default_layout(root: &Path) {
    let images = root.join("images");
    fs::create_dir_all(&images).unwrap();
    write_jpeg(&images.join("photo.jpg"));
    write_png(&images.join("chart.png"), 128, 128);
    write_svg(&images.join("logo.svg"));
    fs::write(images.join("anim.gif"), b"GIF89a").unwrap();
    fs::write(images.join("notes.txt"), b"not an image").unwrap();
}
