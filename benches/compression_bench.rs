use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{ImageFormat, Rgba, RgbaImage};
use img_minify::plugins::jpegtran::{strip_markers, MarkerPolicy};
use img_minify::plugins::{Plugin, PluginChain, PngquantOptions, PngquantPlugin, SvgoPlugin};
use img_minify::{expand_braces, Preset, QualityRange};
use std::io::Cursor;

fn gradient_png(size: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(size, size, |x, y| {
        Rgba([(x * 255 / size) as u8, (y * 255 / size) as u8, ((x ^ y) % 256) as u8, 255])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn jpeg_with_metadata(size: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(size, size, |x, y| image::Rgb([x as u8, y as u8, 128]));
    let mut clean = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut clean, 85)
        .encode_image(&img)
        .unwrap();

    let payload = [b"Exif\0\0".as_slice(), &[0u8; 4096]].concat();
    let mut data = clean[..2].to_vec();
    data.extend_from_slice(&[0xFF, 0xE1]);
    data.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    data.extend_from_slice(&payload);
    data.extend_from_slice(&clean[2..]);
    data
}

const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <metadata>editor data</metadata>
  <g id="layer1" transform="translate(0.000000,0.000000)">
    <rect x="10.000000" y="10.000000" width="80.000000" height="80.000000" style="fill:#ff0000;stroke:none"/>
  </g>
</svg>"#;

fn bench_brace_expansion(c: &mut Criterion) {
    c.bench_function("brace_expansion", |b| {
        b.iter(|| expand_braces(black_box("assets/{icons,photos/{2023,2024}}/*.{jpg,png,svg}")))
    });
}

fn bench_jpeg_strip(c: &mut Criterion) {
    let data = jpeg_with_metadata(512);

    c.bench_function("jpeg_strip", |b| {
        b.iter(|| strip_markers(black_box(&data), MarkerPolicy::None))
    });
}

fn bench_pngquant_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("pngquant");
    group.sample_size(10);
    let data = gradient_png(256);

    for preset in [Preset::Standard, Preset::High] {
        let plugin = PngquantPlugin::new(PngquantOptions {
            quality: preset.quality_range(),
            ..PngquantOptions::default()
        });
        group.bench_with_input(
            BenchmarkId::new("quantize", preset.quality_range().to_string()),
            &data,
            |b, data| b.iter(|| plugin.optimize(black_box(data))),
        );
    }

    group.finish();
}

fn bench_svg(c: &mut Criterion) {
    let plugin = SvgoPlugin::default();

    c.bench_function("svgo", |b| b.iter(|| plugin.optimize(black_box(SVG.as_bytes()))));
}

fn bench_plugin_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("plugin_chain");
    group.sample_size(10);
    let chain = PluginChain::with_defaults(QualityRange::default());

    let inputs = [
        ("jpeg", jpeg_with_metadata(256)),
        ("png", gradient_png(128)),
        ("svg", SVG.as_bytes().to_vec()),
    ];
    for (name, data) in inputs {
        group.bench_with_input(BenchmarkId::new("process", name), &data, |b, data| {
            b.iter(|| chain.process(black_box(data.clone())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_brace_expansion,
    bench_jpeg_strip,
    bench_pngquant_presets,
    bench_svg,
    bench_plugin_chain
);
criterion_main!(benches);
