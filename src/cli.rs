use crate::batch::MinifyOptions;
use crate::constants::{DEFAULT_LOCATION, DEFAULT_OUTPUT_DIR, LOCATION_ENV_VAR};
use crate::quality::{Preset, QualityRange};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "img-minify",
    about = "Minify a batch of JPEG, PNG and SVG images into an output directory",
    long_about = "img-minify resolves one or more glob patterns, runs every matched file through \
                  a chain of format plugins and writes the results into an output directory. \
                  JPEGs lose their metadata losslessly, PNGs are palette-quantized within a \
                  quality range and recompressed with oxipng, SVGs are simplified with usvg. \
                  Files no plugin recognises are copied unchanged.",
    version,
    after_help = "EXAMPLES:\n  \
    img-minify\n  \
    LOCATION='assets/**/*.png' img-minify --preset high\n  \
    img-minify 'images/*.{jpg,png,svg}' '!images/raw-*' -o dist/img --quality 70-85"
)]
pub struct Args {
    #[arg(
        env = LOCATION_ENV_VAR,
        default_value = DEFAULT_LOCATION,
        help = "Glob patterns selecting input files",
        long_help = "Glob patterns selecting input files. Supports *, ?, [...], ** and brace \
                     expansion ({jpg,png}). Prefix a pattern with ! to exclude matches. A \
                     directory selects every file beneath it. Falls back to $LOCATION, then \
                     to the default."
    )]
    pub patterns: Vec<String>,

    #[arg(
        short = 'o',
        long,
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Output directory",
        long_help = "Directory receiving the minified files. Files are written flat, under \
                     their original file name."
    )]
    pub out_dir: PathBuf,

    #[arg(
        short = 'p',
        long,
        value_enum,
        default_value_t = Preset::Standard,
        help = "PNG quality preset"
    )]
    pub preset: Preset,

    #[arg(
        long,
        value_parser = parse_quality_range,
        value_name = "MIN-MAX",
        help = "PNG quality range, overrides --preset",
        long_help = "PNG quantization quality range in percent, e.g. 60-80. The quantizer aims \
                     for MAX and leaves a file untouched if it cannot reach MIN."
    )]
    pub quality: Option<QualityRange>,

    #[arg(
        short = 'j',
        long,
        help = "Number of parallel threads (default: auto)"
    )]
    pub threads: Option<usize>,

    #[arg(short = 'q', long, help = "Print only the summary line and errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print per-file results and batch statistics")]
    pub verbose: bool,
}

fn parse_quality_range(value: &str) -> Result<QualityRange, String> {
    value.parse::<QualityRange>().map_err(|e| e.to_string())
}

impl Args {
    /// An explicit `--quality` wins over the preset.
    pub fn quality_range(&self) -> QualityRange {
        self.quality
            .unwrap_or_else(|| self.preset.quality_range())
    }

    pub fn into_options(self) -> MinifyOptions {
        let quality = self.quality_range();
        MinifyOptions::new(self.patterns, self.out_dir, quality).with_threads(self.threads)
    }
}
