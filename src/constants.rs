pub const LOCATION_ENV_VAR: &str = "LOCATION";
pub const DEFAULT_LOCATION: &str = "images/*.{jpg,png,svg}";
pub const DEFAULT_OUTPUT_DIR: &str = "out";
/// Upper bound on the patterns one brace-expanded pattern may produce.
pub const MAX_BRACE_EXPANSIONS: usize = 1024;

pub const MIN_QUALITY: u8 = 0;
pub const MAX_QUALITY: u8 = 100;

/// PNG quality range of the default preset.
pub const STANDARD_QUALITY_RANGE: (u8, u8) = (60, 80);
/// PNG quality range of the high-fidelity preset.
pub const HIGH_QUALITY_RANGE: (u8, u8) = (90, 95);

pub const DEFAULT_PNGQUANT_SPEED: u8 = 4;
pub const DEFAULT_DITHERING_LEVEL: f32 = 1.0;

pub const OXIPNG_PRESET: u8 = 2;
/// Same for every quality range, so presets differ only in the palette.
pub const LIBDEFLATER_LEVEL: u8 = 12;

pub const DEFAULT_SVG_PRECISION: u8 = 3;

// Batch guard
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_BATCH_FILES: usize = 10_000;
pub const MAX_BATCH_MEMORY_MIB: u64 = 4096;
pub const MIN_AVAILABLE_MEMORY_MIB: u64 = 256;
pub const LARGE_IMAGE_THRESHOLD_MIB: f64 = 50.0;
pub const MAX_CONCURRENT_LARGE_IMAGES: usize = 2;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub const SUMMARY_PREFIX: &str = "🎉";

/// File names dropped from every input set (OS and editor droppings).
pub const JUNK_FILE_NAMES: &[&str] = &[
    ".DS_Store",
    ".AppleDouble",
    ".LSOverride",
    ".Spotlight-V100",
    ".Trashes",
    ".fseventsd",
    ".DocumentRevisions-V100",
    ".TemporaryItems",
    ".VolumeIcon.icns",
    "Icon\r",
    "Thumbs.db",
    "ehthumbs.db",
    "ehthumbs_vista.db",
    "Desktop.ini",
    "desktop.ini",
    "npm-debug.log",
    "$RECYCLE.BIN",
];
