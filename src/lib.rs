pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod pattern;
pub mod plugins;
pub mod processing;
pub mod quality;
pub mod utils;

pub use batch::{minify, minify_async, MinifyOptions};
pub use error::{CompressionError, Result};
pub use formats::SourceFormat;
pub use pattern::{collect_input_files, expand_braces, is_junk_file};
pub use plugins::{Plugin, PluginChain};
pub use processing::{
    generate_output_path, optimize_file, process_file, validate_file_exists, write_atomically,
    ProcessedFile,
};
pub use quality::{Preset, QualityRange};
pub use utils::summary_line;
