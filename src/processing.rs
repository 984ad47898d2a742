use crate::constants::MAX_FILE_SIZE;
use crate::error::{CompressionError, Result};
use crate::formats::SourceFormat;
use crate::plugins::PluginChain;
use crate::utils::calculate_compression_ratio;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub format: SourceFormat,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl ProcessedFile {
    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_size, self.compressed_size)
    }
}

/// Validates that a file exists at the given path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use img_minify::validate_file_exists;
///
/// let result = validate_file_exists(Path::new("nonexistent.jpg"));
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Reads an input file, refusing anything over [`MAX_FILE_SIZE`].
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    validate_file_exists(path)?;

    let file_size = fs::metadata(path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(CompressionError::FileTooLarge(file_size, MAX_FILE_SIZE));
    }

    Ok(fs::read(path)?)
}

/// Output files are flattened into `output_dir` under their own file name.
pub fn generate_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = input_path
        .file_name()
        .ok_or_else(|| CompressionError::InvalidFileName(input_path.to_path_buf()))?;

    Ok(output_dir.join(file_name))
}

/// Writes `data` to a temp file beside `destination`, then renames it
/// into place.
pub fn write_atomically(destination: &Path, data: &[u8]) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.flush()?;
    temp.persist(destination).map_err(|e| CompressionError::Io(e.error))?;

    Ok(())
}

/// Read -> plugin chain -> write, for a single file.
pub fn process_file(
    input_path: &Path,
    output_dir: &Path,
    chain: &PluginChain,
) -> Result<ProcessedFile> {
    let (processed, optimized) = optimize_file(input_path, output_dir, chain)?;
    write_atomically(&processed.destination, &optimized)?;
    Ok(processed)
}

/// Runs the chain without touching the output directory. The record names
/// the destination the returned bytes belong at.
pub fn optimize_file(
    input_path: &Path,
    output_dir: &Path,
    chain: &PluginChain,
) -> Result<(ProcessedFile, Vec<u8>)> {
    let data = read_input(input_path)?;
    let original_size = data.len() as u64;
    let format = SourceFormat::detect(&data);

    let optimized = chain.process(data)?;
    let destination = generate_output_path(input_path, output_dir)?;

    let processed = ProcessedFile {
        source: input_path.to_path_buf(),
        destination,
        format,
        original_size,
        compressed_size: optimized.len() as u64,
    };
    Ok((processed, optimized))
}
