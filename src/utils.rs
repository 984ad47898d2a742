//! Size arithmetic and result printing shared by the batch and the binary.

use crate::processing::ProcessedFile;
use std::time::Duration;

/// Format file size in human-readable format
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Calculate compression ratio as a percentage
///
/// Positive means the output is smaller; zero-sized input yields 0.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// Totals over a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchTotals {
    pub files: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl BatchTotals {
    pub fn from_results(results: &[ProcessedFile]) -> Self {
        results.iter().fold(Self::default(), |acc, file| Self {
            files: acc.files + 1,
            original_bytes: acc.original_bytes + file.original_size,
            compressed_bytes: acc.compressed_bytes + file.compressed_size,
        })
    }

    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_bytes, self.compressed_bytes)
    }
}

/// The one line the tool always prints on success.
pub fn summary_line(count: usize) -> String {
    format!("{} {} images compressed", crate::constants::SUMMARY_PREFIX, count)
}

pub fn print_file_result(file: &ProcessedFile) {
    crate::verbose!(
        "{} [{}] {} -> {} ({:.1}%) => {}",
        file.source.display(),
        file.format,
        format_file_size(file.original_size),
        format_file_size(file.compressed_size),
        file.compression_ratio(),
        file.destination.display()
    );
}

pub fn print_batch_summary(results: &[ProcessedFile], elapsed: Duration) {
    let totals = BatchTotals::from_results(results);

    crate::verbose!("📊 Batch summary:");
    crate::verbose!("  📁 Files written: {}", totals.files);
    crate::verbose!(
        "  📊 Total size: {} -> {}",
        format_file_size(totals.original_bytes),
        format_file_size(totals.compressed_bytes)
    );
    crate::verbose!("  🎯 Overall compression ratio: {:.1}%", totals.compression_ratio());
    crate::verbose!("  ⏱️  Total time: {:.2?}", elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::SourceFormat;
    use std::path::PathBuf;

    fn processed(original: u64, compressed: u64) -> ProcessedFile {
        ProcessedFile {
            source: PathBuf::from("images/a.png"),
            destination: PathBuf::from("out/a.png"),
            format: SourceFormat::Png,
            original_size: original,
            compressed_size: compressed,
        }
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_calculate_compression_ratio() {
        assert_eq!(calculate_compression_ratio(1000, 800), 20.0);
        assert_eq!(calculate_compression_ratio(1000, 1200), -20.0);
        assert_eq!(calculate_compression_ratio(1000, 1000), 0.0);
        assert_eq!(calculate_compression_ratio(0, 500), 0.0);
    }

    #[test]
    fn test_batch_totals() {
        let totals = BatchTotals::from_results(&[processed(1000, 600), processed(1000, 400)]);
        assert_eq!(totals.files, 2);
        assert_eq!(totals.original_bytes, 2000);
        assert_eq!(totals.compressed_bytes, 1000);
        assert_eq!(totals.compression_ratio(), 50.0);

        assert_eq!(BatchTotals::from_results(&[]), BatchTotals::default());
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(0), "🎉 0 images compressed");
        assert_eq!(summary_line(3), "🎉 3 images compressed");
    }
}
