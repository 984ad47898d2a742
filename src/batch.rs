use crate::constants::{
    DEFAULT_LOCATION, DEFAULT_OUTPUT_DIR, LARGE_IMAGE_THRESHOLD_MIB, MAX_BATCH_FILES,
    MAX_BATCH_MEMORY_MIB, MAX_CONCURRENT_LARGE_IMAGES, MIN_AVAILABLE_MEMORY_MIB,
};
use crate::error::{CompressionError, Result};
use crate::logger;
use crate::pattern::collect_input_files;
use crate::plugins::PluginChain;
use crate::processing::{optimize_file, process_file, ProcessedFile};
use crate::quality::QualityRange;
use crate::utils::{print_batch_summary, print_file_result};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

/// Everything one batch run needs.
#[derive(Debug, Clone)]
pub struct MinifyOptions {
    pub patterns: Vec<String>,
    pub output_dir: PathBuf,
    pub quality: QualityRange,
    /// Upper bound on worker threads; `None` uses one per core
    pub threads: Option<usize>,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_LOCATION.to_string()],
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            quality: QualityRange::default(),
            threads: None,
        }
    }
}

impl MinifyOptions {
    pub fn new(patterns: Vec<String>, output_dir: impl Into<PathBuf>, quality: QualityRange) -> Self {
        Self {
            patterns,
            output_dir: output_dir.into(),
            quality,
            threads: None,
        }
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads.filter(|&n| n > 0);
        self
    }
}

/// Estimates peak memory for one file without decoding it.
///
/// # Returns
/// * `Ok(memory_mib)` - Estimated memory usage in MiB
fn estimate_image_memory_usage(file_path: &Path) -> Result<f64> {
    let metadata = fs::metadata(file_path)?;
    let file_size_mib = metadata.len() as f64 / (1024.0 * 1024.0);

    // Decoded RGBA plus the quantizer's working copy dominates for PNG.
    let multiplier = match file_path.extension().and_then(|s| s.to_str()) {
        Some(ext) => match ext.to_lowercase().as_str() {
            "png" => 8.0,
            "svg" => 4.0,
            _ => 2.0,
        },
        None => 2.0,
    };

    Ok(file_size_mib * multiplier)
}

/// Available memory in MiB, or `None` when the host does not report it.
fn available_memory_mib() -> Option<u64> {
    let mut sys = System::new_with_specifics(
        RefreshKind::new().with_memory(MemoryRefreshKind::new()),
    );
    sys.refresh_memory();
    match sys.available_memory() / (1024 * 1024) {
        0 => None,
        mib => Some(mib),
    }
}

/// Validates batch memory requirements before processing.
///
/// # Returns
/// * `Ok((total_memory_mib, large_image_count))`
/// * `Err(CompressionError)` - If file count or memory limits would be exceeded
fn validate_batch_memory_limits(image_files: &[PathBuf]) -> Result<(f64, usize)> {
    if image_files.len() > MAX_BATCH_FILES {
        return Err(CompressionError::BatchFileLimitExceeded(
            image_files.len(),
            MAX_BATCH_FILES,
        ));
    }

    let mut total_memory_mib = 0.0;
    let mut large_image_count = 0;

    for file_path in image_files {
        let memory_estimate = estimate_image_memory_usage(file_path)?;
        total_memory_mib += memory_estimate;

        if memory_estimate > LARGE_IMAGE_THRESHOLD_MIB {
            large_image_count += 1;
        }
    }

    let total_memory_mib_u64 = total_memory_mib.ceil() as u64;
    if total_memory_mib_u64 > MAX_BATCH_MEMORY_MIB {
        return Err(CompressionError::BatchMemoryLimitExceeded(
            total_memory_mib_u64,
            MAX_BATCH_MEMORY_MIB,
        ));
    }

    if let Some(available_mem_mib) = available_memory_mib() {
        if total_memory_mib_u64 + MIN_AVAILABLE_MEMORY_MIB > available_mem_mib {
            return Err(CompressionError::InsufficientMemory(
                total_memory_mib_u64,
                available_mem_mib,
            ));
        }
    }

    Ok((total_memory_mib, large_image_count))
}

/// Output paths are flat, so sources sharing a file name share a
/// destination. The last one in input order is written; the ones returned
/// here still run through the chain but are never written.
fn shadowed_sources(input_files: &[PathBuf]) -> HashSet<&Path> {
    let mut last_by_name: HashMap<&OsStr, &Path> = HashMap::new();
    let mut shadowed = HashSet::new();

    for path in input_files {
        let Some(name) = path.file_name() else {
            continue;
        };
        if let Some(previous) = last_by_name.insert(name, path.as_path()) {
            crate::warn!(
                "{} is overwritten by {} in the output directory",
                previous.display(),
                path.display()
            );
            shadowed.insert(previous);
        }
    }

    shadowed
}

/// Worker count: the thread option (or core count), capped by file count,
/// by the large-image limit and by what fits in available memory.
fn choose_parallelism(
    total_files: usize,
    large_image_count: usize,
    estimated_memory_mib: f64,
    threads: Option<usize>,
) -> usize {
    let baseline = threads
        .unwrap_or_else(rayon::current_num_threads)
        .min(total_files)
        .max(1);

    let large_cap = if large_image_count >= MAX_CONCURRENT_LARGE_IMAGES {
        MAX_CONCURRENT_LARGE_IMAGES
    } else {
        baseline
    };

    let mem_cap = match available_memory_mib() {
        Some(available_mem_mib) => {
            let avg_per_file_mib =
                ((estimated_memory_mib / total_files.max(1) as f64).ceil() as u64).max(1);
            (available_mem_mib.saturating_sub(MIN_AVAILABLE_MEMORY_MIB) / avg_per_file_mib)
                .clamp(1, baseline as u64) as usize
        }
        None => baseline,
    };

    large_cap.min(mem_cap).max(1)
}

/// Resolves the input patterns, runs every file through the default
/// plugin chain and writes the results into `options.output_dir`.
///
/// Returns one entry per written file, in input order. The first failure
/// aborts the batch. An empty match set is not a failure: nothing is
/// written and the output directory is not created.
pub fn minify(options: &MinifyOptions) -> Result<Vec<ProcessedFile>> {
    let start_time = Instant::now();

    let input_files = collect_input_files(&options.patterns)?;
    let total_files = input_files.len();

    if total_files == 0 {
        crate::verbose!("No files matched {:?}", options.patterns);
        return Ok(Vec::new());
    }

    crate::verbose!("Found {} files matching {:?}", total_files, options.patterns);
    let shadowed = shadowed_sources(&input_files);

    let (estimated_memory_mib, large_image_count) = validate_batch_memory_limits(&input_files)?;
    crate::verbose!(
        "Estimated memory usage: {:.1} MiB, large files (>{} MiB): {}",
        estimated_memory_mib,
        LARGE_IMAGE_THRESHOLD_MIB,
        large_image_count
    );

    let parallelism = choose_parallelism(
        total_files,
        large_image_count,
        estimated_memory_mib,
        options.threads,
    );
    crate::verbose!("Using {} worker threads", parallelism);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()
        .map_err(|e| CompressionError::ThreadPool(e.to_string()))?;

    fs::create_dir_all(&options.output_dir)
        .map_err(|_| CompressionError::DirectoryCreationFailed(options.output_dir.clone()))?;

    let chain = PluginChain::with_defaults(options.quality);
    crate::verbose!(
        "Plugins: {} (PNG quality {})",
        chain.plugin_names().join(", "),
        options.quality
    );

    let progress = logger::progress_bar(total_files as u64);

    let results: Result<Vec<ProcessedFile>> = pool.install(|| {
        input_files
            .par_iter()
            .map(|input_path| {
                let result = if shadowed.contains(input_path.as_path()) {
                    optimize_file(input_path, &options.output_dir, &chain)
                        .map(|(processed, _)| processed)
                } else {
                    process_file(input_path, &options.output_dir, &chain)
                };
                progress.inc(1);
                if let Err(e) = &result {
                    crate::error!("Failed to process {}: {}", input_path.display(), e);
                }
                result
            })
            .collect()
    });

    let processed = match results {
        Ok(processed) => {
            progress.finish_and_clear();
            processed
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    for file in &processed {
        print_file_result(file);
    }
    print_batch_summary(&processed, start_time.elapsed());

    Ok(processed)
}

/// Runs [`minify`] on tokio's blocking pool and awaits it.
pub async fn minify_async(options: MinifyOptions) -> Result<Vec<ProcessedFile>> {
    tokio::task::spawn_blocking(move || minify(&options))
        .await
        .map_err(|e| CompressionError::TaskFailed(e.to_string()))?
}
