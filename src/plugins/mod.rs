//! Format plugins and the chain that applies them.
//!
//! A plugin owns one format family. It inspects a buffer, and if the
//! buffer is its format, returns an optimized replacement. The chain runs
//! every plugin in order, so each file is touched by at most the plugins
//! that recognise it and untouched otherwise.

pub mod jpegtran;
pub mod pngquant;
pub mod svgo;

use crate::error::Result;
use crate::quality::QualityRange;

pub use jpegtran::{JpegtranPlugin, MarkerPolicy};
pub use pngquant::{PngquantOptions, PngquantPlugin};
pub use svgo::{SvgoOptions, SvgoPlugin};

pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Whether `data` is in the format this plugin handles.
    fn accepts(&self, data: &[u8]) -> bool;

    fn optimize(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Ordered list of plugins applied to every input buffer
pub struct PluginChain {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginChain {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    /// jpegtran, pngquant at `quality`, svgo; in that order.
    pub fn with_defaults(quality: QualityRange) -> Self {
        Self::new(vec![
            Box::new(JpegtranPlugin::default()),
            Box::new(PngquantPlugin::new(PngquantOptions {
                quality,
                ..PngquantOptions::default()
            })),
            Box::new(SvgoPlugin::default()),
        ])
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Runs `data` through every accepting plugin. A plugin result larger
    /// than what it was given is discarded.
    pub fn process(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let mut current = data;

        for plugin in &self.plugins {
            if !plugin.accepts(&current) {
                continue;
            }
            let optimized = plugin.optimize(&current)?;
            crate::verbose!(
                "{}: {} -> {} bytes",
                plugin.name(),
                current.len(),
                optimized.len()
            );
            if optimized.len() <= current.len() {
                current = optimized;
            }
        }

        Ok(current)
    }
}

impl std::fmt::Debug for PluginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
