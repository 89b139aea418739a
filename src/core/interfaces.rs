use crate::core::models::{ProcessingStats, ProcessorId};
use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;

/// A single pipeline stage operating on a build output directory
#[async_trait]
pub trait Processor: Send + Sync {
    fn id(&self) -> ProcessorId;

    /// Run the stage over `target_dir`.
    ///
    /// Per-file failures are collected into the returned stats; an `Err` means
    /// the stage could not run at all.
    async fn process(&self, target_dir: &Path) -> Result<ProcessingStats>;
}

/// Source-to-source size reduction for one file type
pub trait Minifier: Send + Sync {
    fn name(&self) -> &str;

    /// Minify `source`. `path` is used to pick the dialect and for error messages.
    fn minify(&self, source: &str, path: &Path) -> Result<String>;
}
