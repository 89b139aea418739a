//! Shared per-file minification loop used by the JavaScript, HTML and CSS
//! processors. Each file is handled independently: a failure is logged and
//! recorded, and the remaining files are still processed.

use crate::core::config::ProcessorSettings;
use crate::core::interfaces::Minifier;
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::FileFilter;
use crate::utils::{Logger, PostbuildError, Result, Timer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Everything one minification run needs
pub struct MinifyPass<'a> {
    pub id: ProcessorId,
    /// Plural noun used in progress output, e.g. "JS files"
    pub file_kind: &'a str,
    pub extensions: &'a [String],
    pub ignore_patterns: &'a [String],
    pub filter: &'a FileFilter,
    pub minifier: &'a Arc<dyn Minifier>,
    pub settings: &'a ProcessorSettings,
}

impl MinifyPass<'_> {
    pub async fn run(&self, target_dir: &Path) -> Result<ProcessingStats> {
        let _timer = Timer::start(self.id.display_name());
        Logger::info(&format!("{} Compressing {}...", self.id.emoji(), self.file_kind));
        Logger::debug(&format!("Using {} minifier", self.minifier.name()));

        let files = self
            .filter
            .find_files(target_dir, self.extensions, self.ignore_patterns)
            .await?;
        Logger::found_files(files.len(), self.file_kind);

        let mut stats = ProcessingStats::sized();
        for file in files {
            let relative = file.strip_prefix(target_dir).unwrap_or(&file).to_path_buf();

            match minify_file(&file, self.minifier.clone()).await {
                Ok((before, after)) => {
                    stats.record_size(before, after);
                    if self.settings.verbose {
                        Logger::file_shrunk(&relative, before, after);
                    }
                }
                Err(e) => {
                    Logger::warn(&format!("Compression failed: {} - {}", relative.display(), e));
                    stats.record_error(format!("{}: {}", file.display(), e));
                }
            }
        }

        Logger::size_summary(
            self.id.display_name(),
            stats.file_count,
            stats.original_size(),
            stats.compressed_size(),
            stats.errors.len(),
        );
        Ok(stats)
    }
}

/// Minify one file in place, returning its size before and after
pub async fn minify_file(path: &Path, minifier: Arc<dyn Minifier>) -> Result<(u64, u64)> {
    let source = fs::read_to_string(path).await?;
    let original_size = source.len() as u64;

    // Minification is CPU bound; keep it off the async workers
    let owned_path: PathBuf = path.to_path_buf();
    let minified =
        tokio::task::spawn_blocking(move || minifier.minify(&source, &owned_path)).await??;

    if minified.is_empty() {
        return Err(PostbuildError::minify_at("No output code", path));
    }

    fs::write(path, &minified).await?;
    Ok((original_size, minified.len() as u64))
}
