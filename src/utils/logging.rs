use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use super::format::{format_bytes, savings_percent};

/// Log level requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber. `RUST_LOG` takes precedence over `verbosity`.
    pub fn init(verbosity: Verbosity) {
        let default_filter = match verbosity {
            Verbosity::Quiet => "postbuild=warn",
            Verbosity::Normal => "postbuild=info",
            Verbosity::Verbose => "postbuild=debug",
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // try_init: tests and embedding callers may have installed one already
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn pipeline_start(target: &str, cwd: &Path, dist: &Path) {
        info!("🚀 Start running pipeline: {}", target);
        info!("📁 Current workdir: {}", cwd.display());
        info!("📂 Default dist path: {}", dist.display());
    }

    pub fn enabled_processors(names: &[&str]) {
        if names.is_empty() {
            info!("📋 Enabled processors: (none)");
        } else {
            info!("📋 Enabled processors: {}", names.join(", "));
        }
    }

    pub fn processor_start(name: &str) {
        info!("");
        info!("🔄 Executing {} processor...", name);
    }

    pub fn processor_failed(name: &str, message: &str) {
        error!("❌ {} processor execution failed: {}", name, message);
    }

    pub fn processor_skipped(label: &str) {
        info!("ℹ️  {} skipped (disabled)", label);
    }

    pub fn found_files(count: usize, what: &str) {
        info!("📄 Found {} {}", count, what);
    }

    /// Per-file size change, logged by processors in verbose mode
    pub fn file_shrunk(relative: &Path, before: u64, after: u64) {
        info!(
            "  ✅ {} - {} → {} (-{:.1}%)",
            relative.display(),
            format_bytes(before),
            format_bytes(after),
            savings_percent(before, after)
        );
    }

    pub fn size_summary(label: &str, file_count: usize, before: u64, after: u64, errors: usize) {
        if file_count == 0 {
            info!("ℹ️  No files found that need {}", label);
            return;
        }

        info!("✨ {} completed! Processed {} files", label, file_count);
        info!(
            "📊 Stats: {} → {} (saved {}, {:.1}%)",
            format_bytes(before),
            format_bytes(after),
            format_bytes(before.saturating_sub(after)),
            savings_percent(before, after)
        );
        if errors > 0 {
            warn!("⚠️ Encountered {} errors", errors);
        }
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }


    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
