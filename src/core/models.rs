use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::PostbuildError;

/// Every processor kind the pipeline knows about, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorId {
    #[value(name = "javascript")]
    JavaScript,
    Html,
    Css,
    Cleanup,
    Gzip,
    Brotli,
}

impl ProcessorId {
    pub const ALL: [ProcessorId; 6] = [
        ProcessorId::JavaScript,
        ProcessorId::Html,
        ProcessorId::Css,
        ProcessorId::Cleanup,
        ProcessorId::Gzip,
        ProcessorId::Brotli,
    ];

    /// Config section / report key
    pub fn name(&self) -> &'static str {
        match self {
            ProcessorId::JavaScript => "javascript",
            ProcessorId::Html => "html",
            ProcessorId::Css => "css",
            ProcessorId::Cleanup => "cleanup",
            ProcessorId::Gzip => "gzip",
            ProcessorId::Brotli => "brotli",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProcessorId::JavaScript => "JavaScript compression",
            ProcessorId::Html => "HTML compression",
            ProcessorId::Css => "CSS compression",
            ProcessorId::Cleanup => "File cleanup",
            ProcessorId::Gzip => "Gzip compression",
            ProcessorId::Brotli => "Brotli compression",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ProcessorId::JavaScript => "⚡️",
            ProcessorId::Html => "📄",
            ProcessorId::Css => "🎨",
            ProcessorId::Cleanup => "🧹",
            ProcessorId::Gzip | ProcessorId::Brotli => "🗜️",
        }
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessorId {
    type Err = PostbuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessorId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PostbuildError::config(format!("Unknown processor: {}", s)))
    }
}

/// Supported pre-compression algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    Gzip,
    Brotli,
}

impl CompressionAlgorithm {
    /// Extension appended to the original file name
    pub fn extension(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Gzip => "gz",
            CompressionAlgorithm::Brotli => "br",
        }
    }

    /// Highest quality level the algorithm accepts
    pub fn max_level(&self) -> u32 {
        match self {
            CompressionAlgorithm::Gzip => 9,
            CompressionAlgorithm::Brotli => 11,
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionAlgorithm::Gzip => f.write_str("gzip"),
            CompressionAlgorithm::Brotli => f.write_str("brotli"),
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = PostbuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(CompressionAlgorithm::Gzip),
            "brotli" | "br" => Ok(CompressionAlgorithm::Brotli),
            other => Err(PostbuildError::config(format!(
                "Unsupported compression algorithm: {}",
                other
            ))),
        }
    }
}

/// Per-kind statistics attached to a [`ProcessingStats`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatsDetail {
    /// Stub entry for a processor that failed before producing stats
    None,
    /// Minification and compression: bytes before and after
    #[serde(rename_all = "camelCase")]
    Size {
        original_size: u64,
        compressed_size: u64,
    },
    #[serde(rename_all = "camelCase")]
    Cleanup {
        deleted_files: Vec<PathBuf>,
        deleted_dirs: Vec<PathBuf>,
    },
}

/// Result of one processor run.
///
/// `file_count` counts successfully processed items only; a failed item
/// pushes a message onto `errors` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub file_count: usize,
    pub errors: Vec<String>,
    pub detail: StatsDetail,
}

impl ProcessingStats {
    pub fn sized() -> Self {
        Self {
            file_count: 0,
            errors: Vec::new(),
            detail: StatsDetail::Size {
                original_size: 0,
                compressed_size: 0,
            },
        }
    }

    pub fn cleanup() -> Self {
        Self {
            file_count: 0,
            errors: Vec::new(),
            detail: StatsDetail::Cleanup {
                deleted_files: Vec::new(),
                deleted_dirs: Vec::new(),
            },
        }
    }

    /// Stats recorded for a processor that could not run at all
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            file_count: 0,
            errors: vec![message.into()],
            detail: StatsDetail::None,
        }
    }

    /// Record one successfully transformed file
    pub fn record_size(&mut self, before: u64, after: u64) {
        if let StatsDetail::Size {
            original_size,
            compressed_size,
        } = &mut self.detail
        {
            *original_size += before;
            *compressed_size += after;
        }
        self.file_count += 1;
    }

    pub fn record_deleted_file(&mut self, path: PathBuf) {
        if let StatsDetail::Cleanup { deleted_files, .. } = &mut self.detail {
            deleted_files.push(path);
        }
        self.file_count += 1;
    }

    pub fn record_deleted_dir(&mut self, path: PathBuf) {
        if let StatsDetail::Cleanup { deleted_dirs, .. } = &mut self.detail {
            deleted_dirs.push(path);
        }
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Byte totals when this processor changes sizes
    pub fn sizes(&self) -> Option<(u64, u64)> {
        match self.detail {
            StatsDetail::Size {
                original_size,
                compressed_size,
            } => Some((original_size, compressed_size)),
            _ => None,
        }
    }

    pub fn original_size(&self) -> u64 {
        self.sizes().map_or(0, |(original, _)| original)
    }

    pub fn compressed_size(&self) -> u64 {
        self.sizes().map_or(0, |(_, compressed)| compressed)
    }

    pub fn deleted_dirs(&self) -> &[PathBuf] {
        match &self.detail {
            StatsDetail::Cleanup { deleted_dirs, .. } => deleted_dirs,
            _ => &[],
        }
    }

    pub fn deleted_files(&self) -> &[PathBuf] {
        match &self.detail {
            StatsDetail::Cleanup { deleted_files, .. } => deleted_files,
            _ => &[],
        }
    }
}
