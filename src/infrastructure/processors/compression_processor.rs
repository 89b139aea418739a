use crate::core::config::{CompressionConfig, ProcessorSettings};
use crate::core::interfaces::Processor;
use crate::core::models::{CompressionAlgorithm, ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::FileFilter;
use crate::utils::{Logger, PostbuildError, Result, Timer};
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_WINDOW_BITS: u32 = 22;

/// Writes pre-compressed siblings (`app.js.gz`, `app.js.br`) next to
/// compressible files so a static server can serve them directly.
pub struct CompressionProcessor {
    config: CompressionConfig,
    settings: ProcessorSettings,
    filter: Arc<FileFilter>,
    algorithm: CompressionAlgorithm,
    level: u32,
}

impl CompressionProcessor {
    /// Fails with a configuration error when the algorithm is unknown
    pub fn new(config: CompressionConfig, settings: ProcessorSettings, filter: Arc<FileFilter>) -> Result<Self> {
        let algorithm: CompressionAlgorithm = config.algorithm.parse()?;
        let level = config.level.min(algorithm.max_level());
        if level != config.level {
            Logger::warn(&format!(
                "{} level {} out of range, using {}",
                algorithm, config.level, level
            ));
        }

        Ok(Self {
            config,
            settings,
            filter,
            algorithm,
            level,
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    async fn compress_file(&self, path: &Path) -> Result<(u64, u64)> {
        let data = fs::read(path).await?;
        let original_size = data.len() as u64;

        let (algorithm, level) = (self.algorithm, self.level);
        let compressed =
            tokio::task::spawn_blocking(move || compress_bytes(algorithm, level, &data)).await??;

        fs::write(sibling_path(path, algorithm), &compressed).await?;
        Ok((original_size, compressed.len() as u64))
    }
}

#[async_trait]
impl Processor for CompressionProcessor {
    fn id(&self) -> ProcessorId {
        match self.algorithm {
            CompressionAlgorithm::Gzip => ProcessorId::Gzip,
            CompressionAlgorithm::Brotli => ProcessorId::Brotli,
        }
    }

    async fn process(&self, target_dir: &Path) -> Result<ProcessingStats> {
        let label = self.id().display_name();
        if !self.config.enabled {
            Logger::processor_skipped(label);
            return Ok(ProcessingStats::sized());
        }

        let _timer = Timer::start(label);
        Logger::info(&format!(
            "🗜️ Starting {} compression (level {})...",
            self.algorithm, self.level
        ));

        let candidates = self
            .filter
            .find_files(target_dir, &self.config.extensions, &self.config.ignore_patterns)
            .await?;

        let mut files = Vec::with_capacity(candidates.len());
        for file in candidates {
            match fs::metadata(&file).await {
                Ok(meta) if meta.len() >= self.config.min_size => files.push(file),
                Ok(_) => {}
                Err(e) => Logger::warn(&format!("Cannot stat {}: {}", file.display(), e)),
            }
        }
        Logger::found_files(files.len(), "files to compress");

        let mut stats = ProcessingStats::sized();
        for file in files {
            let relative = file.strip_prefix(target_dir).unwrap_or(&file).to_path_buf();
            match self.compress_file(&file).await {
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
            label,
            stats.file_count,
            stats.original_size(),
            stats.compressed_size(),
            stats.errors.len(),
        );
        Ok(stats)
    }
}

/// `dist/app.js` -> `dist/app.js.gz`
pub fn sibling_path(path: &Path, algorithm: CompressionAlgorithm) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(algorithm.extension());
    PathBuf::from(name)
}

pub fn compress_bytes(algorithm: CompressionAlgorithm, level: u32, data: &[u8]) -> Result<Vec<u8>> {
    let level = level.min(algorithm.max_level());
    match algorithm {
        CompressionAlgorithm::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
            encoder
                .write_all(data)
                .and_then(|_| encoder.finish())
                .map_err(|e| PostbuildError::Compression(format!("gzip: {}", e)))
        }
        CompressionAlgorithm::Brotli => {
            let mut writer = brotli::CompressorWriter::new(
                Vec::new(),
                BROTLI_BUFFER_SIZE,
                level,
                BROTLI_WINDOW_BITS,
            );
            writer
                .write_all(data)
                .and_then(|_| writer.flush())
                .map_err(|e| PostbuildError::Compression(format!("brotli: {}", e)))?;
            Ok(writer.into_inner())
        }
    }
}
