use crate::core::config::{CleanupConfig, ProcessorSettings};
use crate::core::interfaces::Processor;
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::{sort_deepest_first, FileFilter};
use crate::utils::{process_bounded, Logger, Result, Timer};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

const LISTED_FILES: usize = 10;
const LISTED_DIRS: usize = 5;

/// Deletes unwanted files and prunes the directories they leave empty
pub struct CleanupProcessor {
    config: CleanupConfig,
    settings: ProcessorSettings,
    filter: Arc<FileFilter>,
}

enum DeleteOutcome {
    Deleted(PathBuf),
    AlreadyGone,
    Failed(String),
}

impl CleanupProcessor {
    pub fn new(config: CleanupConfig, settings: ProcessorSettings, filter: Arc<FileFilter>) -> Self {
        Self {
            config,
            settings,
            filter,
        }
    }

    /// Files to delete and candidate folders (deepest first) across all patterns
    async fn discover(&self, root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut files = BTreeSet::new();
        let mut folders = BTreeSet::new();

        for pattern in &self.config.patterns {
            let matches = self.filter.find_files_and_folders_by_pattern(root, pattern).await?;
            Logger::debug(&format!(
                "Pattern {} matched {} files, {} folders",
                pattern,
                matches.files.len(),
                matches.folders.len()
            ));
            files.extend(matches.files);
            folders.extend(matches.folders);
        }

        Ok((
            files.into_iter().collect(),
            sort_deepest_first(folders.into_iter().collect()),
        ))
    }

    async fn delete_files(&self, files: Vec<PathBuf>, stats: &mut ProcessingStats) {
        let outcomes = process_bounded(files, self.config.concurrency, |path| async move {
            match fs::remove_file(&path).await {
                Ok(()) => DeleteOutcome::Deleted(path),
                Err(e) if e.kind() == ErrorKind::NotFound => DeleteOutcome::AlreadyGone,
                Err(e) => DeleteOutcome::Failed(format!("{}: {}", path.display(), e)),
            }
        })
        .await;

        for outcome in outcomes {
            match outcome {
                DeleteOutcome::Deleted(path) => {
                    if self.settings.verbose {
                        Logger::info(&format!("  🗑️ {}", path.display()));
                    }
                    stats.record_deleted_file(path);
                }
                DeleteOutcome::AlreadyGone => {}
                DeleteOutcome::Failed(message) => {
                    Logger::warn(&format!("Delete failed: {}", message));
                    stats.record_error(message);
                }
            }
        }
    }

    /// Remove folders that are empty now, children before parents
    async fn prune_folders(&self, root: &Path, folders: Vec<PathBuf>, stats: &mut ProcessingStats) {
        for folder in folders {
            if folder == root || folder.parent().is_none() || !folder.starts_with(root) {
                continue;
            }

            match remove_if_empty(&folder).await {
                Ok(true) => {
                    if self.settings.verbose {
                        Logger::info(&format!("  📁 {}", folder.display()));
                    }
                    stats.record_deleted_dir(folder);
                }
                Ok(false) => {}
                Err(e) if is_benign_dir_error(&e) => {}
                Err(e) => {
                    let message = format!("{}: {}", folder.display(), e);
                    Logger::warn(&format!("Folder removal failed: {}", message));
                    stats.record_error(message);
                }
            }
        }
    }

    fn log_summary(&self, stats: &ProcessingStats) {
        let files = stats.deleted_files();
        let dirs = stats.deleted_dirs();

        if files.is_empty() && dirs.is_empty() {
            Logger::info("ℹ️  Nothing to clean up");
        } else {
            Logger::info(&format!(
                "✨ Cleanup completed! Deleted {} files, {} folders",
                files.len(),
                dirs.len()
            ));
        }

        if !self.settings.verbose {
            log_sample("Deleted files", files, LISTED_FILES);
            log_sample("Deleted folders", dirs, LISTED_DIRS);
        }

        if !stats.errors.is_empty() {
            Logger::warn(&format!("Encountered {} errors", stats.errors.len()));
        }
    }
}

#[async_trait]
impl Processor for CleanupProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Cleanup
    }

    async fn process(&self, target_dir: &Path) -> Result<ProcessingStats> {
        if !self.config.enabled {
            Logger::processor_skipped(self.id().display_name());
            return Ok(ProcessingStats::cleanup());
        }

        let _timer = Timer::start(self.id().display_name());
        Logger::info(&format!("🧹 Cleaning up {}...", target_dir.display()));

        let (files, folders) = self.discover(target_dir).await?;
        Logger::found_files(files.len(), "files to delete");

        let mut stats = ProcessingStats::cleanup();
        self.delete_files(files, &mut stats).await;

        if self.config.remove_empty_dirs {
            self.prune_folders(target_dir, folders, &mut stats).await;
        }

        self.log_summary(&stats);
        Ok(stats)
    }
}

async fn remove_if_empty(folder: &Path) -> std::io::Result<bool> {
    let mut entries = fs::read_dir(folder).await?;
    if entries.next_entry().await?.is_some() {
        return Ok(false);
    }
    fs::remove_dir(folder).await?;
    Ok(true)
}

fn is_benign_dir_error(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::DirectoryNotEmpty
    )
}

fn log_sample(title: &str, paths: &[PathBuf], limit: usize) {
    if paths.is_empty() {
        return;
    }
    Logger::info(&format!("{}:", title));
    for path in paths.iter().take(limit) {
        Logger::info(&format!("  - {}", path.display()));
    }
    if paths.len() > limit {
        Logger::info(&format!("  ... and {} more", paths.len() - limit));
    }
}
