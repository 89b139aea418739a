use crate::utils::{Logger, PostbuildError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Compiled glob patterns matched against a relative path or a bare file name.
///
/// `**` spans any number of path segments, `*` stays inside one segment.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: Option<GlobSet>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self { set: None });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| PostbuildError::glob(pattern, e))?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|e| PostbuildError::glob("<set>", e))?;
        Ok(Self { set: Some(set) })
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_none()
    }

    /// True when either the relative path or the file name matches
    pub fn matches(&self, relative: &str, file_name: &str) -> bool {
        match &self.set {
            Some(set) => set.is_match(relative) || set.is_match(file_name),
            None => false,
        }
    }

    /// Match `path`, relativized against `base` when it lives under it
    pub fn matches_path(&self, path: &Path, base: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.matches(&relative_slash_path(path, base), &file_name)
    }
}

/// File name filter built from extensions such as `.js`, `mjs` or `*.min.js`
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    rules: Vec<ExtensionRule>,
}

#[derive(Debug, Clone)]
enum ExtensionRule {
    /// Lowercased suffix including the leading dot
    Suffix(String),
    Wildcard(Regex),
}

impl ExtensionFilter {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        let rules = extensions
            .iter()
            .map(|ext| {
                let ext = ext.as_ref();
                if ext.contains('*') {
                    let pattern = format!("^{}$", regex::escape(ext).replace(r"\*", ".*"));
                    let regex = RegexBuilder::new(&pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| {
                            PostbuildError::config(format!("Invalid extension '{}': {}", ext, e))
                        })?;
                    Ok(ExtensionRule::Wildcard(regex))
                } else if ext.starts_with('.') {
                    Ok(ExtensionRule::Suffix(ext.to_lowercase()))
                } else {
                    Ok(ExtensionRule::Suffix(format!(".{}", ext.to_lowercase())))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// An empty filter accepts every file
    pub fn matches(&self, file_name: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let lower = file_name.to_lowercase();
        self.rules.iter().any(|rule| match rule {
            ExtensionRule::Suffix(suffix) => lower.ends_with(suffix.as_str()),
            ExtensionRule::Wildcard(regex) => regex.is_match(file_name),
        })
    }
}

/// Files matched by a deletion pattern and the directories that may become
/// empty once they are gone, deepest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatternMatches {
    pub files: Vec<PathBuf>,
    pub folders: Vec<PathBuf>,
}

#[derive(Debug)]
struct WalkEntry {
    path: PathBuf,
    is_dir: bool,
}

/// Directory walker shared by every processor.
///
/// Holds the global ignore list; all queries are read-only.
#[derive(Debug, Clone)]
pub struct FileFilter {
    global_patterns: Vec<String>,
}

impl FileFilter {
    pub fn new(global_ignore_patterns: Vec<String>) -> Result<Self> {
        // Compile once up front so a bad global pattern fails at startup
        PatternSet::new(&global_ignore_patterns)?;
        Ok(Self {
            global_patterns: global_ignore_patterns,
        })
    }

    pub fn global_patterns(&self) -> &[String] {
        &self.global_patterns
    }

    /// Global patterns followed by `patterns`, compiled into one set
    pub fn ignore_set(&self, patterns: &[String]) -> Result<PatternSet> {
        let combined: Vec<&str> = self
            .global_patterns
            .iter()
            .chain(patterns.iter())
            .map(String::as_str)
            .collect();
        PatternSet::new(&combined)
    }

    /// Whether `file_path` is excluded by the global list or `patterns`.
    ///
    /// Matches the path relative to `base_path` (forward slashes) and the bare
    /// file name.
    pub fn should_ignore(&self, file_path: &Path, patterns: &[String], base_path: &Path) -> Result<bool> {
        Ok(self.ignore_set(patterns)?.matches_path(file_path, base_path))
    }

    /// Recursively collect files under `dir` whose name matches `extensions`
    /// and which are not ignored. Ignored directories are not descended into.
    /// A missing `dir` yields an empty list.
    pub async fn find_files(
        &self,
        dir: &Path,
        extensions: &[String],
        ignore_patterns: &[String],
    ) -> Result<Vec<PathBuf>> {
        let ignore = self.ignore_set(ignore_patterns)?;
        let extensions = ExtensionFilter::new(extensions)?;

        let entries = walk(dir, |path| ignore.matches_path(path, dir)).await;

        Ok(entries
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter(|entry| {
                entry
                    .path
                    .file_name()
                    .is_some_and(|name| extensions.matches(&name.to_string_lossy()))
            })
            .map(|entry| entry.path)
            .collect())
    }

    /// Files under `base_dir` whose relative path or file name matches `pattern`
    pub async fn find_files_by_pattern(&self, base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = PatternSet::new(&[pattern])?;
        let entries = walk(base_dir, |_| false).await;

        Ok(entries
            .into_iter()
            .filter(|entry| !entry.is_dir && matcher.matches_path(&entry.path, base_dir))
            .map(|entry| entry.path)
            .collect())
    }

    /// Like [`find_files_by_pattern`](Self::find_files_by_pattern), plus every
    /// ancestor directory of a matched file (excluding `base_dir`) and every
    /// directory the pattern matched directly.
    ///
    /// Folders are ordered deepest first so a child is always checked for
    /// emptiness before its parent.
    pub async fn find_files_and_folders_by_pattern(
        &self,
        base_dir: &Path,
        pattern: &str,
    ) -> Result<PatternMatches> {
        let matcher = PatternSet::new(&[pattern])?;
        let entries = walk(base_dir, |_| false).await;

        let mut files = Vec::new();
        let mut folders = BTreeSet::new();

        for entry in entries {
            if !matcher.matches_path(&entry.path, base_dir) {
                continue;
            }

            if entry.is_dir {
                folders.insert(entry.path);
                continue;
            }

            for ancestor in entry.path.ancestors().skip(1) {
                if ancestor == base_dir || !ancestor.starts_with(base_dir) {
                    break;
                }
                folders.insert(ancestor.to_path_buf());
            }
            files.push(entry.path);
        }

        Ok(PatternMatches {
            files,
            folders: sort_deepest_first(folders.into_iter().collect()),
        })
    }
}

/// Order directories by descending path depth; equal depths in reverse path order
pub fn sort_deepest_first(mut folders: Vec<PathBuf>) -> Vec<PathBuf> {
    folders.sort_by(|a, b| {
        let depth_a = a.components().count();
        let depth_b = b.components().count();
        depth_b.cmp(&depth_a).then_with(|| b.cmp(a))
    });
    folders.dedup();
    folders
}

/// Path of `path` relative to `base` with `/` separators
pub fn relative_slash_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `root` collecting files and directories in sorted order.
///
/// Entries for which `skip` returns true are dropped, and skipped directories
/// are not descended into. Unreadable directories are logged and treated as
/// empty. Symlinked directories are not followed.
async fn walk<F>(root: &Path, skip: F) -> Vec<WalkEntry>
where
    F: Fn(&Path) -> bool,
{
    let mut results = Vec::new();

    if fs::metadata(root).await.is_err() {
        return results;
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut children = match read_dir_sorted(&dir).await {
            Ok(children) => children,
            Err(e) => {
                Logger::warn(&format!("Unable to read directory {}: {}", dir.display(), e));
                continue;
            }
        };

        // Reverse so the stack pops subdirectories in name order
        children.reverse();
        for entry in children {
            if skip(&entry.path) {
                continue;
            }
            if entry.is_dir {
                pending.push(entry.path.clone());
            }
            results.push(entry);
        }
    }

    results.sort_by(|a, b| a.path.cmp(&b.path));
    results
}

async fn read_dir_sorted(dir: &Path) -> std::io::Result<Vec<WalkEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let path = entry.path();
        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                Logger::warn(&format!("Unable to stat {}: {}", path.display(), e));
                continue;
            }
        };

        let is_dir = if file_type.is_symlink() {
            // Follow links to files; never descend through linked directories
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => false,
                _ => continue,
            }
        } else {
            file_type.is_dir()
        };

        entries.push(WalkEntry { path, is_dir });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
