use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Which pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunTarget {
    /// Minify, compress and clean the build output
    #[default]
    Compression,
    /// Remove generated output from the project root
    Cleanup,
}

impl RunTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunTarget::Compression => "compression",
            RunTarget::Cleanup => "cleanup",
        }
    }
}

/// Complete pipeline configuration, built once at startup and passed down
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub target: RunTarget,
    pub global: GlobalConfig,
    pub javascript: JavaScriptConfig,
    pub html: HtmlConfig,
    pub css: CssConfig,
    pub cleanup: CleanupConfig,
    #[serde(deserialize_with = "gzip_section")]
    pub gzip: CompressionConfig,
    #[serde(deserialize_with = "brotli_section")]
    pub brotli: CompressionConfig,
    pub reporting: ReportingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target: RunTarget::Compression,
            global: GlobalConfig::default(),
            javascript: JavaScriptConfig::default(),
            html: HtmlConfig::default(),
            css: CssConfig::default(),
            cleanup: CleanupConfig::default(),
            gzip: CompressionConfig::gzip(),
            brotli: CompressionConfig::brotli(),
            reporting: ReportingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Working directory processors resolve their paths against
    pub base_path: PathBuf,
    /// Default target directory, relative to `base_path`
    pub dist_path: PathBuf,
    pub verbose: bool,
    /// Applied on top of every processor's own ignore patterns
    pub global_ignore_patterns: Vec<String>,
    /// Upper bound for a single processor run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_timeout_secs: Option<u64>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            dist_path: PathBuf::from("dist"),
            verbose: false,
            global_ignore_patterns: strings(&[
                "**/node_modules/**",
                "**/.git/**",
                "**/.*",
                "**/Thumbs.db",
                "**/.DS_Store",
            ]),
            processor_timeout_secs: None,
        }
    }
}

/// Global options merged into every processor at construction
#[derive(Debug, Clone, Default)]
pub struct ProcessorSettings {
    pub verbose: bool,
}

impl From<&GlobalConfig> for ProcessorSettings {
    fn from(global: &GlobalConfig) -> Self {
        Self {
            verbose: global.verbose,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JavaScriptConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub minify: JsMinifyOptions,
}

impl Default for JavaScriptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            extensions: strings(&[".js", ".mjs"]),
            ignore_patterns: strings(&[
                "**/_astro/**",
                "**/lib/**/*.js",
                "**/*.min.js",
                "**/vendor/**",
                "**/tracker*.js",
            ]),
            minify: JsMinifyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsMinifyOptions {
    /// Shorten local identifiers
    pub mangle: bool,
    /// Run the compressor (constant folding, dead code removal)
    pub compress: bool,
    pub drop_console: bool,
    pub drop_debugger: bool,
}

impl Default for JsMinifyOptions {
    fn default() -> Self {
        Self {
            mangle: true,
            compress: true,
            drop_console: true,
            drop_debugger: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub minify: HtmlMinifyOptions,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            extensions: strings(&[".html"]),
            ignore_patterns: strings(&["**/_astro/**", "**/temp/**", "**/*.template.html"]),
            minify: HtmlMinifyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlMinifyOptions {
    pub remove_comments: bool,
    /// Minify inline `<script>` contents
    pub minify_js: bool,
    /// Minify inline `<style>` contents and style attributes
    pub minify_css: bool,
    pub keep_closing_tags: bool,
    pub keep_html_and_head_opening_tags: bool,
    /// Leave the doctype exactly as written
    pub keep_doctype: bool,
}

impl Default for HtmlMinifyOptions {
    fn default() -> Self {
        Self {
            remove_comments: true,
            minify_js: true,
            minify_css: true,
            keep_closing_tags: false,
            keep_html_and_head_opening_tags: false,
            keep_doctype: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CssConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub minify: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            // The site generator already ships optimized stylesheets
            enabled: false,
            path: None,
            extensions: strings(&[".css"]),
            ignore_patterns: strings(&["**/_astro/**", "**/*.min.css"]),
            minify: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanupConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Maximum number of deletes in flight
    pub concurrency: usize,
    pub remove_empty_dirs: bool,
    /// Files matching any of these are deleted
    pub patterns: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            concurrency: 10,
            remove_empty_dirs: true,
            patterns: strings(&[
                "**/*.map",
                "**/.DS_Store",
                "**/Thumbs.db",
                "**/desktop.ini",
                "**/*.tmp",
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// "gzip" or "brotli"; validated when the processor is built
    pub algorithm: String,
    pub level: u32,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    /// Files smaller than this many bytes are left alone
    pub min_size: u64,
}

impl CompressionConfig {
    pub fn gzip() -> Self {
        Self {
            enabled: true,
            path: None,
            algorithm: "gzip".to_string(),
            level: 9,
            extensions: compressible_extensions(),
            ignore_patterns: strings(&[
                "**/_astro/**",
                "**/*.min.js",
                "**/*.min.css",
                "**/*.gz",
                "**/*.br",
                "**/lib/**",
            ]),
            min_size: 1024,
        }
    }

    pub fn brotli() -> Self {
        Self {
            enabled: false,
            path: None,
            algorithm: "brotli".to_string(),
            level: 11,
            extensions: compressible_extensions(),
            ignore_patterns: strings(&[
                "**/_astro/**",
                "**/*.min.js",
                "**/*.min.css",
                "**/*.gz",
                "**/*.br",
            ]),
            min_size: 1024,
        }
    }
}

/// A compression section as written in the config file. Keys left out keep
/// the defaults of the algorithm the section belongs to.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CompressionOverrides {
    enabled: Option<bool>,
    path: Option<PathBuf>,
    algorithm: Option<String>,
    level: Option<u32>,
    extensions: Option<Vec<String>>,
    ignore_patterns: Option<Vec<String>>,
    min_size: Option<u64>,
}

impl CompressionOverrides {
    fn apply(self, mut base: CompressionConfig) -> CompressionConfig {
        if let Some(enabled) = self.enabled {
            base.enabled = enabled;
        }
        if self.path.is_some() {
            base.path = self.path;
        }
        if let Some(algorithm) = self.algorithm {
            base.algorithm = algorithm;
        }
        if let Some(level) = self.level {
            base.level = level;
        }
        if let Some(extensions) = self.extensions {
            base.extensions = extensions;
        }
        if let Some(ignore_patterns) = self.ignore_patterns {
            base.ignore_patterns = ignore_patterns;
        }
        if let Some(min_size) = self.min_size {
            base.min_size = min_size;
        }
        base
    }
}

fn gzip_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CompressionConfig, D::Error> {
    Ok(CompressionOverrides::deserialize(deserializer)?.apply(CompressionConfig::gzip()))
}

fn brotli_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CompressionConfig, D::Error> {
    Ok(CompressionOverrides::deserialize(deserializer)?.apply(CompressionConfig::brotli()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportingConfig {
    pub enabled: bool,
    /// Include sample error messages per processor
    pub show_file_details: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_file_details: true,
        }
    }
}

fn compressible_extensions() -> Vec<String> {
    strings(&[".js", ".css", ".html", ".xml", ".json", ".svg"])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
