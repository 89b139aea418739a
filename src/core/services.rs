use crate::core::config::{
    CleanupConfig, CompressionConfig, CssConfig, HtmlConfig, JavaScriptConfig, PipelineConfig, ProcessorSettings,
};
use crate::core::interfaces::Processor;
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::FileFilter;
use crate::infrastructure::processors::{
    CleanupProcessor, CompressionProcessor, CssProcessor, HtmlProcessor, JavaScriptProcessor, ReportProcessor,
};
use crate::utils::{Logger, PostbuildError, Result, Timer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// An enabled pipeline stage and the config it will be built from
#[derive(Debug, Clone)]
enum ProcessorKind {
    JavaScript(JavaScriptConfig),
    Html(HtmlConfig),
    Css(CssConfig),
    Cleanup(CleanupConfig),
    Compression(ProcessorId, CompressionConfig),
}

impl ProcessorKind {
    fn id(&self) -> ProcessorId {
        match self {
            ProcessorKind::JavaScript(_) => ProcessorId::JavaScript,
            ProcessorKind::Html(_) => ProcessorId::Html,
            ProcessorKind::Css(_) => ProcessorId::Css,
            ProcessorKind::Cleanup(_) => ProcessorId::Cleanup,
            ProcessorKind::Compression(id, _) => *id,
        }
    }

    fn path(&self) -> Option<&Path> {
        match self {
            ProcessorKind::JavaScript(c) => c.path.as_deref(),
            ProcessorKind::Html(c) => c.path.as_deref(),
            ProcessorKind::Css(c) => c.path.as_deref(),
            ProcessorKind::Cleanup(c) => c.path.as_deref(),
            ProcessorKind::Compression(_, c) => c.path.as_deref(),
        }
    }

    fn build(&self, settings: &ProcessorSettings, filter: &Arc<FileFilter>) -> Result<Box<dyn Processor>> {
        let settings = settings.clone();
        let filter = Arc::clone(filter);
        let processor: Box<dyn Processor> = match self {
            ProcessorKind::JavaScript(c) => Box::new(JavaScriptProcessor::new(c.clone(), settings, filter)),
            ProcessorKind::Html(c) => Box::new(HtmlProcessor::new(c.clone(), settings, filter)),
            ProcessorKind::Css(c) => Box::new(CssProcessor::new(c.clone(), settings, filter)),
            ProcessorKind::Cleanup(c) => Box::new(CleanupProcessor::new(c.clone(), settings, filter)),
            ProcessorKind::Compression(_, c) => Box::new(CompressionProcessor::new(c.clone(), settings, filter)?),
        };
        Ok(processor)
    }
}

/// Runs the enabled processors in a fixed order and feeds the report.
///
/// A processor that fails to build, errors out or times out is recorded as a
/// stub failure; the remaining processors still run.
pub struct ProcessorManager {
    processors: Vec<ProcessorKind>,
    settings: ProcessorSettings,
    filter: Arc<FileFilter>,
    timeout: Option<Duration>,
    report: ReportProcessor,
}

impl ProcessorManager {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let filter = Arc::new(FileFilter::new(config.global.global_ignore_patterns.clone())?);
        Ok(Self::with_filter(config, filter))
    }

    pub fn with_filter(config: &PipelineConfig, filter: Arc<FileFilter>) -> Self {
        let candidates = [
            (config.javascript.enabled, ProcessorKind::JavaScript(config.javascript.clone())),
            (config.html.enabled, ProcessorKind::Html(config.html.clone())),
            (config.css.enabled, ProcessorKind::Css(config.css.clone())),
            (config.cleanup.enabled, ProcessorKind::Cleanup(config.cleanup.clone())),
            (config.gzip.enabled, ProcessorKind::Compression(ProcessorId::Gzip, config.gzip.clone())),
            (config.brotli.enabled, ProcessorKind::Compression(ProcessorId::Brotli, config.brotli.clone())),
        ];

        let processors = candidates
            .into_iter()
            .filter_map(|(enabled, kind)| enabled.then_some(kind))
            .collect();

        Self {
            processors,
            settings: ProcessorSettings::from(&config.global),
            filter,
            timeout: config.global.processor_timeout_secs.map(Duration::from_secs),
            report: ReportProcessor::new(config.reporting.clone()),
        }
    }

    pub fn enabled_processors(&self) -> Vec<ProcessorId> {
        self.processors.iter().map(ProcessorKind::id).collect()
    }

    pub fn is_enabled(&self, id: ProcessorId) -> bool {
        self.processors.iter().any(|kind| kind.id() == id)
    }

    pub fn report(&self) -> &ReportProcessor {
        &self.report
    }

    /// Run every enabled processor in order.
    ///
    /// Each processor works on `cwd/<section path>` when it has one, otherwise
    /// on `cwd/dist_path`. Returns one entry per processor, stub failures
    /// included; only successful runs reach the report.
    pub async fn run_all(&mut self, cwd: &Path, dist_path: &Path) -> Vec<(ProcessorId, ProcessingStats)> {
        let _timer = Timer::start("pipeline");
        let names: Vec<&str> = self.processors.iter().map(|kind| kind.id().name()).collect();
        Logger::enabled_processors(&names);

        let mut results = Vec::with_capacity(self.processors.len());
        for kind in &self.processors {
            let id = kind.id();
            Logger::processor_start(id.name());

            let target = resolve_target(kind, cwd, dist_path);
            match execute(kind, &self.settings, &self.filter, self.timeout, &target).await {
                Ok(stats) => {
                    self.report.add_stats(id.name(), stats.clone());
                    results.push((id, stats));
                }
                Err(e) => {
                    Logger::processor_failed(id.name(), &e.to_string());
                    results.push((id, ProcessingStats::failed(e.to_string())));
                }
            }
        }

        results
    }

    /// Run a single enabled processor outside the normal sequence
    pub async fn run_processor(&mut self, id: ProcessorId, cwd: &Path, dist_path: &Path) -> Result<ProcessingStats> {
        let kind = self
            .processors
            .iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| PostbuildError::ProcessorNotEnabled(id.name().to_string()))?;

        let target = resolve_target(kind, cwd, dist_path);
        let stats = execute(kind, &self.settings, &self.filter, self.timeout, &target).await?;
        self.report.add_stats(id.name(), stats.clone());
        Ok(stats)
    }
}

fn resolve_target(kind: &ProcessorKind, cwd: &Path, dist_path: &Path) -> PathBuf {
    cwd.join(kind.path().unwrap_or(dist_path))
}

async fn execute(
    kind: &ProcessorKind,
    settings: &ProcessorSettings,
    filter: &Arc<FileFilter>,
    timeout: Option<Duration>,
    target: &Path,
) -> Result<ProcessingStats> {
    let processor = kind.build(settings, filter)?;
    Logger::debug(&format!("Target directory: {}", target.display()));

    match timeout {
        Some(limit) => tokio::time::timeout(limit, processor.process(target))
            .await
            .map_err(|_| PostbuildError::Timeout(limit.as_secs()))?,
        None => processor.process(target).await,
    }
}
