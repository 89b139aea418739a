use super::common::MinifyPass;
use super::minifier::HtmlMinifier;
use crate::core::config::{HtmlConfig, ProcessorSettings};
use crate::core::interfaces::{Minifier, Processor};
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::FileFilter;
use crate::utils::{Logger, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Minifies HTML documents in place, including inline scripts and styles
pub struct HtmlProcessor {
    config: HtmlConfig,
    settings: ProcessorSettings,
    filter: Arc<FileFilter>,
    minifier: Arc<dyn Minifier>,
}

impl HtmlProcessor {
    pub fn new(config: HtmlConfig, settings: ProcessorSettings, filter: Arc<FileFilter>) -> Self {
        let minifier = Arc::new(HtmlMinifier::new(config.minify.clone()));
        Self {
            config,
            settings,
            filter,
            minifier,
        }
    }

    pub fn with_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.minifier = minifier;
        self
    }
}

#[async_trait]
impl Processor for HtmlProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Html
    }

    async fn process(&self, target_dir: &Path) -> Result<ProcessingStats> {
        if !self.config.enabled {
            Logger::processor_skipped(self.id().display_name());
            return Ok(ProcessingStats::sized());
        }

        MinifyPass {
            id: self.id(),
            file_kind: "HTML files",
            extensions: &self.config.extensions,
            ignore_patterns: &self.config.ignore_patterns,
            filter: &self.filter,
            minifier: &self.minifier,
            settings: &self.settings,
        }
        .run(target_dir)
        .await
    }
}
