use super::common::MinifyPass;
use super::minifier::OxcMinifier;
use crate::core::config::{JavaScriptConfig, ProcessorSettings};
use crate::core::interfaces::{Minifier, Processor};
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::FileFilter;
use crate::utils::{Logger, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Minifies JavaScript files in place
pub struct JavaScriptProcessor {
    config: JavaScriptConfig,
    settings: ProcessorSettings,
    filter: Arc<FileFilter>,
    minifier: Arc<dyn Minifier>,
}

impl JavaScriptProcessor {
    pub fn new(config: JavaScriptConfig, settings: ProcessorSettings, filter: Arc<FileFilter>) -> Self {
        let minifier = Arc::new(OxcMinifier::new(config.minify.clone()));
        Self {
            config,
            settings,
            filter,
            minifier,
        }
    }

    /// Swap the minifier backend
    pub fn with_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.minifier = minifier;
        self
    }
}

#[async_trait]
impl Processor for JavaScriptProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::JavaScript
    }

    async fn process(&self, target_dir: &Path) -> Result<ProcessingStats> {
        if !self.config.enabled {
            Logger::processor_skipped(self.id().display_name());
            return Ok(ProcessingStats::sized());
        }

        MinifyPass {
            id: self.id(),
            file_kind: "JS files",
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
