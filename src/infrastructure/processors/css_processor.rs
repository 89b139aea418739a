use super::common::MinifyPass;
use super::minifier::LightningCssMinifier;
use crate::core::config::{CssConfig, ProcessorSettings};
use crate::core::interfaces::{Minifier, Processor};
use crate::core::models::{ProcessingStats, ProcessorId};
use crate::infrastructure::file_filter::FileFilter;
use crate::utils::{Logger, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Stylesheet minification via Lightning CSS. Off unless enabled in config.
pub struct CssProcessor {
    config: CssConfig,
    settings: ProcessorSettings,
    filter: Arc<FileFilter>,
    minifier: Arc<dyn Minifier>,
}

impl CssProcessor {
    pub fn new(config: CssConfig, settings: ProcessorSettings, filter: Arc<FileFilter>) -> Self {
        let minifier = Arc::new(LightningCssMinifier::new(config.minify));
        Self {
            config,
            settings,
            filter,
            minifier,
        }
    }
}

#[async_trait]
impl Processor for CssProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Css
    }

    async fn process(&self, target_dir: &Path) -> Result<ProcessingStats> {
        if !self.config.enabled {
            Logger::processor_skipped(self.id().display_name());
            return Ok(ProcessingStats::sized());
        }

        MinifyPass {
            id: self.id(),
            file_kind: "CSS files",
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
