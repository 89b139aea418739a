use crate::core::config::{PipelineConfig, RunTarget};
use crate::utils::{Logger, PostbuildError, Result};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "postbuild.config.json";

/// Values given on the command line. `None` keeps the file or default value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub target: Option<RunTarget>,
    pub dist_path: Option<PathBuf>,
    pub verbose: Option<bool>,
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `postbuild.config.json` from `root` if it exists
    pub fn load_from_file(root: &Path) -> Result<Option<PipelineConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Self::load_from_path(&config_path).map(Some)
    }

    /// Load an explicitly named config file; a missing file is an error
    pub fn load_from_path(config_path: &Path) -> Result<PipelineConfig> {
        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            PostbuildError::config(format!("Cannot read {}: {}", config_path.display(), e))
        })?;

        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
            PostbuildError::config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;

        Logger::debug("✅ Config file loaded successfully");
        Ok(config)
    }

    /// Merge file config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(file_config: Option<PipelineConfig>, overrides: &CliOverrides) -> PipelineConfig {
        let mut config = file_config.unwrap_or_default();

        if let Some(target) = overrides.target {
            config.target = target;
        }
        if let Some(dist_path) = &overrides.dist_path {
            config.global.dist_path = dist_path.clone();
        }
        if let Some(verbose) = overrides.verbose {
            config.global.verbose = verbose;
        }

        config
    }

    /// Reshape the config for a run target.
    ///
    /// `cleanup` keeps only the cleanup processor, pointed at the working
    /// directory and set up to remove generated output.
    pub fn for_target(mut config: PipelineConfig, target: RunTarget) -> PipelineConfig {
        config.target = target;

        if target == RunTarget::Cleanup {
            config.javascript.enabled = false;
            config.html.enabled = false;
            config.css.enabled = false;
            config.gzip.enabled = false;
            config.brotli.enabled = false;

            config.cleanup.enabled = true;
            config.cleanup.path = Some(PathBuf::from("."));
            config.cleanup.patterns = vec![".astro/**".to_string(), "dist/**".to_string()];
            config.cleanup.concurrency = 20;

            config.reporting.enabled = false;
        }

        config
    }

    /// Apply deployment tweaks keyed on the `BUILD_TARGET` environment variable
    pub fn apply_env_overrides(mut config: PipelineConfig, build_target: Option<&str>) -> PipelineConfig {
        if build_target == Some("cdn") {
            Logger::debug("BUILD_TARGET=cdn: gzip level 6, minSize 2048");
            config.gzip.level = 6;
            config.gzip.min_size = 2048;
        }
        config
    }

    /// Full resolution order: defaults, file, CLI, run target, environment
    pub fn resolve(
        root: &Path,
        explicit_path: Option<&Path>,
        overrides: &CliOverrides,
        build_target: Option<&str>,
    ) -> Result<PipelineConfig> {
        let file_config = match explicit_path {
            Some(path) => Some(Self::load_from_path(&root.join(path))?),
            None => Self::load_from_file(root)?,
        };

        let config = Self::merge_with_cli(file_config, overrides);
        let target = config.target;
        let config = Self::for_target(config, target);
        Ok(Self::apply_env_overrides(config, build_target))
    }
}
