use crate::core::config::{PipelineConfig, RunTarget};
use crate::core::models::ProcessorId;
use crate::core::services::ProcessorManager;
use crate::utils::{CliOverrides, ConfigLoader, Logger, Result, Verbosity};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "postbuild", version)]
#[command(about = "Minify, pre-compress and clean up static site build output")]
pub struct Cli {
    /// Pipeline to run
    #[arg(short = 'T', long, value_enum)]
    pub target: Option<RunTarget>,

    /// Build output directory, relative to the base path
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Config file (default: postbuild.config.json in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single processor instead of the whole pipeline
    #[arg(long, value_enum)]
    pub only: Option<ProcessorId>,

    /// Print the enabled processors and exit
    #[arg(long)]
    pub list: bool,

    /// Log every processed file
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write the report as JSON
    #[arg(long, value_name = "PATH")]
    pub json_report: Option<PathBuf>,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            target: self.target,
            dist_path: self.dir.clone(),
            verbose: self.verbose.then_some(true),
        }
    }
}

#[derive(Default)]
pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        let cli = Cli::parse();
        Logger::init(cli.verbosity());

        let cwd = std::env::current_dir()?;
        let build_target = std::env::var("BUILD_TARGET").ok();
        let config = ConfigLoader::resolve(&cwd, cli.config.as_deref(), &cli.overrides(), build_target.as_deref())?;

        self.execute(&cli, &cwd, &config).await
    }

    async fn execute(&self, cli: &Cli, cwd: &Path, config: &PipelineConfig) -> Result<()> {
        let root = cwd.join(&config.global.base_path);
        let dist = config.global.dist_path.clone();
        let mut manager = ProcessorManager::new(config)?;

        if cli.list {
            self.print_processors(&manager);
            return Ok(());
        }

        Logger::pipeline_start(config.target.as_str(), &root, &root.join(&dist));

        match cli.only {
            Some(id) => {
                Logger::processor_start(id.name());
                manager.run_processor(id, &root, &dist).await?;
            }
            None => {
                let results = manager.run_all(&root, &dist).await;
                let failed = results.iter().filter(|(_, s)| !s.errors.is_empty()).count();
                if failed > 0 {
                    Logger::warn(&format!("{} processors reported errors", failed));
                }
            }
        }

        manager.report().generate_report();

        if let Some(path) = &cli.json_report {
            let path = cwd.join(path);
            manager.report().write_json(&path).await?;
            Logger::info(&format!("📝 JSON report written to {}", path.display()));
        }

        if config.target == RunTarget::Cleanup {
            Logger::info("✅ Cleanup finished");
        }

        Ok(())
    }

    fn print_processors(&self, manager: &ProcessorManager) {
        let enabled = manager.enabled_processors();
        for id in ProcessorId::ALL {
            let marker = if enabled.contains(&id) { "✅" } else { "  " };
            println!("{} {:<12} {}", marker, id.name(), id.display_name());
        }
    }
}
