//! CLI commands for droidpipe
//!
//! Wires the command-line options to project initialisation and to the
//! build pipeline.

use std::path::PathBuf;
use anyhow::Result;
use tracing::{info, warn};

use droidpipe_android_toolchain::ToolchainEnv;
use droidpipe_build_engine::{Pipeline, PipelineContext};
use droidpipe_core::{BuildConfiguration, ProjectLayout, ToolRunner};

use crate::project::{InitReport, ProjectInitializer};

/// Build command options
pub struct BuildCommand {
    pub project_dir: PathBuf,
    /// Configuration file name, relative to `project_dir`
    pub build_file: String,
    pub toolchain: ToolchainEnv,
    /// Replaces `compile.target` when set
    pub target: Option<String>,
}

impl BuildCommand {
    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(&self.build_file)
    }

    /// Load the configuration and apply the command-line target override
    pub fn load_config(&self) -> Result<BuildConfiguration> {
        let mut config = BuildConfiguration::load(&self.config_path())?;

        if let Some(ref target) = self.target {
            match config.compile.as_mut() {
                Some(compile) => {
                    info!("Overriding compile target with {}", target);
                    compile.target = target.clone();
                }
                None => warn!("Ignoring target {}: no compile section configured", target),
            }
        }

        Ok(config)
    }

    /// Execute the build command
    pub async fn execute<R: ToolRunner>(&self, runner: R) -> Result<PipelineContext> {
        let config = self.load_config()?;

        let layout = ProjectLayout::new(&self.project_dir);
        layout.verify()?;

        let sdk = self.toolchain.sdk()?;
        let java = self.toolchain.jdk()?;
        let mut ctx = PipelineContext::new(layout, sdk, java);

        info!("Building project: {:?}", self.project_dir);
        let pipeline = Pipeline::new(runner);
        pipeline.run(&mut ctx, &config).await?;

        match ctx.final_apk {
            Some(ref apk) => info!("Build successful: {:?}", apk),
            None => {
                if let Some(ref unsigned) = ctx.unsigned_apk {
                    info!("Build successful: {:?}", unsigned);
                }
            }
        }

        Ok(ctx)
    }
}

/// Init command options
pub struct InitCommand {
    pub project_dir: PathBuf,
    pub build_file: String,
}

impl InitCommand {
    pub fn execute(&self) -> Result<InitReport> {
        ProjectInitializer::new()
            .with_config_file(self.build_file.as_str())
            .init(&self.project_dir)
    }
}
