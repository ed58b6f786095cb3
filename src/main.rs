//! droidpipe - staged Android build orchestrator
//!
//! Command-line entry point: resolves the toolchain, then either
//! initialises a project or runs the configured build pipeline.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use droidpipe::commands::{BuildCommand, InitCommand};
use droidpipe::core::{PipelineError, SystemRunner, DEFAULT_CONFIG_FILE};
use droidpipe::toolchain::ToolchainEnv;

#[derive(Parser)]
#[command(name = "droidpipe")]
#[command(version, about = "Compile, package, sign and install an Android app from a build configuration", long_about = None)]
struct Cli {
    /// The directory of the Android SDK (defaults to ANDROID_HOME)
    #[arg(long, short = 'a')]
    android: Option<PathBuf>,

    /// The directory of the Java SDK (defaults to JAVA_HOME)
    #[arg(long, short = 'j')]
    java: Option<PathBuf>,

    /// The project directory (defaults to the current directory)
    #[arg(long, short = 'd')]
    directory: Option<PathBuf>,

    /// The file name of the build configuration
    #[arg(long, short = 'b', default_value = DEFAULT_CONFIG_FILE)]
    build: String,

    /// The target to compile against, overriding the configuration
    #[arg(long, short = 't')]
    target: Option<String>,

    /// Initialise the project folder structure and exit
    #[arg(long, short = 'i')]
    init: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(pipeline_error) => error!("{}", pipeline_error.user_message()),
                None => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project_dir = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let toolchain = ToolchainEnv::resolve(cli.android, cli.java);

    info!("Starting Android App Build with variables:");
    toolchain.log_summary();
    info!("Build Directory: {}", project_dir.display());
    info!("Build File: {}", cli.build);

    if cli.init {
        let report = InitCommand {
            project_dir,
            build_file: cli.build,
        }
        .execute()?;
        info!(
            "Created {} director(ies) and {} file(s)",
            report.created_dirs.len(),
            report.written_files.len()
        );
        return Ok(());
    }

    let command = BuildCommand {
        project_dir,
        build_file: cli.build,
        toolchain,
        target: cli.target,
    };
    command.execute(SystemRunner).await?;

    Ok(())
}
