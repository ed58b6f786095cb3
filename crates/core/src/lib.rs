//! droidpipe core - shared types for the build pipeline
//!
//! This crate provides the pieces every stage depends on: the build
//! configuration model, the project layout, the error taxonomy, the
//! process-execution capability and the stage hook runner.

pub mod config;
pub mod error;
pub mod hooks;
pub mod process;
pub mod project;
pub mod stage;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::{
    BuildConfiguration, CompileOptions, InstallOptions, KeystoreOptions, PackageOptions, Profile,
    ProfileType, SignOptions, StageHooks, DEFAULT_CONFIG_FILE,
};
pub use error::{PipelineError, Result};
pub use process::{run_checked, SystemRunner, ToolCommand, ToolOutput, ToolRunner};
pub use project::ProjectLayout;
pub use stage::{HookPhase, Stage};

/// droidpipe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
