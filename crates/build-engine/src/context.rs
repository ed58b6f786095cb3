//! Pipeline Context
//!
//! Everything a run needs and everything it produces, threaded through
//! the stages by the executor.

use std::path::PathBuf;

use droidpipe_android_toolchain::{AndroidSdk, BuildTools, JavaHome, Target};
use droidpipe_core::{ProjectLayout, Stage};
use droidpipe_emulator_bridge::DeployTarget;

/// Inputs and artifacts of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub project: ProjectLayout,
    pub sdk: AndroidSdk,
    pub java: JavaHome,

    /// Target resolved by the compile stage
    pub target: Option<Target>,
    /// Build-tools directory selected by the compile stage
    pub build_tools: Option<BuildTools>,
    pub classes_dex: Option<PathBuf>,
    pub unsigned_apk: Option<PathBuf>,
    /// Signed and aligned archive
    pub final_apk: Option<PathBuf>,
    pub deployed_to: Option<DeployTarget>,

    /// Stages that ran to completion, in order
    pub completed: Vec<Stage>,
}

impl PipelineContext {
    pub fn new(project: ProjectLayout, sdk: AndroidSdk, java: JavaHome) -> Self {
        Self {
            project,
            sdk,
            java,
            target: None,
            build_tools: None,
            classes_dex: None,
            unsigned_apk: None,
            final_apk: None,
            deployed_to: None,
            completed: Vec::new(),
        }
    }
}

/// Result of the compile stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub target: Target,
    pub build_tools: BuildTools,
    /// Platform interface archive compiled against
    pub platform_jar: PathBuf,
    pub classes_dex: PathBuf,
}
