//! droidpipe - staged Android build orchestrator
//!
//! Drives the classic Android SDK command-line tools through a fixed
//! pipeline (compile, package, sign, install) described by a TOML build
//! configuration.
//!
//! ## Architecture
//!
//! - `droidpipe-core`: configuration, project layout, errors, process execution, hooks
//! - `droidpipe-android-toolchain`: SDK/JDK layout and listing parsers
//! - `droidpipe-emulator-bridge`: virtual devices and ADB deployment
//! - `droidpipe-build-engine`: stage bodies and the pipeline executor

pub mod commands;
pub mod project;

// Re-export main components for library usage
pub use droidpipe_core as core;
pub use droidpipe_android_toolchain as toolchain;
pub use droidpipe_emulator_bridge as emulator;
pub use droidpipe_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidpipe_android_toolchain::ToolchainEnv;
    pub use droidpipe_build_engine::{Pipeline, PipelineContext};
    pub use droidpipe_core::{BuildConfiguration, PipelineError, SystemRunner};
}
