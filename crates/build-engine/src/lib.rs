//! Android Build Engine
//!
//! Runs the fixed compile, package, sign and install pipeline against the
//! classic SDK toolchain (aapt, javac, dx, keytool, jarsigner, zipalign,
//! adb).

pub mod compile;
pub mod context;
pub mod install;
pub mod package;
pub mod runner;
pub mod signing;

#[cfg(test)]
mod testing;

pub use compile::compile;
pub use context::{CompileOutput, PipelineContext};
pub use install::install;
pub use package::package;
pub use runner::Pipeline;
pub use signing::{aligned_path, signed_path, sign};
