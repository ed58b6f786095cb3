//! Toolchain Environment
//!
//! Resolves the SDK and JDK roots from explicit values or the usual
//! environment variables.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info};
use which::which;

use droidpipe_core::{PipelineError, Result};

use crate::jdk::JavaHome;
use crate::sdk::AndroidSdk;

/// SDK roots the pipeline runs against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    /// ANDROID_HOME / ANDROID_SDK_ROOT
    pub android_home: Option<PathBuf>,
    /// JAVA_HOME
    pub java_home: Option<PathBuf>,
}

impl ToolchainEnv {
    /// Explicit values win; missing ones are filled from the environment
    pub fn resolve(android_home: Option<PathBuf>, java_home: Option<PathBuf>) -> Self {
        Self::resolve_with(android_home, java_home, |key| env::var_os(key))
    }

    /// Like [`ToolchainEnv::resolve`], reading variables through `var`.
    ///
    /// Order: explicit, `ANDROID_HOME`, `ANDROID_SDK_ROOT` for the SDK;
    /// explicit, `JAVA_HOME`, `javac` on `PATH` for the JDK. Empty
    /// variables count as unset.
    pub fn resolve_with<F>(
        android_home: Option<PathBuf>,
        java_home: Option<PathBuf>,
        var: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let lookup = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let android_home = android_home
            .or_else(|| lookup("ANDROID_HOME"))
            .or_else(|| lookup("ANDROID_SDK_ROOT"));

        let java_home = java_home
            .or_else(|| lookup("JAVA_HOME"))
            .or_else(java_home_from_path);

        Self { android_home, java_home }
    }

    pub fn sdk(&self) -> Result<AndroidSdk> {
        self.android_home
            .clone()
            .map(AndroidSdk::new)
            .ok_or_else(|| {
                PipelineError::ToolchainNotFound(
                    "Failed to define the Android SDK path (-a or ANDROID_HOME)".into(),
                )
            })
    }

    /// The JDK root. A root without `bin/javac` (a bare JRE) is rejected.
    pub fn jdk(&self) -> Result<JavaHome> {
        let java = self.java_home.clone().map(JavaHome::new).ok_or_else(|| {
            PipelineError::ToolchainNotFound(
                "Failed to define the Java SDK path (-j or JAVA_HOME)".into(),
            )
        })?;

        if !java.has_compiler() {
            return Err(PipelineError::ToolchainNotFound(format!(
                "No Java compiler at {}",
                java.javac().display()
            )));
        }

        Ok(java)
    }

    /// Log the resolved roots
    pub fn log_summary(&self) {
        info!("Java SDK: {}", describe_root(&self.java_home));
        info!("Android SDK: {}", describe_root(&self.android_home));
    }
}

fn describe_root(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string())
}

/// `<jdk>/bin/javac` on PATH implies `<jdk>`
fn java_home_from_path() -> Option<PathBuf> {
    let javac = which("javac").ok()?;
    let javac = javac.canonicalize().unwrap_or(javac);
    let home = javac.parent()?.parent()?.to_path_buf();
    debug!("Derived JAVA_HOME {:?} from javac on PATH", home);
    Some(home)
}
