//! Android SDK Layout
//!
//! Locates the SDK programs the pipeline drives and selects the
//! build-tools version directory matching a platform's API level.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use droidpipe_core::{PipelineError, Result, ToolCommand};

/// An Android SDK installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidSdk {
    root: PathBuf,
}

impl AndroidSdk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join("tools")
    }

    pub fn build_tools_dir(&self) -> PathBuf {
        self.root.join("build-tools")
    }

    /// The `android` SDK manager script
    pub fn android_tool(&self) -> PathBuf {
        if cfg!(windows) {
            self.tools_dir().join("android.bat")
        } else {
            self.tools_dir().join("android")
        }
    }

    /// The device bridge
    pub fn adb(&self) -> PathBuf {
        let platform_tools = self.root.join("platform-tools");
        if cfg!(windows) {
            platform_tools.join("adb.exe")
        } else {
            platform_tools.join("adb")
        }
    }

    /// `<sdk>/platforms/<platform_id>/android.jar`
    pub fn platform_jar(&self, platform_id: &str) -> PathBuf {
        self.root
            .join("platforms")
            .join(platform_id)
            .join("android.jar")
    }

    /// `android list target`
    pub fn list_targets_command(&self) -> ToolCommand {
        ToolCommand::new(self.android_tool())
            .args(["list", "target"])
            .current_dir(self.tools_dir())
    }

    /// Installed build-tools version directory names, sorted
    pub fn build_tools_versions(&self) -> Result<Vec<String>> {
        let dir = self.build_tools_dir();
        if !dir.is_dir() {
            return Err(PipelineError::ToolchainNotFound(format!(
                "build-tools directory {} does not exist",
                dir.display()
            )));
        }

        let mut versions: Vec<String> = std::fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();

        versions.sort();
        Ok(versions)
    }

    /// Build-tools directory for a platform API level
    pub fn resolve_build_tools(&self, api_level: &str) -> Result<BuildTools> {
        let versions = self.build_tools_versions()?;
        let version = select_build_tools(&versions, api_level).ok_or_else(|| {
            PipelineError::BuildToolsNotFound {
                api_level: api_level.to_string(),
                dir: self.build_tools_dir(),
            }
        })?;

        debug!("Using build-tools {} for API level {}", version, api_level);
        Ok(BuildTools {
            version: version.to_string(),
            dir: self.build_tools_dir().join(version),
        })
    }
}

/// Pick the first version whose leading dot-separated component equals
/// `api_level`. Several candidates are reported but not rejected.
pub fn select_build_tools<'a>(versions: &'a [String], api_level: &str) -> Option<&'a str> {
    let candidates: Vec<&str> = versions
        .iter()
        .map(String::as_str)
        .filter(|v| v.split('.').next() == Some(api_level))
        .collect();

    if candidates.len() > 1 {
        warn!(
            "Several build-tools versions match API level {}: {:?}; using {}",
            api_level, candidates, candidates[0]
        );
    }

    candidates.first().copied()
}

/// One build-tools version directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTools {
    pub version: String,
    pub dir: PathBuf,
}

impl BuildTools {
    fn tool(&self, name: &str, windows_ext: &str) -> PathBuf {
        if cfg!(windows) {
            self.dir.join(format!("{}.{}", name, windows_ext))
        } else {
            self.dir.join(name)
        }
    }

    /// Resource compiler / archive packager
    pub fn aapt(&self) -> PathBuf {
        self.tool("aapt", "exe")
    }

    /// Bytecode packager
    pub fn dx(&self) -> PathBuf {
        self.tool("dx", "bat")
    }

    /// Archive aligner
    pub fn zipalign(&self) -> PathBuf {
        self.tool("zipalign", "exe")
    }
}
