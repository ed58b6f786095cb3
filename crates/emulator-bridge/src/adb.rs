//! ADB (Android Debug Bridge) Client
//!
//! Deploys the final archive to an emulator or a physical device.

use std::path::Path;
use tracing::info;

use droidpipe_android_toolchain::AndroidSdk;
use droidpipe_core::{PipelineError, ProfileType, Result, ToolCommand, ToolRunner};

/// Which kind of device `adb` should address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTarget {
    Emulator,
    Device,
}

impl DeployTarget {
    /// `adb` selector flag
    pub fn flag(&self) -> &'static str {
        match self {
            DeployTarget::Emulator => "-e",
            DeployTarget::Device => "-d",
        }
    }
}

impl From<ProfileType> for DeployTarget {
    fn from(kind: ProfileType) -> Self {
        match kind {
            ProfileType::Emulator => DeployTarget::Emulator,
            ProfileType::Device => DeployTarget::Device,
        }
    }
}

/// ADB Client
pub struct AdbClient<'a, R> {
    sdk: &'a AndroidSdk,
    runner: &'a R,
}

impl<'a, R: ToolRunner> AdbClient<'a, R> {
    pub fn new(sdk: &'a AndroidSdk, runner: &'a R) -> Self {
        Self { sdk, runner }
    }

    /// `adb -e|-d install -r <apk>`
    pub fn install_command(&self, target: DeployTarget, apk: &Path) -> ToolCommand {
        ToolCommand::new(self.sdk.adb())
            .arg(target.flag())
            .args(["install", "-r"])
            .path_arg(apk)
    }

    /// Install `apk`, replacing any previous install
    pub async fn install(&self, target: DeployTarget, apk: &Path) -> Result<()> {
        info!("Installing {:?} ({})", apk, target.flag());

        let output = self.runner.run(&self.install_command(target, apk)).await?;
        if !output.is_success() {
            return Err(PipelineError::tool_failed("adb install", &output));
        }

        Ok(())
    }
}
