//! AVD (Android Virtual Device) Manager
//!
//! Lists and creates virtual devices through the SDK manager script.

use tracing::info;

use droidpipe_android_toolchain::{parse_virtual_devices, AndroidSdk};
use droidpipe_core::{PipelineError, Profile, Result, ToolCommand, ToolRunner};

/// AVD Manager
pub struct AvdManager<'a, R> {
    sdk: &'a AndroidSdk,
    runner: &'a R,
}

impl<'a, R: ToolRunner> AvdManager<'a, R> {
    pub fn new(sdk: &'a AndroidSdk, runner: &'a R) -> Self {
        Self { sdk, runner }
    }

    /// `android list avd`
    pub fn list_command(&self) -> ToolCommand {
        ToolCommand::new(self.sdk.android_tool()).args(["list", "avd"])
    }

    /// `android create avd -n <name> -t <target> -c <sdcard> --abi <abi>`
    ///
    /// The tool asks whether to create a custom hardware profile; the
    /// answer is fed on stdin.
    pub fn create_command(&self, profile: &Profile) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.sdk.android_tool())
            .args(["create", "avd"])
            .arg("-n")
            .arg(profile.name.as_str())
            .arg("-t")
            .arg(profile.target.as_str());

        if !profile.sdcard.is_empty() {
            cmd = cmd.arg("-c").arg(profile.sdcard.as_str());
        }
        if !profile.abi.is_empty() {
            cmd = cmd.arg("--abi").arg(profile.abi.as_str());
        }

        cmd.stdin("no\n")
    }

    /// Names of the existing virtual devices
    pub async fn list_avds(&self) -> Result<Vec<String>> {
        let output = self.runner.run(&self.list_command()).await?;
        if !output.is_success() {
            return Err(PipelineError::tool_failed("android list avd", &output));
        }

        Ok(parse_virtual_devices(&output.stdout))
    }

    /// Create the virtual device described by an emulator profile
    pub async fn create_avd(&self, profile: &Profile) -> Result<()> {
        info!("Creating AVD: {} ({})", profile.name, profile.target);

        let output = self.runner.run(&self.create_command(profile)).await?;
        if !output.is_success() {
            return Err(PipelineError::tool_failed("android create avd", &output));
        }

        info!("AVD created successfully: {}", profile.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidpipe_core::testing::ScriptedRunner;
    use droidpipe_core::{ProfileType, ToolOutput};

    fn emulator_profile() -> Profile {
        Profile {
            name: "emu1".into(),
            kind: ProfileType::Emulator,
            target: "android-17".into(),
            sdcard: "64M".into(),
            abi: "armeabi".into(),
        }
    }

    #[test]
    fn test_create_command_arguments() {
        let sdk = AndroidSdk::new("/sdk");
        let runner = ScriptedRunner::new();
        let avd = AvdManager::new(&sdk, &runner);

        let cmd = avd.create_command(&emulator_profile());
        assert_eq!(
            cmd.args,
            vec!["create", "avd", "-n", "emu1", "-t", "android-17", "-c", "64M", "--abi", "armeabi"]
        );
        assert_eq!(cmd.stdin.as_deref(), Some("no\n"));
    }

    #[test]
    fn test_create_command_omits_empty_options() {
        let sdk = AndroidSdk::new("/sdk");
        let runner = ScriptedRunner::new();
        let avd = AvdManager::new(&sdk, &runner);

        let profile = Profile { sdcard: String::new(), abi: String::new(), ..emulator_profile() };
        assert_eq!(
            avd.create_command(&profile).args,
            vec!["create", "avd", "-n", "emu1", "-t", "android-17"]
        );
    }

    #[tokio::test]
    async fn test_list_avds_parses_listing() {
        let sdk = AndroidSdk::new("/sdk");
        let runner = ScriptedRunner::new().respond(
            "list avd",
            ToolOutput::success("Available Android Virtual Devices:\n    Name: emu1\n    Path: /x\n"),
        );
        let avd = AvdManager::new(&sdk, &runner);

        assert_eq!(avd.list_avds().await.unwrap(), vec!["emu1"]);
    }

    #[tokio::test]
    async fn test_create_failure_is_fatal() {
        let sdk = AndroidSdk::new("/sdk");
        let runner = ScriptedRunner::new().fail("create avd");
        let avd = AvdManager::new(&sdk, &runner);

        let err = avd.create_avd(&emulator_profile()).await.unwrap_err();
        assert!(matches!(err, PipelineError::ToolFailed { .. }));
    }
}
