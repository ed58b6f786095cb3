//! Install Stage
//!
//! Resolves the install profile against the existing virtual devices,
//! creates the emulator image when needed and deploys the final archive.

use std::path::Path;
use tracing::{debug, info};

use droidpipe_core::{
    hooks, InstallOptions, PipelineError, Profile, ProfileType, Result, Stage, ToolRunner,
};
use droidpipe_emulator_bridge::{AdbClient, AvdManager, DeployTarget};

use crate::context::PipelineContext;

/// Run the install stage and report which kind of device was addressed
pub async fn install<R: ToolRunner>(
    ctx: &PipelineContext,
    final_apk: &Path,
    options: &InstallOptions,
    profiles: &[Profile],
    runner: &R,
) -> Result<DeployTarget> {
    hooks::run_before(runner, Stage::Install, &options.hooks).await;

    let avd = AvdManager::new(&ctx.sdk, runner);
    let existing = avd.list_avds().await?;
    debug!("Existing virtual devices: {:?}", existing);

    let profile = profiles.iter().find(|p| p.name == options.profile);
    let target = resolve_deploy_target(&options.profile, profile, &existing)?;

    if let Some(profile) = profile {
        if needs_emulator(profile, &existing) {
            avd.create_avd(profile).await?;
        }
    }

    info!("Installing...");
    AdbClient::new(&ctx.sdk, runner)
        .install(target, final_apk)
        .await?;

    hooks::run_after(runner, Stage::Install, &options.hooks).await;

    info!("Installed {:?} on {:?}", final_apk, target);
    Ok(target)
}

/// Pick the device kind for `name`. A name absent from both the profile
/// definitions and the virtual-device listing cannot be deployed to.
pub fn resolve_deploy_target(
    name: &str,
    profile: Option<&Profile>,
    existing: &[String],
) -> Result<DeployTarget> {
    match profile {
        Some(profile) => Ok(DeployTarget::from(profile.kind)),
        None if existing.iter().any(|avd| avd == name) => Ok(DeployTarget::Emulator),
        None => Err(PipelineError::ProfileNotFound(name.to_string())),
    }
}

/// Emulator profiles whose image does not exist yet
pub fn needs_emulator(profile: &Profile, existing: &[String]) -> bool {
    profile.kind == ProfileType::Emulator && !existing.iter().any(|avd| *avd == profile.name)
}
