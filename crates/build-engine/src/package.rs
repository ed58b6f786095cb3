//! Package Stage
//!
//! Binds the manifest, resources and compiled dex into an unsigned archive.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use droidpipe_core::{
    hooks, run_checked, PackageOptions, ProjectLayout, Result, Stage, ToolCommand, ToolRunner,
};

use crate::context::{CompileOutput, PipelineContext};

/// Run the package stage and return the unsigned archive path
pub async fn package<R: ToolRunner>(
    ctx: &PipelineContext,
    compiled: &CompileOutput,
    options: &PackageOptions,
    runner: &R,
) -> Result<PathBuf> {
    hooks::run_before(runner, Stage::Package, &options.hooks).await;

    let removed = remove_stale_archives(&ctx.project.bin_dir())?;
    if removed > 0 {
        debug!("Removed {} stale archive(s)", removed);
    }

    info!("Packaging...");
    let unsigned = ctx.project.unsigned_apk(&options.name);
    let aapt = package_command(&ctx.project, compiled, &unsigned);
    run_checked(runner, &aapt).await?;

    hooks::run_after(runner, Stage::Package, &options.hooks).await;

    info!("Created {:?}", unsigned);
    Ok(unsigned)
}

/// `aapt package -f -M <manifest> -S <res> -I <jar> -F <unsigned> <bin>`
pub fn package_command(
    project: &ProjectLayout,
    compiled: &CompileOutput,
    unsigned: &Path,
) -> ToolCommand {
    ToolCommand::new(compiled.build_tools.aapt())
        .args(["package", "-f"])
        .arg("-M")
        .path_arg(&project.manifest())
        .arg("-S")
        .path_arg(&project.res_dir())
        .arg("-I")
        .path_arg(&compiled.platform_jar)
        .arg("-F")
        .path_arg(unsigned)
        .path_arg(&project.bin_dir())
}

/// Delete every `*.apk` left in `bin_dir` by an earlier run
pub fn remove_stale_archives(bin_dir: &Path) -> Result<usize> {
    let pattern = format!(
        "{}/*.apk",
        glob::Pattern::escape(&bin_dir.to_string_lossy())
    );

    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping stale archive cleanup: {}", e);
            return Ok(0);
        }
    };

    let mut removed = 0;
    for path in entries.filter_map(|e| e.ok()) {
        if path.is_file() {
            debug!("Removing {:?}", path);
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
