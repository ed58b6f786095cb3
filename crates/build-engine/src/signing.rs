//! APK Signing
//!
//! Provisions the release keystore, signs the unsigned archive with
//! jarsigner and aligns the result with zipalign.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use droidpipe_android_toolchain::{BuildTools, JavaHome};
use droidpipe_core::{hooks, run_checked, Result, SignOptions, Stage, ToolCommand, ToolRunner};

use crate::context::PipelineContext;

/// Run the sign stage and return the aligned archive path
pub async fn sign<R: ToolRunner>(
    ctx: &PipelineContext,
    build_tools: &BuildTools,
    unsigned: &Path,
    options: &SignOptions,
    runner: &R,
) -> Result<PathBuf> {
    hooks::run_before(runner, Stage::Sign, &options.hooks).await;

    let keystore = ctx.project.resolve(&options.keystore.path);
    ensure_keystore(&ctx.java, &keystore, options, runner).await?;

    info!("Signing...");
    let signed = signed_path(unsigned);
    let jarsigner = jarsigner_command(&ctx.java, &keystore, options, unsigned, &signed);
    run_checked(runner, &jarsigner).await?;

    info!("Aligning...");
    let aligned = aligned_path(&signed);
    run_checked(runner, &zipalign_command(build_tools, &signed, &aligned)).await?;

    hooks::run_after(runner, Stage::Sign, &options.hooks).await;

    info!("APK signed successfully: {:?}", aligned);
    Ok(aligned)
}

/// Generate the keystore unless a file already exists at `keystore`.
/// Returns whether one was generated.
pub async fn ensure_keystore<R: ToolRunner>(
    java: &JavaHome,
    keystore: &Path,
    options: &SignOptions,
    runner: &R,
) -> Result<bool> {
    if keystore.exists() {
        debug!("Using existing keystore {:?}", keystore);
        return Ok(false);
    }

    info!("Generating keystore: {:?}", keystore);
    run_checked(runner, &keytool_command(java, keystore, options)).await?;
    Ok(true)
}

/// `keytool -genkey -v -keystore <ks> -alias <alias> ... -dname <dn>`
pub fn keytool_command(java: &JavaHome, keystore: &Path, options: &SignOptions) -> ToolCommand {
    let ks = &options.keystore;
    ToolCommand::new(java.keytool())
        .args(["-genkey", "-v"])
        .arg("-keystore")
        .path_arg(keystore)
        .arg("-alias")
        .arg(options.key_alias.as_str())
        .arg("-keyalg")
        .arg(ks.keyalg.as_str())
        .arg("-keysize")
        .arg(ks.keysize.to_string())
        .arg("-validity")
        .arg(ks.validity.to_string())
        .arg("-storepass")
        .arg(options.storepass.as_str())
        .arg("-keypass")
        .arg(options.keypass.as_str())
        .arg("-dname")
        .arg(ks.distinguished_name())
}

/// `jarsigner -verbose ... -signedjar <signed> <unsigned> <alias>`
pub fn jarsigner_command(
    java: &JavaHome,
    keystore: &Path,
    options: &SignOptions,
    unsigned: &Path,
    signed: &Path,
) -> ToolCommand {
    ToolCommand::new(java.jarsigner())
        .arg("-verbose")
        .arg("-sigalg")
        .arg(options.sigalg.as_str())
        .arg("-digestalg")
        .arg(options.digestalg.as_str())
        .arg("-keystore")
        .path_arg(keystore)
        .arg("-storepass")
        .arg(options.storepass.as_str())
        .arg("-keypass")
        .arg(options.keypass.as_str())
        .arg("-signedjar")
        .path_arg(signed)
        .path_arg(unsigned)
        .arg(options.key_alias.as_str())
}

/// `zipalign -f 4 <signed> <aligned>`
pub fn zipalign_command(build_tools: &BuildTools, signed: &Path, aligned: &Path) -> ToolCommand {
    ToolCommand::new(build_tools.zipalign())
        .args(["-f", "4"])
        .path_arg(signed)
        .path_arg(aligned)
}

/// `Name.unsigned.apk` -> `Name.signed.apk`
pub fn signed_path(unsigned: &Path) -> PathBuf {
    rename_suffix(unsigned, "unsigned.apk", "signed.apk")
}

/// `Name.signed.apk` -> `Name.apk`
pub fn aligned_path(signed: &Path) -> PathBuf {
    rename_suffix(signed, "signed.apk", "apk")
}

// Only the file name is rewritten so directory names are never touched.
fn rename_suffix(path: &Path, from: &str, to: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let renamed = if name.contains(from) {
        name.replacen(from, to, 1)
    } else {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}.{}", stem, to)
    };

    path.with_file_name(renamed)
}
