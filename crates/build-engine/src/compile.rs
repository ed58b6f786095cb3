//! Compile Stage
//!
//! Resolves the requested target, generates R.java, compiles every
//! source file and converts the classes to a dex archive.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use droidpipe_android_toolchain::{find_target, parse_targets, AndroidSdk, Target};
use droidpipe_core::{
    hooks, run_checked, CompileOptions, PipelineError, Result, Stage, ToolCommand, ToolRunner,
};

use crate::context::{CompileOutput, PipelineContext};

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

/// Run the compile stage
pub async fn compile<R: ToolRunner>(
    ctx: &PipelineContext,
    options: &CompileOptions,
    runner: &R,
) -> Result<CompileOutput> {
    hooks::run_before(runner, Stage::Compile, &options.hooks).await;

    info!("Checking target validity...");
    let target = resolve_target(&ctx.sdk, &options.target, runner).await?;
    let build_tools = ctx.sdk.resolve_build_tools(&target.api_level)?;
    let platform_jar = ctx.sdk.platform_jar(target.platform_id(&options.target));
    let project = &ctx.project;

    info!("Creating R.java...");
    let aapt = ToolCommand::new(build_tools.aapt())
        .args(["package", "-f", "-m"])
        .arg("-S")
        .path_arg(&project.res_dir())
        .arg("-J")
        .path_arg(&project.src_dir())
        .arg("-M")
        .path_arg(&project.manifest())
        .arg("-I")
        .path_arg(&platform_jar);
    run_checked(runner, &aapt).await?;

    info!("Compiling...");
    let sources = discover_sources(&project.src_dir())?;
    let libraries = discover_libraries(&project.lib_dir())?;
    let classpath = classpath(&platform_jar, &project.obj_dir(), &libraries);

    for source in &sources {
        let javac = javac_command(ctx, &classpath, source);
        compile_unit(runner, &javac).await?;
    }

    info!("Creating a DEX file...");
    let classes_dex = project.classes_dex();
    let dx = ToolCommand::new(build_tools.dx())
        .arg("--dex")
        .arg(format!("--output={}", classes_dex.display()))
        .path_arg(&project.obj_dir())
        .path_arg(&project.lib_dir());
    run_checked(runner, &dx).await?;

    hooks::run_after(runner, Stage::Compile, &options.hooks).await;

    Ok(CompileOutput {
        target,
        build_tools,
        platform_jar,
        classes_dex,
    })
}

/// Run the target lister and pick the target accepting `requested`
pub async fn resolve_target<R: ToolRunner>(
    sdk: &AndroidSdk,
    requested: &str,
    runner: &R,
) -> Result<Target> {
    let output = run_checked(runner, &sdk.list_targets_command()).await?;
    let targets = parse_targets(&output.stdout);
    debug!("Parsed {} targets", targets.len());

    find_target(&targets, requested)
        .cloned()
        .ok_or_else(|| PipelineError::TargetNotFound {
            target: requested.to_string(),
            listing: output.stdout.clone(),
        })
}

/// Every `.java` file under `src_dir`, sorted
pub fn discover_sources(src_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(src_dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && has_extension(entry.path(), "java") {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Every `.jar` archive directly inside `lib_dir`, sorted
pub fn discover_libraries(lib_dir: &Path) -> Result<Vec<PathBuf>> {
    if !lib_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut jars: Vec<PathBuf> = std::fs::read_dir(lib_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_extension(p, "jar"))
        .collect();
    jars.sort();
    Ok(jars)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().map(|e| e == ext).unwrap_or(false)
}

/// `<platform jar>:<obj>[:<lib jars>]`
pub fn classpath(platform_jar: &Path, obj_dir: &Path, libraries: &[PathBuf]) -> String {
    std::iter::once(platform_jar)
        .chain(std::iter::once(obj_dir))
        .chain(libraries.iter().map(PathBuf::as_path))
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(CLASSPATH_SEPARATOR)
}

/// `javac -d <obj> -classpath <cp> -sourcepath <src> <file>`
pub fn javac_command(ctx: &PipelineContext, classpath: &str, source: &Path) -> ToolCommand {
    ToolCommand::new(ctx.java.javac())
        .arg("-d")
        .path_arg(&ctx.project.obj_dir())
        .arg("-classpath")
        .arg(classpath)
        .arg("-sourcepath")
        .path_arg(&ctx.project.src_dir())
        .path_arg(source)
}

/// Compile one source file. Output of earlier units stays on disk when a
/// later one fails.
pub async fn compile_unit<R: ToolRunner>(runner: &R, javac: &ToolCommand) -> Result<()> {
    debug!("Compiling {}", javac.args.last().map(String::as_str).unwrap_or(""));
    run_checked(runner, javac).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, TARGET_LISTING};
    use droidpipe_core::testing::ScriptedRunner;
    use droidpipe_core::{StageHooks, ToolOutput};

    fn options(target: &str) -> CompileOptions {
        CompileOptions {
            target: target.into(),
            hooks: StageHooks::default(),
        }
    }

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new().respond("list target", ToolOutput::success(TARGET_LISTING))
    }

    #[tokio::test]
    async fn test_compile_invokes_each_tool_in_order() {
        let (_dir, ctx) = fixture();
        let runner = runner();

        let output = compile(&ctx, &options("android-17"), &runner).await.unwrap();

        assert_eq!(output.target.api_level, "17");
        assert_eq!(output.build_tools.version, "17.0.0");
        assert!(output.platform_jar.ends_with("platforms/android-17/android.jar"));
        assert_eq!(output.classes_dex, ctx.project.classes_dex());

        let lines = runner.lines();
        assert!(lines[0].contains("list target"));
        assert!(lines[1].contains("aapt package -f -m"));
        assert_eq!(runner.count("javac -d"), 2);
        assert!(lines[4].contains("dx --dex"));
        assert_eq!(lines.len(), 5);
    }

    #[tokio::test]
    async fn test_numeric_alias_resolves_platform_dir() {
        let (_dir, ctx) = fixture();
        let runner = runner();

        let output = compile(&ctx, &options("2"), &runner).await.unwrap();
        assert!(output.platform_jar.ends_with("platforms/android-17/android.jar"));
    }

    #[tokio::test]
    async fn test_unknown_target_aborts_before_compiling() {
        let (_dir, ctx) = fixture();
        let runner = runner();

        let err = compile(&ctx, &options("android-99"), &runner).await.unwrap_err();

        match err {
            PipelineError::TargetNotFound { target, listing } => {
                assert_eq!(target, "android-99");
                assert_eq!(listing, TARGET_LISTING);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(runner.count("aapt package"), 0);
        assert_eq!(runner.count("javac -d"), 0);
    }

    #[tokio::test]
    async fn test_first_failing_unit_stops_compilation() {
        let (_dir, ctx) = fixture();
        let runner = ScriptedRunner::new()
            .respond("list target", ToolOutput::success(TARGET_LISTING))
            .fail("Hello.java");

        let err = compile(&ctx, &options("android-17"), &runner).await.unwrap_err();

        assert!(matches!(err, PipelineError::ToolFailed { .. }));
        // sources are compiled in sorted order: Hello.java then World.java
        assert_eq!(runner.count("javac -d"), 1);
        assert_eq!(runner.count("dx --dex"), 0);
    }

    #[tokio::test]
    async fn test_hooks_wrap_the_stage() {
        let (_dir, ctx) = fixture();
        let runner = runner();
        let opts = CompileOptions {
            target: "android-17".into(),
            hooks: StageHooks {
                before: vec!["echo before".into()],
                after: vec!["echo after".into()],
            },
        };

        compile(&ctx, &opts, &runner).await.unwrap();

        let lines = runner.lines();
        assert!(lines.first().unwrap().ends_with("echo before"));
        assert!(lines.last().unwrap().ends_with("echo after"));
    }

    #[test]
    fn test_discover_sources_recurses() {
        let (_dir, ctx) = fixture();
        let sources = discover_sources(&ctx.project.src_dir()).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Hello.java", "World.java"]);
    }

    #[test]
    fn test_classpath_includes_library_jars() {
        let (_dir, ctx) = fixture();
        let libs = discover_libraries(&ctx.project.lib_dir()).unwrap();
        assert_eq!(libs.len(), 1);

        let cp = classpath(Path::new("/sdk/android.jar"), Path::new("/app/obj"), &libs);
        let parts: Vec<&str> = cp.split(CLASSPATH_SEPARATOR).collect();
        assert_eq!(parts[0], "/sdk/android.jar");
        assert_eq!(parts[1], "/app/obj");
        assert!(parts[2].ends_with("support.jar"));
    }
}
