//! Build Runner
//!
//! Sequences the stages. Each stage runs only when its configuration
//! section is present and the previous stage ran; the artifact a stage
//! produces is handed to the next one and recorded in the context.

use tracing::info;

use droidpipe_core::{BuildConfiguration, Result, Stage, ToolRunner};

use crate::compile::compile;
use crate::context::PipelineContext;
use crate::install::install;
use crate::package::package;
use crate::signing::sign;

/// Build pipeline driving the external toolchain through `runner`
pub struct Pipeline<R> {
    runner: R,
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run every requested stage. The first fatal error aborts the run;
    /// `ctx` keeps whatever the completed stages produced.
    pub async fn run(&self, ctx: &mut PipelineContext, config: &BuildConfiguration) -> Result<()> {
        let runner = &self.runner;

        let Some(ref compile_opts) = config.compile else {
            info!("No compile section; nothing to do");
            return Ok(());
        };

        info!("Compiling for target {}", compile_opts.target);
        let compiled = compile(ctx, compile_opts, runner).await?;
        ctx.target = Some(compiled.target.clone());
        ctx.build_tools = Some(compiled.build_tools.clone());
        ctx.classes_dex = Some(compiled.classes_dex.clone());
        self.finish(ctx, Stage::Compile);

        if let Some(ref package_opts) = config.package {
            let unsigned = package(ctx, &compiled, package_opts, runner).await?;
            ctx.unsigned_apk = Some(unsigned.clone());
            self.finish(ctx, Stage::Package);

            if let Some(ref sign_opts) = config.sign {
                let final_apk =
                    sign(ctx, &compiled.build_tools, &unsigned, sign_opts, runner).await?;
                ctx.final_apk = Some(final_apk.clone());
                self.finish(ctx, Stage::Sign);

                if let Some(ref install_opts) = config.install {
                    let deployed =
                        install(ctx, &final_apk, install_opts, &config.profiles, runner).await?;
                    ctx.deployed_to = Some(deployed);
                    self.finish(ctx, Stage::Install);
                }
            }
        }

        info!("Build complete: {} stage(s) ran", ctx.completed.len());
        Ok(())
    }

    fn finish(&self, ctx: &mut PipelineContext, stage: Stage) {
        info!("Finished {} stage", stage);
        ctx.completed.push(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture, full_config, AVD_LISTING, TARGET_LISTING};
    use droidpipe_core::testing::ScriptedRunner;
    use droidpipe_core::{PipelineError, ToolOutput};
    use droidpipe_emulator_bridge::DeployTarget;

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .respond("list target", ToolOutput::success(TARGET_LISTING))
            .respond("list avd", ToolOutput::success(AVD_LISTING))
    }

    #[tokio::test]
    async fn test_compile_only_configuration_stops_after_compile() {
        let (_dir, mut ctx) = fixture();
        let config = BuildConfiguration::from_toml_str("[compile]\ntarget = \"android-17\"\n").unwrap();
        let pipeline = Pipeline::new(runner());

        pipeline.run(&mut ctx, &config).await.unwrap();

        assert_eq!(ctx.completed, vec![Stage::Compile]);
        assert!(ctx.classes_dex.is_some());
        assert!(ctx.unsigned_apk.is_none());

        let runner = pipeline.runner();
        assert_eq!(runner.count(" -F "), 0);
        assert_eq!(runner.count("keytool"), 0);
        assert_eq!(runner.count("jarsigner"), 0);
        assert_eq!(runner.count("list avd"), 0);
        assert_eq!(runner.count("install -r"), 0);
    }

    #[tokio::test]
    async fn test_later_sections_without_package_never_run() {
        let (_dir, mut ctx) = fixture();
        let mut config = full_config();
        config.package = None;
        let pipeline = Pipeline::new(runner());

        pipeline.run(&mut ctx, &config).await.unwrap();

        assert_eq!(ctx.completed, vec![Stage::Compile]);
        assert_eq!(pipeline.runner().count("jarsigner"), 0);
        assert_eq!(pipeline.runner().count("install -r"), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_creates_emulator_and_deploys() {
        let (_dir, mut ctx) = fixture();
        let config = full_config();
        let pipeline = Pipeline::new(runner());

        pipeline.run(&mut ctx, &config).await.unwrap();

        assert_eq!(ctx.completed, Stage::all());
        assert_eq!(ctx.target.as_ref().unwrap().api_level, "17");
        assert_eq!(ctx.build_tools.as_ref().unwrap().version, "17.0.0");
        assert_eq!(
            ctx.final_apk.as_deref(),
            Some(ctx.project.bin_dir().join("HelloAndroid.apk").as_path())
        );
        assert_eq!(ctx.deployed_to, Some(DeployTarget::Emulator));

        let runner = pipeline.runner();
        let create = runner.find("create avd").unwrap();
        assert_eq!(
            create.args,
            vec!["create", "avd", "-n", "emu1", "-t", "android-17", "-c", "64M", "--abi", "armeabi"]
        );

        let lines = runner.lines();
        let create_at = lines.iter().position(|l| l.contains("create avd")).unwrap();
        let deploy_at = lines.iter().position(|l| l.contains("-e install -r")).unwrap();
        assert!(create_at < deploy_at);
        assert_eq!(deploy_at, lines.len() - 1);
    }

    #[tokio::test]
    async fn test_device_profile_deploys_with_device_flag() {
        let (_dir, mut ctx) = fixture();
        let mut config = full_config();
        config.install.as_mut().unwrap().profile = "phone".into();
        let pipeline = Pipeline::new(runner());

        pipeline.run(&mut ctx, &config).await.unwrap();

        assert_eq!(ctx.deployed_to, Some(DeployTarget::Device));
        assert_eq!(pipeline.runner().count("create avd"), 0);
        assert_eq!(pipeline.runner().count("-d install -r"), 1);
    }

    #[tokio::test]
    async fn test_unknown_target_aborts_the_run() {
        let (_dir, mut ctx) = fixture();
        let mut config = full_config();
        config.compile.as_mut().unwrap().target = "android-99".into();
        let pipeline = Pipeline::new(runner());

        let err = pipeline.run(&mut ctx, &config).await.unwrap_err();

        assert!(matches!(err, PipelineError::TargetNotFound { .. }));
        assert!(ctx.completed.is_empty());
        assert_eq!(pipeline.runner().count("aapt package"), 0);
        assert_eq!(pipeline.runner().count("javac -d"), 0);
    }

    #[tokio::test]
    async fn test_failing_stage_keeps_earlier_artifacts() {
        let (_dir, mut ctx) = fixture();
        let config = full_config();
        let pipeline = Pipeline::new(runner().fail("jarsigner"));

        assert!(pipeline.run(&mut ctx, &config).await.is_err());

        assert_eq!(ctx.completed, vec![Stage::Compile, Stage::Package]);
        assert!(ctx.unsigned_apk.is_some());
        assert!(ctx.final_apk.is_none());
        assert_eq!(pipeline.runner().count("list avd"), 0);
    }

    #[tokio::test]
    async fn test_empty_configuration_runs_nothing() {
        let (_dir, mut ctx) = fixture();
        let pipeline = Pipeline::new(runner());

        pipeline
            .run(&mut ctx, &BuildConfiguration::default())
            .await
            .unwrap();

        assert!(ctx.completed.is_empty());
        assert!(pipeline.runner().calls().is_empty());
    }
}
