//! Stage Hooks
//!
//! Runs the `before` / `after` shell command lists attached to a stage.
//! Hooks are best-effort: a failing hook is logged and the remaining
//! hooks and the owning stage carry on.

use tracing::{debug, info, warn};

use crate::config::StageHooks;
use crate::process::{ToolCommand, ToolOutput, ToolRunner};
use crate::stage::{HookPhase, Stage};

/// Run `commands` in order through the host shell. Never fails.
pub async fn run_hooks<R: ToolRunner>(
    runner: &R,
    stage: Stage,
    phase: HookPhase,
    commands: &[String],
) {
    for command in commands {
        info!("Running {} {} hook: {}", stage, phase.as_str(), command);

        match runner.run(&ToolCommand::shell(command)).await {
            Ok(output) if output.is_success() => match hook_output(&output) {
                Some(text) => info!("{}", text),
                None => debug!("Hook finished: {}", command),
            },
            Ok(output) => {
                warn!(
                    "{} {} hook `{}` failed ({}): {}",
                    stage,
                    phase.as_str(),
                    command,
                    output.status_label(),
                    output.combined().trim_end()
                );
            }
            Err(e) => {
                warn!("{} {} hook `{}` could not run: {}", stage, phase.as_str(), command, e);
            }
        }
    }
}

/// Printed text of a successful hook, if it printed anything
fn hook_output(output: &ToolOutput) -> Option<&str> {
    let text = output.stdout.trim_end();
    (!text.trim().is_empty()).then_some(text)
}

/// Run the entry hooks of a stage
pub async fn run_before<R: ToolRunner>(runner: &R, stage: Stage, hooks: &StageHooks) {
    run_hooks(runner, stage, HookPhase::Before, &hooks.before).await
}

/// Run the exit hooks of a stage
pub async fn run_after<R: ToolRunner>(runner: &R, stage: Stage, hooks: &StageHooks) {
    run_hooks(runner, stage, HookPhase::After, &hooks.after).await
}
