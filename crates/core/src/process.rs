//! Process Execution
//!
//! Capability abstraction over "run an external program, capture its
//! exit status and output". Every toolchain invocation in the pipeline
//! goes through a [`ToolRunner`] so stages can be exercised without the
//! real SDK installed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// A single external program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Text fed to the program's stdin, if any
    pub stdin: Option<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    /// Run `command` through the host shell
    pub fn shell(command: &str) -> Self {
        if cfg!(windows) {
            Self::new("cmd").arg("/C").arg(command)
        } else {
            Self::new("sh").arg("-c").arg(command)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Short program name used in diagnostics (`aapt`, `javac`, ...)
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_label(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }
}

/// Runs external programs
///
/// Implementations must complete the invocation before returning; the
/// pipeline never has two invocations in flight.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Run `command` to completion. A non-zero exit is reported through
    /// [`ToolOutput::status`], not as an error; `Err` means the program
    /// could not be launched at all.
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        (**self).run(command).await
    }
}

/// Run `command` and turn a non-zero exit into [`PipelineError::ToolFailed`]
pub async fn run_checked<R: ToolRunner>(runner: &R, command: &ToolCommand) -> Result<ToolOutput> {
    let output = runner.run(command).await?;
    if !output.is_success() {
        return Err(PipelineError::tool_failed(command.tool_name(), &output));
    }
    Ok(output)
}

/// Runs programs on the host with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        debug!("Running: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = command.cwd {
            cmd.current_dir(dir);
        }

        let output = match command.stdin {
            Some(ref input) => {
                cmd.stdin(Stdio::piped());
                let mut child = cmd.spawn().map_err(|e| launch_error(command, e))?;
                if let Some(mut stdin) = child.stdin.take() {
                    stdin.write_all(input.as_bytes()).await?;
                }
                child.wait_with_output().await?
            }
            None => {
                cmd.stdin(Stdio::null());
                cmd.output().await.map_err(|e| launch_error(command, e))?
            }
        };

        let result = ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!("{} finished with {}", command.tool_name(), result.status_label());
        if !result.stdout.is_empty() {
            debug!("stdout:\n{}", result.stdout);
        }
        if !result.stderr.is_empty() {
            debug!("stderr:\n{}", result.stderr);
        }

        Ok(result)
    }
}

/// A program that could not be started at all
fn launch_error(command: &ToolCommand, e: std::io::Error) -> PipelineError {
    PipelineError::ToolchainNotFound(format!("{}: {}", command.program.display(), e))
}
