//! Scripted runner for tests
//!
//! Records every invocation and answers with canned outputs chosen by
//! substring match against the rendered command line. Commands without
//! a matching rule succeed with empty output.

use parking_lot::Mutex;

use crate::error::Result;
use crate::process::{ToolCommand, ToolOutput, ToolRunner};

#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, ToolOutput)>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose rendered line contains `pattern` with `output`.
    /// Earlier rules win.
    pub fn respond(mut self, pattern: &str, output: ToolOutput) -> Self {
        self.rules.push((pattern.to_string(), output));
        self
    }

    /// Shorthand for a rule that exits with status 1
    pub fn fail(self, pattern: &str) -> Self {
        self.respond(pattern, ToolOutput::failure(1, format!("{} failed", pattern)))
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().clone()
    }

    /// Rendered command lines, in invocation order
    pub fn lines(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.to_string()).collect()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(pattern)).count()
    }

    /// First recorded command whose line contains `pattern`
    pub fn find(&self, pattern: &str) -> Option<ToolCommand> {
        self.calls
            .lock()
            .iter()
            .find(|c| c.to_string().contains(pattern))
            .cloned()
    }
}

impl ToolRunner for ScriptedRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let line = command.to_string();
        self.calls.lock().push(command.clone());

        let output = self
            .rules
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ToolOutput::success(""));

        Ok(output)
    }
}
