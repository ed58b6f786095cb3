//! Error types for droidpipe
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required directory not available: {0}")]
    MissingDirectory(String),

    #[error("Could not find target: {target}")]
    TargetNotFound {
        target: String,
        /// Raw lister output, kept verbatim for diagnosis
        listing: String,
    },

    #[error("Could not find profile: {0}")]
    ProfileNotFound(String),

    #[error("No build-tools version for API level {api_level} in {dir:?}")]
    BuildToolsNotFound { api_level: String, dir: PathBuf },

    #[error("Toolchain not found: {0}")]
    ToolchainNotFound(String),

    #[error("{tool} failed ({status})")]
    ToolFailed {
        tool: String,
        status: String,
        output: String,
    },
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Build a `ToolFailed` error from a finished invocation
    pub fn tool_failed(tool: impl Into<String>, output: &crate::process::ToolOutput) -> Self {
        PipelineError::ToolFailed {
            tool: tool.into(),
            status: output.status_label(),
            output: output.combined(),
        }
    }

    /// Get a user-facing diagnostic
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::TargetNotFound { target, listing } => {
                format!("Could not find target: {}\n{}", target, listing)
            }
            PipelineError::ToolFailed { tool, status, output } if !output.trim().is_empty() => {
                format!("Failed to run {} ({}):\n{}", tool, status, output.trim_end())
            }
            PipelineError::ToolFailed { tool, status, .. } => {
                format!("Failed to run {} ({})", tool, status)
            }
            PipelineError::Io(e) => format!("File operation failed: {}", e),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ToolOutput;

    #[test]
    fn test_target_not_found_message_includes_listing() {
        let err = PipelineError::TargetNotFound {
            target: "android-99".into(),
            listing: "Available Android targets:\n".into(),
        };
        let message = err.user_message();
        assert!(message.starts_with("Could not find target: android-99"));
        assert!(message.contains("Available Android targets:"));
    }

    #[test]
    fn test_tool_failed_carries_status_and_output() {
        let output = ToolOutput::failure(2, "javac: error");
        let err = PipelineError::tool_failed("javac", &output);
        assert_eq!(err.to_string(), "javac failed (exit status 2)");
        assert!(err.user_message().contains("javac: error"));
    }
}
