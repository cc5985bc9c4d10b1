//! Error types for audio extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from locating or running the audio extraction tool.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The extraction tool is not installed or not executable.
    #[error("audio extraction tool '{tool}' not found: {reason}\n  Suggestion: Install ffmpeg or set ffmpeg_path in the config file")]
    ToolNotFound {
        /// Tool name or path that was searched for.
        tool: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// The tool could not be started.
    #[error("failed to start {tool}: {source}")]
    Spawn {
        /// Binary that failed to start.
        tool: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited unsuccessfully.
    #[error("{tool} exited with {status} while writing {output}: {stderr_tail}")]
    Failed {
        /// Binary that failed.
        tool: PathBuf,
        /// Exit status description.
        status: String,
        /// Audio file the tool was asked to produce.
        output: PathBuf,
        /// Last lines of the tool's stderr.
        stderr_tail: String,
    },
}

impl AudioError {
    /// Creates a `ToolNotFound` error.
    #[must_use]
    pub fn tool_not_found(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Spawn` error.
    #[must_use]
    pub fn spawn(tool: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Spawn {
            tool: tool.into(),
            source,
        }
    }
}
