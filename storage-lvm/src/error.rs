// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::cmd::render_vector;

/// Error types for LVM relay operations
#[derive(Error, Debug)]
pub enum LvmError {
    #[error(
        "command failed: {}; status: {}; stdout: {stdout}; stderr: {stderr}",
        render_vector(.command),
        display_status(.status)
    )]
    CommandFailed {
        command: Vec<String>,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("failed to spawn {}: {source}", render_vector(.command))]
    Spawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("config io error for {path:?}: {reason}")]
    ConfigIo { path: PathBuf, reason: String },

    #[error("invalid config {path:?}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },
}

/// Result type alias for LVM relay operations
pub type Result<T> = std::result::Result<T, LvmError>;

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "killed by signal".to_string(),
    }
}

/// Machine-readable view of a failed external command.
#[derive(Debug, Serialize)]
pub struct FailureReport<'a> {
    pub command: &'a [String],
    pub status: Option<i32>,
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl LvmError {
    /// Process exit code the helper should terminate with.
    ///
    /// Mirrors the external tool's status where it fits in a process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            LvmError::CommandFailed {
                status: Some(code), ..
            } => u8::try_from(*code).ok().filter(|code| *code != 0).unwrap_or(1),
            _ => 1,
        }
    }

    pub fn failure_report(&self) -> Option<FailureReport<'_>> {
        match self {
            LvmError::CommandFailed {
                command,
                status,
                stdout,
                stderr,
            } => Some(FailureReport {
                command,
                status: *status,
                stdout,
                stderr,
            }),
            _ => None,
        }
    }

    /// Single-line JSON rendering of [`LvmError::failure_report`].
    pub fn failure_report_json(&self) -> Option<String> {
        self.failure_report()
            .and_then(|report| serde_json::to_string(&report).ok())
    }
}
