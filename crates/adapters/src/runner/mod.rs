// SPDX-License-Identifier: MIT

//! Command execution abstraction
//!
//! Every adapter invocation routes through a [`CommandRunner`] so tests can
//! substitute a response map keyed by the reconstructed command line.

mod system;

pub use system::SystemRunner;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResponse, FakeRunner};

use async_trait::async_trait;
use rig_core::OpCtx;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from command execution
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("binary not found: {0}")]
    NotFound(String),

    #[error("failed to start {binary}: {message}")]
    StartFailed { binary: String, message: String },

    #[error("{binary} exited with code {code}")]
    NonZeroExit {
        binary: String,
        code: i32,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },

    #[error("operation canceled")]
    Canceled,

    #[error("{binary} timed out after {}s", timeout.as_secs())]
    Timeout { binary: String, timeout: Duration },
}

impl RunnerError {
    /// Exit code for post-hoc pattern matching, if the process ran.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunnerError::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Captured output of a completed process.
#[derive(Debug, Clone, Default)]
pub struct CmdOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub code: i32,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Stdout and stderr concatenated, for pattern matching.
    pub fn combined(&self) -> String {
        let mut s = self.stdout_str();
        s.push_str(&self.stderr_str());
        s
    }
}

/// Abstracted invocation of external processes.
///
/// `run` reports non-zero exits as data, not errors; adapters decide which
/// exits are failures. `execute` is the strict variant for callers that only
/// accept success.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion, capturing output. A non-zero exit is an `Ok`.
    async fn run(&self, ctx: &OpCtx, binary: &str, args: &[&str])
        -> Result<CmdOutput, RunnerError>;

    /// Resolve a binary on PATH without executing it.
    fn look_path(&self, binary: &str) -> Option<PathBuf>;

    /// Run and return stdout; a non-zero exit becomes `NonZeroExit`.
    async fn execute(
        &self,
        ctx: &OpCtx,
        binary: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, RunnerError> {
        let out = self.run(ctx, binary, args).await?;
        if out.success() {
            Ok(out.stdout)
        } else {
            Err(RunnerError::NonZeroExit {
                binary: binary.to_string(),
                code: out.code,
                stdout: out.stdout,
                stderr: out.stderr,
            })
        }
    }

    /// Run and return stdout and stderr interleaved-as-captured; a non-zero
    /// exit becomes `NonZeroExit`.
    async fn combined_output(
        &self,
        ctx: &OpCtx,
        binary: &str,
        args: &[&str],
    ) -> Result<String, RunnerError> {
        let out = self.run(ctx, binary, args).await?;
        if out.success() {
            Ok(out.combined())
        } else {
            Err(RunnerError::NonZeroExit {
                binary: binary.to_string(),
                code: out.code,
                stdout: out.stdout,
                stderr: out.stderr,
            })
        }
    }
}

/// Render a command line the way the fake runner keys its responses.
pub fn command_line(binary: &str, args: &[&str]) -> String {
    let mut line = String::from(binary);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
