// SPDX-License-Identifier: MIT

//! System process runner

use super::{CmdOutput, CommandRunner, RunnerError};
use async_trait::async_trait;
use rig_core::OpCtx;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs real processes via `tokio::process`.
///
/// Children are spawned with `kill_on_drop`, so cancellation and timeouts
/// reap the process when the in-flight future is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        ctx: &OpCtx,
        binary: &str,
        args: &[&str],
    ) -> Result<CmdOutput, RunnerError> {
        if self.look_path(binary).is_none() {
            return Err(RunnerError::NotFound(binary.to_string()));
        }
        if ctx.is_canceled() {
            return Err(RunnerError::Canceled);
        }

        let mut cmd = Command::new(binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(binary, ?args, "running command");

        let timeout = ctx.remaining();
        let output = tokio::select! {
            _ = ctx.canceled() => return Err(RunnerError::Canceled),
            result = run_with_deadline(&mut cmd, timeout) => result,
        };

        match output {
            Ok(Some(out)) => {
                let code = out.status.code().unwrap_or(-1);
                if code != 0 {
                    tracing::debug!(binary, code, "command exited non-zero");
                }
                Ok(CmdOutput {
                    stdout: out.stdout,
                    stderr: out.stderr,
                    code,
                })
            }
            Ok(None) => Err(RunnerError::Timeout {
                binary: binary.to_string(),
                timeout: timeout.unwrap_or_default(),
            }),
            Err(e) => Err(RunnerError::StartFailed {
                binary: binary.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn look_path(&self, binary: &str) -> Option<PathBuf> {
        // Absolute or relative paths bypass the PATH search.
        if binary.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(binary);
            return is_executable(&path).then_some(path);
        }
        let paths = std::env::var_os("PATH")?;
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(binary);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

async fn run_with_deadline(
    cmd: &mut Command,
    timeout: Option<Duration>,
) -> std::io::Result<Option<std::process::Output>> {
    match timeout {
        Some(t) => match tokio::time::timeout(t, cmd.output()).await {
            Ok(result) => result.map(Some),
            Err(_elapsed) => Ok(None),
        },
        None => cmd.output().await.map(Some),
    }
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
