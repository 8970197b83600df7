// SPDX-License-Identifier: MIT

//! Fake command runner for tests

use super::{command_line, CmdOutput, CommandRunner, RunnerError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_core::OpCtx;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Canned response for one command line.
#[derive(Debug, Clone, Default)]
pub struct FakeResponse {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

impl FakeResponse {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    pub fn fail(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            code,
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct FakeState {
    responses: HashMap<String, FakeResponse>,
    binaries: HashMap<String, PathBuf>,
    calls: Vec<String>,
}

/// In-memory runner keyed by the reconstructed command line
/// (`"brew install jq"`). Unmatched commands succeed with empty output.
#[derive(Clone, Default)]
pub struct FakeRunner {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binary so `look_path` resolves it.
    pub fn with_binary(self, binary: &str) -> Self {
        self.add_binary(binary);
        self
    }

    pub fn add_binary(&self, binary: &str) {
        self.state
            .lock()
            .binaries
            .insert(binary.to_string(), PathBuf::from(format!("/usr/bin/{binary}")));
    }

    pub fn remove_binary(&self, binary: &str) {
        self.state.lock().binaries.remove(binary);
    }

    /// Canned response for an exact command line.
    pub fn respond(&self, cmdline: &str, response: FakeResponse) {
        self.state
            .lock()
            .responses
            .insert(cmdline.to_string(), response);
    }

    pub fn respond_ok(&self, cmdline: &str, stdout: impl Into<String>) {
        self.respond(cmdline, FakeResponse::ok(stdout));
    }

    pub fn respond_fail(&self, cmdline: &str, code: i32, stderr: impl Into<String>) {
        self.respond(cmdline, FakeResponse::fail(code, stderr));
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Command lines containing `needle`.
    pub fn calls_matching(&self, needle: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(needle))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        ctx: &OpCtx,
        binary: &str,
        args: &[&str],
    ) -> Result<CmdOutput, RunnerError> {
        if ctx.is_canceled() {
            return Err(RunnerError::Canceled);
        }
        let line = command_line(binary, args);
        let mut state = self.state.lock();
        if !state.binaries.contains_key(binary) {
            return Err(RunnerError::NotFound(binary.to_string()));
        }
        state.calls.push(line.clone());
        let response = state.responses.get(&line).cloned().unwrap_or_default();
        Ok(CmdOutput {
            stdout: response.stdout.into_bytes(),
            stderr: response.stderr.into_bytes(),
            code: response.code,
        })
    }

    fn look_path(&self, binary: &str) -> Option<PathBuf> {
        self.state.lock().binaries.get(binary).cloned()
    }
}
