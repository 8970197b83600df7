// SPDX-License-Identifier: MIT

//! Terminal reporter
//!
//! Implements the engine's output sink. Calls may arrive from concurrent
//! tasks; a mutex serializes writes so lines never interleave.

use crate::color::{self, codes};
use parking_lot::Mutex;
use rig_core::{ItemStatus, OperationResult, Reporter};
use std::io::Write;

pub struct TerminalReporter {
    stdout: Mutex<std::io::Stdout>,
    colorize: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(std::io::stdout()),
            colorize: color::should_colorize(),
        }
    }

    fn write_line(&self, line: &str) {
        let mut out = self.stdout.lock();
        let _ = writeln!(out, "{line}");
    }

    fn status_code(status: ItemStatus) -> u8 {
        match status {
            ItemStatus::Installed
            | ItemStatus::Deployed
            | ItemStatus::Removed
            | ItemStatus::Unchanged => codes::OK,
            ItemStatus::Failed | ItemStatus::Canceled => codes::FAIL,
            ItemStatus::InstalledLockFailed => codes::WARN,
            ItemStatus::WouldInstall | ItemStatus::WouldRemove | ItemStatus::WouldDeploy => {
                codes::CONTEXT
            }
            ItemStatus::Reported => codes::MUTED,
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn printf(&self, msg: &str) {
        let mut out = self.stdout.lock();
        let _ = write!(out, "{msg}");
        let _ = out.flush();
    }

    fn println(&self, msg: &str) {
        self.write_line(msg);
    }

    fn stage_update(&self, stage: &str) {
        self.write_line(&color::paint(codes::HEADER, stage, self.colorize));
    }

    fn progress_update(&self, current: usize, total: usize, verb: &str, name: &str) {
        self.write_line(&format!(
            "{} {verb} {name}",
            color::paint(codes::CONTEXT, &format!("[{current}/{total}]"), self.colorize),
        ));
    }

    fn item_result(&self, result: &OperationResult) {
        let label = match &result.manager {
            Some(manager) => format!("{manager}:{}", result.name),
            None => result.name.clone(),
        };
        let status = color::paint(
            Self::status_code(result.status),
            result.status.as_str(),
            self.colorize,
        );
        match &result.error {
            Some(error) => {
                self.write_line(&format!("  {label}: {status} ({error})"));
                if let Some(suggestion) = &result.suggestion {
                    self.write_line(&format!(
                        "    {}",
                        color::paint(codes::CONTEXT, &format!("hint: {suggestion}"), self.colorize)
                    ));
                }
            }
            None => self.write_line(&format!("  {label}: {status}")),
        }
    }
}
