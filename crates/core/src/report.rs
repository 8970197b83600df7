// SPDX-License-Identifier: MIT

//! Output sink consumed by the engine
//!
//! The core never writes to stdout. Progress and results flow through a
//! [`Reporter`], implemented by the CLI for terminals and by a recording
//! fake in tests. Implementations must tolerate concurrent calls and must
//! not block.

use crate::OperationResult;

/// Sink for user-facing progress output.
pub trait Reporter: Send + Sync {
    /// Write without a trailing newline.
    fn printf(&self, msg: &str);

    /// Write a full line.
    fn println(&self, msg: &str);

    /// A new stage of the run began ("Reconciling packages", ...).
    fn stage_update(&self, stage: &str);

    /// Item `current` of `total` is being processed ("installing jq").
    fn progress_update(&self, current: usize, total: usize, verb: &str, name: &str);

    /// An item reached a terminal status.
    fn item_result(&self, result: &OperationResult);
}

/// Discards everything. Useful for JSON output modes and tests that do not
/// assert on progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn printf(&self, _msg: &str) {}
    fn println(&self, _msg: &str) {}
    fn stage_update(&self, _stage: &str) {}
    fn progress_update(&self, _current: usize, _total: usize, _verb: &str, _name: &str) {}
    fn item_result(&self, _result: &OperationResult) {}
}
