// SPDX-License-Identifier: MIT

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{ActualItem, ConfiguredItem, OperationResult, Reporter};
use parking_lot::Mutex;
use std::sync::Arc;

// ── Item factory functions ──────────────────────────────────────────────────

pub fn configured_package(manager: &str, name: &str) -> ConfiguredItem {
    ConfiguredItem::package(manager, name)
}

pub fn actual_package(manager: &str, name: &str) -> ActualItem {
    ActualItem::package(manager, name)
}

pub fn configured_dotfile(name: &str, dest: &str) -> ConfiguredItem {
    ConfiguredItem::dotfile(name, dest)
}

pub fn actual_dotfile(name: &str, dest: &str) -> ActualItem {
    ActualItem::dotfile(name, dest)
}

// ── Recording reporter ──────────────────────────────────────────────────────

/// One recorded reporter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Printf(String),
    Println(String),
    Stage(String),
    Progress {
        current: usize,
        total: usize,
        verb: String,
        name: String,
    },
    Item(OperationResult),
}

/// Reporter that records every call for later assertions.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().clone()
    }

    /// Recorded stage names, in order.
    pub fn stages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Stage(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded item results, in order.
    pub fn item_results(&self) -> Vec<OperationResult> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Item(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn printf(&self, msg: &str) {
        self.events.lock().push(ReportEvent::Printf(msg.to_string()));
    }

    fn println(&self, msg: &str) {
        self.events.lock().push(ReportEvent::Println(msg.to_string()));
    }

    fn stage_update(&self, stage: &str) {
        self.events.lock().push(ReportEvent::Stage(stage.to_string()));
    }

    fn progress_update(&self, current: usize, total: usize, verb: &str, name: &str) {
        self.events.lock().push(ReportEvent::Progress {
            current,
            total,
            verb: verb.to_string(),
            name: name.to_string(),
        });
    }

    fn item_result(&self, result: &OperationResult) {
        self.events.lock().push(ReportEvent::Item(result.clone()));
    }
}
