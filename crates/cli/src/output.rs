// SPDX-License-Identifier: MIT

//! Rendering for summaries and status reports

use crate::color;
use clap::ValueEnum;
use rig_core::{ApplySummary, Item, Reconciliation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render the end-of-run summary line(s).
pub fn render_summary(summary: &ApplySummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let t = summary.totals();
            let mut parts = Vec::new();
            for (count, label) in [
                (t.installed, "installed"),
                (t.deployed, "deployed"),
                (t.removed, "removed"),
                (t.would_install, "would install"),
                (t.would_deploy, "would deploy"),
                (t.failed, "failed"),
                (t.canceled, "canceled"),
                (t.unchanged, "unchanged"),
                (t.reported, "untracked"),
            ] {
                if count > 0 {
                    parts.push(format!("{count} {label}"));
                }
            }
            if parts.is_empty() {
                parts.push("nothing to do".to_string());
            }
            println!(
                "\n{} ({} ms)",
                parts.join(", "),
                summary.duration_ms
            );
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "dry_run": summary.dry_run,
                "duration_ms": summary.duration_ms,
                "totals": summary.totals(),
                "per_manager": summary.per_manager(),
                "results": summary.results,
            });
            print_json(&value);
        }
    }
}

/// Render tri-state status reports.
pub fn render_status(reports: &[Reconciliation], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let colorize = color::should_colorize();
            for report in reports {
                if report.total() == 0 {
                    continue;
                }
                for item in report
                    .managed
                    .iter()
                    .chain(&report.missing)
                    .chain(&report.untracked)
                {
                    println!("{} {}", color::state_glyph(item.state, colorize), item_label(item));
                }
            }
            let (managed, missing, untracked, degraded) = totals(reports);
            println!(
                "\n{managed} managed, {missing} missing, {degraded} drifted, {untracked} untracked"
            );
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "managed": reports.iter().flat_map(|r| &r.managed).collect::<Vec<_>>(),
                "missing": reports.iter().flat_map(|r| &r.missing).collect::<Vec<_>>(),
                "untracked": reports.iter().flat_map(|r| &r.untracked).collect::<Vec<_>>(),
            });
            print_json(&value);
        }
    }
}

fn item_label(item: &Item) -> String {
    if item.manager.is_empty() {
        item.name.clone()
    } else {
        format!("{}:{}", item.manager, item.name)
    }
}

fn totals(reports: &[Reconciliation]) -> (usize, usize, usize, usize) {
    let mut managed = 0;
    let mut missing = 0;
    let mut untracked = 0;
    let mut degraded = 0;
    for r in reports {
        degraded += r.degraded_count();
        managed += r.managed.len() - r.degraded_count();
        missing += r.missing.len();
        untracked += r.untracked.len();
    }
    (managed, missing, untracked, degraded)
}

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Error: cannot serialize output: {e}"),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
