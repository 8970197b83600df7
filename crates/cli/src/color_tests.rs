// SPDX-License-Identifier: MIT

use super::*;
use rig_core::ItemState;

#[test]
fn paint_wraps_with_reset_when_colorized() {
    let painted = paint(codes::OK, "done", true);
    assert!(painted.starts_with("\x1b[38;5;"));
    assert!(painted.ends_with("\x1b[0m"));
    assert!(painted.contains("done"));
}

#[test]
fn paint_passes_through_uncolored() {
    assert_eq!(paint(codes::OK, "done", false), "done");
}

#[test]
fn state_glyphs_are_distinct() {
    let glyphs: Vec<String> = [
        ItemState::Managed,
        ItemState::Missing,
        ItemState::Degraded,
        ItemState::Untracked,
    ]
    .iter()
    .map(|s| state_glyph(*s, false))
    .collect();
    assert_eq!(glyphs, ["✓", "✗", "~", "?"]);
}
