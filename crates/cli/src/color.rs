// SPDX-License-Identifier: MIT

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Managed / success: soft green
    pub const OK: u8 = 108;
    /// Missing / failure: soft red
    pub const FAIL: u8 = 174;
    /// Degraded / warning: sand
    pub const WARN: u8 = 179;
    /// Untracked / muted: darker grey
    pub const MUTED: u8 = 240;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    if crate::env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    Styles::styled()
        .usage(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

/// Wrap `text` in a 256-color code when colorization is on.
pub fn paint(code: u8, text: &str, colorize: bool) -> String {
    if colorize {
        format!("{}{text}{RESET}", fg256(code))
    } else {
        text.to_string()
    }
}

/// Status glyph + color for one reconciliation state.
pub fn state_glyph(state: rig_core::ItemState, colorize: bool) -> String {
    use rig_core::ItemState;
    match state {
        ItemState::Managed => paint(codes::OK, "✓", colorize),
        ItemState::Missing => paint(codes::FAIL, "✗", colorize),
        ItemState::Degraded => paint(codes::WARN, "~", colorize),
        ItemState::Untracked => paint(codes::MUTED, "?", colorize),
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
