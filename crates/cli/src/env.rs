// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// Resolve the managed tree root: RIG_DIR > XDG_CONFIG_HOME/rig > ~/.config/rig
pub fn rig_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("RIG_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("rig"));
        }
    }
    home_dir().map(|home| home.join(".config/rig"))
}

/// The deploy root: $HOME, with the dirs crate as fallback.
pub fn home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine the home directory"))
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    Ok(rig_dir()?.join("rig.yaml"))
}

pub fn lock_path() -> anyhow::Result<PathBuf> {
    Ok(rig_dir()?.join("rig.lock"))
}

/// The managed dotfile tree lives next to the config and lock.
pub fn dotfiles_dir() -> anyhow::Result<PathBuf> {
    Ok(rig_dir()?.join("dotfiles"))
}

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty())
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
