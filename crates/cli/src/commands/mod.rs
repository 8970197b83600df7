// SPDX-License-Identifier: MIT

//! CLI subcommand implementations

pub mod apply;
pub mod info;
pub mod install;
pub mod managers;
pub mod search;
pub mod status;
pub mod uninstall;
pub mod upgrade;
