// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig reconciliation and apply engine

mod dotfile;
mod error;
mod orchestrator;
mod package;
mod resource;

pub use dotfile::DotfileResource;
pub use error::EngineError;
pub use orchestrator::{Orchestrator, Scope};
pub use package::{MultiPackageResource, PackageResource};
pub use resource::Resource;
