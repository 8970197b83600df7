// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! On-disk state for rig: the lock file and the managed dotfile tree

mod dotfiles;
mod lock;

pub use dotfiles::{DotfileScanner, ScanError};
pub use lock::{Lock, LockError, LockStore, ResourceEntry, LOCK_VERSION};
