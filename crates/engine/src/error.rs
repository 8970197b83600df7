// SPDX-License-Identifier: MIT

//! Engine error types

use thiserror::Error;

/// Structural errors that abort a whole run. Per-item failures never take
/// this form; they are captured in the item's `OperationResult`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Cycle(#[from] rig_adapters::ResolveError),

    #[error(transparent)]
    Lock(#[from] rig_storage::LockError),

    #[error(transparent)]
    Scan(#[from] rig_storage::ScanError),

    #[error("config error: {0}")]
    Config(String),
}
