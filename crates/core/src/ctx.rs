// SPDX-License-Identifier: MIT

//! Cancellation and deadline context threaded through long-running operations

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Carries a cancellation token plus an optional deadline.
///
/// Every adapter call and file operation takes an `OpCtx`. Cancelling a
/// parent cancels all contexts derived from it; deadlines only ever shrink
/// when deriving.
#[derive(Debug, Clone, Default)]
pub struct OpCtx {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OpCtx {
    /// A context with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Derive a child context whose deadline is the sooner of the parent's
    /// and `timeout` from now. Cancelling the parent cancels the child.
    pub fn child(&self, timeout: Duration) -> Self {
        let child_deadline = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(d) => Some(d.min(child_deadline)),
            None => Some(child_deadline),
        };
        Self {
            cancel: self.cancel.child_token(),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when this context (or an ancestor) is canceled.
    pub async fn canceled(&self) {
        self.cancel.cancelled().await;
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Time left before the deadline. `None` means unbounded; an expired
    /// deadline yields `Some(Duration::ZERO)`.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() == Some(Duration::ZERO)
    }
}

#[cfg(test)]
#[path = "ctx_tests.rs"]
mod tests;
