// SPDX-License-Identifier: MIT

//! Silent exit-code carrier
//!
//! Commands that already printed their own failure report return this so
//! `main` exits non-zero without an extra "Error:" line.

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
}

impl ExitError {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

impl std::fmt::Display for ExitError {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Intentionally empty: the report was already rendered.
        Ok(())
    }
}

impl std::error::Error for ExitError {}
