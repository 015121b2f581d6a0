//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`. All error types implement
//! `thiserror::Error` and convert to `anyhow::Error` via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Conditions that end a provisioning run.
///
/// Everything except `Cancelled` maps to exit status 1.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Error running command: {command} (exit code {exit_code})")]
    StepFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Virtual environment not created properly: {} does not exist", path.display())]
    RuntimeMissing { path: PathBuf },

    #[error("Could not find application directory (looked for: {})", candidates.join(", "))]
    AppDirMissing {
        candidates: Vec<String>,
        available: Vec<String>,
    },

    #[error("{entry_point} not found in {}", dir.display())]
    EntryPointMissing {
        entry_point: String,
        dir: PathBuf,
        contents: Vec<String>,
    },

    #[error("Setup interrupted by user")]
    Cancelled,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while validating a provisioning plan.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid config: app.candidates must list at least one directory")]
    NoCandidates,

    #[error("Invalid config: app.port must be between 1 and 65535")]
    InvalidPort,
}

// ── Exit status translation ───────────────────────────────────────────────────

/// Exit status for a run that ended with `err`.
///
/// Operator cancellation is a clean exit; every other error, typed or not,
/// is a failure.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::Cancelled) => 0,
        _ => 1,
    }
}

/// Returns `true` when `err` is one of the anticipated provisioning outcomes.
#[must_use]
pub fn is_anticipated(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ProvisionError>().is_some() || err.downcast_ref::<ConfigError>().is_some()
}
