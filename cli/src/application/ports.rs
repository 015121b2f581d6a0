//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`
//! or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::ProvisionConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// No timeout is applied: external tools may run for as long as they need.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    /// A non-zero exit is NOT an error; it is reported in `Output::status`.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program in the foreground with inherited stdio and return only
    /// its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Host Filesystem Port ──────────────────────────────────────────────────────

/// Abstracts the existence checks, listings, and working-directory change the
/// pipeline needs from the host.
pub trait HostFs {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Names of the directories directly under `dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<String>>;

    /// Names of every entry directly under `dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read.
    fn list_entries(&self, dir: &Path) -> Result<Vec<String>>;

    /// Make `dir` the process working directory and return its absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be entered.
    fn enter_dir(&self, dir: &Path) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit a section banner announcing the next phase.
    fn banner(&self, message: &str);
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Echo captured command output verbatim.
    fn output(&self, text: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit an informational notice.
    fn info(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message. Never suppressed.
    fn error(&self, message: &str);
    /// Emit a titled diagnostics listing, one name per line. Never suppressed.
    fn listing(&self, title: &str, names: &[String]);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the provisioning plan.
pub trait ConfigStore {
    /// Load and validate the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be read, parsed, or validated.
    fn load(&self) -> Result<ProvisionConfig>;
}
