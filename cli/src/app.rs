//! Application context — everything a run needs, built once from CLI flags.
//!
//! `AppContext` bundles the output context, the production adapters, the
//! loaded plan, and the root directory so the pipeline receives them as
//! explicit values.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::provision::{ProvisionOptions, ProvisionOutcome, provision};
use crate::domain::ProvisionConfig;
use crate::infra::{LocalHostFs, TokioCommandRunner, YamlConfigStore};
use crate::output::{OutputContext, TerminalReporter};

/// Unified application context for a provisioning run.
pub struct AppContext<'a> {
    /// Terminal output context (colors, quiet mode).
    pub output: &'a OutputContext,
    /// Process runner for every external command.
    pub runner: TokioCommandRunner,
    /// Host filesystem adapter.
    pub fs: LocalHostFs,
    /// The validated plan.
    pub config: ProvisionConfig,
    /// Directory the run started in; every plan path resolves against it.
    pub root: PathBuf,
}

impl<'a> AppContext<'a> {
    /// Load the plan and capture the starting directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be loaded or validated, or if the
    /// current directory cannot be determined.
    pub fn new(output: &'a OutputContext, config_path: Option<PathBuf>) -> Result<Self> {
        let config = YamlConfigStore::new(config_path).load()?;
        let root = std::env::current_dir().context("cannot determine current directory")?;
        Ok(Self {
            output,
            runner: TokioCommandRunner,
            fs: LocalHostFs,
            config,
            root,
        })
    }

    /// Returns a progress reporter writing to this context's terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(self.output)
    }

    /// Run the full pipeline with the production adapters.
    ///
    /// # Errors
    ///
    /// Propagates every pipeline error unchanged.
    pub async fn provision(&self) -> Result<ProvisionOutcome> {
        let reporter = self.reporter();
        provision(
            &self.runner,
            &self.fs,
            ProvisionOptions {
                reporter: &reporter,
                root: &self.root,
                config: &self.config,
            },
        )
        .await
    }
}
