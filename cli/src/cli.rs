//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::AppContext;
use crate::application::services::provision::ProvisionOutcome;
use crate::output::OutputContext;

/// Provision this host and launch the course platform development server
///
/// Installs system packages, clones the application repository, prepares a
/// Python virtual environment, runs optional setup scripts, and starts the
/// server in the foreground. Run with no arguments to use the built-in plan.
#[derive(Parser)]
#[command(name = "course-provision", version)]
pub struct Cli {
    /// YAML file overriding parts of the built-in plan
    #[arg(long, value_name = "PATH", env = "COURSE_PROVISION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Execute the provisioning run.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be loaded or any fail-fast step,
    /// precondition, or cancellation ends the run.
    pub async fn run(self, output: &OutputContext) -> Result<()> {
        let app = AppContext::new(output, self.config)?;
        let ProvisionOutcome::ServerStopped { app_dir } = app.provision().await?;
        tracing::debug!(app_dir = %app_dir.display(), "provisioning run finished");
        Ok(())
    }
}
