//! course-provision — provision this host and launch the course platform

use std::panic::AssertUnwindSafe;
use std::process::ExitCode;

use clap::Parser;
use futures_util::FutureExt as _;
use tracing_subscriber::EnvFilter;

use course_provision::cli::Cli;
use course_provision::domain::error::{ProvisionError, exit_code_for, is_anticipated};
use course_provision::output::OutputContext;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "course_provision=debug"
    } else {
        "course_provision=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = OutputContext::new(cli.no_color, cli.quiet);

    // Dropping the pipeline on Ctrl+C kills the running child (kill_on_drop).
    let result = tokio::select! {
        finished = AssertUnwindSafe(cli.run(&output)).catch_unwind() => match finished {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("provisioning aborted by an internal panic")),
        },
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => Err(ProvisionError::Cancelled.into()),
            Err(e) => Err(anyhow::Error::new(e).context("cannot listen for Ctrl+C")),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&output, &err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn report(output: &OutputContext, err: &anyhow::Error) {
    tracing::debug!(error = ?err, "run ended");
    match err.downcast_ref::<ProvisionError>() {
        Some(ProvisionError::Cancelled) => output.info(&err.to_string()),
        _ if is_anticipated(err) => output.error(&format!("{err:#}")),
        _ => output.error(&format!("Unexpected error: {err:#}")),
    }
}
