//! Application service — host provisioning use-case.
//!
//! Runs the fixed step sequence: package index, system packages, repository,
//! runtime environment, libraries, setup scripts, application directory,
//! migrations and static files, then the foreground server.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits. The root directory and
//! the discovered runtime paths are threaded through as values.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostFs, ProgressReporter};
use crate::domain::{FailPolicy, ProvisionConfig, ProvisionError, Step, StepResult};

/// Inputs shared by every step of a run.
pub struct ProvisionOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    /// Directory every relative path in the plan resolves against.
    pub root: &'a Path,
    pub config: &'a ProvisionConfig,
}

/// Paths inside the isolated runtime environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub dir: PathBuf,
    pub python: PathBuf,
    pub pip: PathBuf,
}

impl RuntimeEnv {
    /// Layout of a POSIX virtual environment rooted at `dir`.
    #[must_use]
    pub fn at(dir: PathBuf) -> Self {
        let bin = dir.join("bin");
        Self {
            python: bin.join("python"),
            pip: bin.join("pip"),
            dir,
        }
    }
}

/// Outcome of a run that was neither cancelled nor failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The foreground server exited on its own with status 0.
    ServerStopped { app_dir: PathBuf },
}

/// Provision the host and run the application server in the foreground.
///
/// # Errors
///
/// Returns `ProvisionError` for fail-fast step failures, missing
/// preconditions, and operator cancellation. Spawn failures and other
/// I/O faults are returned as untyped errors.
pub async fn provision(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    opts: ProvisionOptions<'_, impl ProgressReporter>,
) -> Result<ProvisionOutcome> {
    let ProvisionOptions {
        reporter,
        root,
        config,
    } = opts;

    reporter.banner("Starting Django Course Platform setup...");

    reporter.banner("Updating system packages...");
    refresh_package_index(runner, reporter, config).await?;

    reporter.banner("Installing system dependencies...");
    install_system_packages(runner, reporter, config).await?;

    reporter.banner("Cloning course platform repository...");
    ensure_repository(runner, fs, reporter, root, config).await?;

    reporter.banner("Setting up Python virtual environment...");
    let env = ensure_runtime_env(runner, fs, reporter, root, config).await?;

    reporter.banner("Installing Python packages...");
    install_libraries(runner, reporter, &env, config).await?;

    reporter.banner("Running setup scripts...");
    run_setup_scripts(runner, fs, reporter, root, config).await?;

    reporter.banner("Changing to Django project directory...");
    let app_dir = locate_app_dir(fs, reporter, root, config)?;
    let app_dir = fs
        .enter_dir(&app_dir)
        .with_context(|| format!("changing to {}", app_dir.display()))?;
    reporter.info(&format!("Changed to directory: {}", app_dir.display()));

    launch_app(runner, fs, reporter, &env, &app_dir, config).await?;
    reporter.success(&format!("Server in {} stopped", app_dir.display()));
    Ok(ProvisionOutcome::ServerStopped { app_dir })
}

// ── Steps ─────────────────────────────────────────────────────────────────────

/// Step 1: refresh the package index.
///
/// # Errors
///
/// Fails fast on a non-zero exit.
pub async fn refresh_package_index(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    config: &ProvisionConfig,
) -> Result<()> {
    let step = Step::elevated(&config.system.privilege, &config.system.package_manager)
        .args(["update", "-y"]);
    run_step(runner, reporter, &step).await?;
    Ok(())
}

/// Step 2: install every system package in one installer call.
///
/// # Errors
///
/// Fails fast on a non-zero exit.
pub async fn install_system_packages(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    config: &ProvisionConfig,
) -> Result<()> {
    if config.system.packages.is_empty() {
        reporter.info("No system packages to install, skipping...");
        return Ok(());
    }
    let step = Step::elevated(&config.system.privilege, &config.system.package_manager)
        .args(["install", "-y"])
        .args(&config.system.packages);
    run_step(runner, reporter, &step).await?;
    Ok(())
}

/// Step 3: clone the repository unless its directory already exists.
///
/// # Errors
///
/// Fails fast if the clone exits non-zero.
pub async fn ensure_repository(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    reporter: &impl ProgressReporter,
    root: &Path,
    config: &ProvisionConfig,
) -> Result<()> {
    let target = root.join(&config.repository.dir);
    if fs.exists(&target) {
        reporter.info("Repository already exists, skipping clone...");
        return Ok(());
    }
    let step = Step::fail_fast(&config.repository.vcs)
        .arg("clone")
        .arg(&config.repository.url)
        .arg(path_arg(&target));
    run_step(runner, reporter, &step).await?;
    Ok(())
}

/// Steps 4 and 5: create the environment if absent, then require its
/// interpreter on disk.
///
/// # Errors
///
/// Fails fast if creation exits non-zero; returns
/// `ProvisionError::RuntimeMissing` if the interpreter is still absent.
pub async fn ensure_runtime_env(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    reporter: &impl ProgressReporter,
    root: &Path,
    config: &ProvisionConfig,
) -> Result<RuntimeEnv> {
    let env = RuntimeEnv::at(root.join(&config.runtime.env_dir));
    if fs.exists(&env.dir) {
        reporter.info("Virtual environment already exists, skipping creation...");
    } else {
        let step = Step::fail_fast(&config.runtime.interpreter)
            .args(["-m", "venv"])
            .arg(path_arg(&env.dir));
        run_step(runner, reporter, &step).await?;
    }

    if !fs.exists(&env.python) {
        return Err(ProvisionError::RuntimeMissing { path: env.python }.into());
    }
    Ok(env)
}

/// Step 6: upgrade the installer, then install each library on its own.
///
/// # Errors
///
/// Fails fast on the first non-zero exit.
pub async fn install_libraries(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    env: &RuntimeEnv,
    config: &ProvisionConfig,
) -> Result<()> {
    let pip = path_arg(&env.pip);
    let upgrade = Step::fail_fast(&pip).args(["install", "--upgrade", "pip"]);
    run_step(runner, reporter, &upgrade).await?;

    for library in &config.runtime.libraries {
        let step = Step::fail_fast(&pip).arg("install").arg(library);
        run_step(runner, reporter, &step).await?;
    }
    Ok(())
}

/// Step 7: run each setup script that is present; skip the rest.
///
/// # Errors
///
/// Fails fast if a present script exits non-zero.
pub async fn run_setup_scripts(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    reporter: &impl ProgressReporter,
    root: &Path,
    config: &ProvisionConfig,
) -> Result<()> {
    for script in &config.setup_scripts {
        let path = root.join(script);
        if fs.is_file(&path) {
            let step = Step::elevated(&config.system.privilege, "bash").arg(path_arg(&path));
            run_step(runner, reporter, &step).await?;
        } else {
            let name = path
                .file_name()
                .map_or_else(|| script.clone(), |n| n.to_string_lossy().into_owned());
            reporter.info(&format!("{name} not found, skipping..."));
        }
    }
    Ok(())
}

/// Step 8: first candidate directory that exists under `root`.
///
/// # Errors
///
/// Lists the directories actually present and returns
/// `ProvisionError::AppDirMissing` when no candidate exists.
pub fn locate_app_dir(
    fs: &impl HostFs,
    reporter: &impl ProgressReporter,
    root: &Path,
    config: &ProvisionConfig,
) -> Result<PathBuf> {
    if let Some(dir) = config
        .app
        .candidates
        .iter()
        .map(|name| root.join(name))
        .find(|path| fs.is_dir(path))
    {
        return Ok(dir);
    }

    let available = fs
        .list_dirs(root)
        .with_context(|| format!("listing {}", root.display()))?;
    reporter.warn("Could not find Django project directory");
    reporter.listing("Available directories:", &available);
    Err(ProvisionError::AppDirMissing {
        candidates: config.app.candidates.clone(),
        available,
    }
    .into())
}

/// Steps 10 and 11: migrate, collect static files, then serve in the
/// foreground. Migration and static collection are best-effort.
///
/// # Errors
///
/// Returns `ProvisionError::EntryPointMissing` when `app_dir` has no entry
/// point, `ProvisionError::Cancelled` when the server is interrupted, and
/// `ProvisionError::StepFailed` when it exits non-zero on its own.
pub async fn launch_app(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    reporter: &impl ProgressReporter,
    env: &RuntimeEnv,
    app_dir: &Path,
    config: &ProvisionConfig,
) -> Result<()> {
    let entry = app_dir.join(&config.app.entry_point);
    if !fs.is_file(&entry) {
        let contents = fs
            .list_entries(app_dir)
            .with_context(|| format!("listing {}", app_dir.display()))?;
        reporter.listing("Current directory contents:", &contents);
        return Err(ProvisionError::EntryPointMissing {
            entry_point: config.app.entry_point.clone(),
            dir: app_dir.to_path_buf(),
            contents,
        }
        .into());
    }

    reporter.banner("Running Django setup...");

    reporter.info("Running Django migrations...");
    let migrate = run_step(
        runner,
        reporter,
        &manage_step(env, &entry, FailPolicy::BestEffort, &["migrate", "--noinput"]),
    )
    .await?;
    if !migrate.success() {
        reporter.warn("Migration failed or not needed");
    }

    reporter.info("Collecting static files...");
    let collect = run_step(
        runner,
        reporter,
        &manage_step(env, &entry, FailPolicy::BestEffort, &["collectstatic", "--noinput"]),
    )
    .await?;
    if !collect.success() {
        reporter.warn("Static files collection failed or not needed");
    }

    reporter.banner("Setup complete! Starting development server...");
    reporter.info(&format!(
        "Access your application at: {}",
        config.app.local_url()
    ));
    reporter.info("Press Ctrl+C to stop the server");

    let bind = config.app.bind_address();
    let server = manage_step(env, &entry, FailPolicy::FailFast, &["runserver", bind.as_str()]);
    serve(runner, reporter, &server).await
}

// ── Step execution ────────────────────────────────────────────────────────────

/// Exit code recorded for a best-effort command that could not be spawned.
const SPAWN_FAILED_EXIT: i32 = 127;

/// Run one captured step and apply its fail policy.
///
/// Captured stdout is echoed. A best-effort failure is logged and returned
/// as a normal result so the caller can react to it. A best-effort command
/// that cannot be spawned yields a failed result with exit code 127.
///
/// # Errors
///
/// Returns `ProvisionError::StepFailed` for a fail-fast non-zero exit,
/// `ProvisionError::Cancelled` when the command was interrupted, and an
/// untyped error when a fail-fast command could not be spawned.
pub async fn run_step(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    step: &Step,
) -> Result<StepResult> {
    let command = step.command_line();
    reporter.step(&format!("Running: {command}"));
    tracing::debug!(%command, policy = ?step.policy, "running step");

    let output = match runner.run(&step.program, &step.arg_refs()).await {
        Ok(output) => output,
        Err(err) if step.policy == FailPolicy::BestEffort => {
            let stderr = format!("{err:#}");
            tracing::warn!(%command, error = %stderr, "best-effort step could not start, continuing");
            return Ok(StepResult {
                command,
                exit_code: SPAWN_FAILED_EXIT,
                stdout: String::new(),
                stderr,
            });
        }
        Err(err) => return Err(err.context(format!("running {command}"))),
    };
    if was_interrupted(output.status) {
        return Err(ProvisionError::Cancelled.into());
    }

    let result = StepResult {
        command,
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.stdout.trim().is_empty() {
        reporter.output(&result.stdout);
    }
    tracing::debug!(command = %result.command, exit_code = result.exit_code, "step finished");

    if result.success() {
        return Ok(result);
    }
    match step.policy {
        FailPolicy::FailFast => {
            if !result.stderr.trim().is_empty() {
                reporter.error(&format!("Error output: {}", result.stderr.trim_end()));
            }
            Err(ProvisionError::StepFailed {
                command: result.command,
                exit_code: result.exit_code,
                stderr: result.stderr,
            }
            .into())
        }
        FailPolicy::BestEffort => {
            tracing::warn!(
                command = %result.command,
                exit_code = result.exit_code,
                "best-effort step failed, continuing"
            );
            Ok(result)
        }
    }
}

/// Run the long-lived foreground step with the terminal attached.
///
/// # Errors
///
/// Returns `ProvisionError::Cancelled` if the process was interrupted and
/// `ProvisionError::StepFailed` if it exited non-zero.
pub async fn serve(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    step: &Step,
) -> Result<()> {
    let command = step.command_line();
    reporter.step(&format!("Running: {command}"));
    tracing::debug!(%command, "starting foreground process");

    let status = runner
        .run_status(&step.program, &step.arg_refs())
        .await
        .with_context(|| format!("running {command}"))?;
    if was_interrupted(status) {
        return Err(ProvisionError::Cancelled.into());
    }
    if !status.success() {
        return Err(ProvisionError::StepFailed {
            command,
            exit_code: status.code().unwrap_or(-1),
            stderr: String::new(),
        }
        .into());
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `<env python> <entry point> <args...>`.
fn manage_step(env: &RuntimeEnv, entry: &Path, policy: FailPolicy, args: &[&str]) -> Step {
    Step {
        program: path_arg(&env.python),
        args: std::iter::once(path_arg(entry))
            .chain(args.iter().map(|a| (*a).to_string()))
            .collect(),
        policy,
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Whether the process was terminated by SIGINT or SIGTERM.
#[cfg(unix)]
fn was_interrupted(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;

    const SIGINT: i32 = 2;
    const SIGTERM: i32 = 15;
    matches!(status.signal(), Some(SIGINT | SIGTERM))
}

#[cfg(not(unix))]
fn was_interrupted(_status: ExitStatus) -> bool {
    false
}
