//! Recording test doubles for the application ports.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use course_provision::application::ports::{CommandRunner, HostFs, ProgressReporter};

use crate::helpers::{err_output, exit_status, ok_output, signal_status, SIGINT};

pub const ROOT: &str = "/srv/provision";

pub fn root() -> PathBuf {
    PathBuf::from(ROOT)
}

pub fn at(rel: &str) -> PathBuf {
    root().join(rel)
}

// ── Mock: recording command runner ───────────────────────────────────────────

/// Records every invocation as `[program, args...]` and answers with canned
/// results chosen by substring match on the command line.
pub struct RecordingRunner {
    captured: Mutex<Vec<Vec<String>>>,
    foreground: Mutex<Vec<Vec<String>>>,
    failures: Vec<(String, i32)>,
    interrupts: Vec<String>,
    spawn_errors: Vec<String>,
    server_status: ExitStatus,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            captured: Mutex::new(Vec::new()),
            foreground: Mutex::new(Vec::new()),
            failures: Vec::new(),
            interrupts: Vec::new(),
            spawn_errors: Vec::new(),
            server_status: exit_status(0),
        }
    }

    /// Commands containing `needle` exit with `code`.
    pub fn failing(mut self, needle: &str, code: i32) -> Self {
        self.failures.push((needle.to_owned(), code));
        self
    }

    /// Commands containing `needle` are killed by SIGINT.
    pub fn interrupting(mut self, needle: &str) -> Self {
        self.interrupts.push(needle.to_owned());
        self
    }

    /// Commands containing `needle` cannot be spawned.
    pub fn unspawnable(mut self, needle: &str) -> Self {
        self.spawn_errors.push(needle.to_owned());
        self
    }

    /// Exit status of the foreground process.
    pub fn server_exit(mut self, status: ExitStatus) -> Self {
        self.server_status = status;
        self
    }

    /// Captured command lines, in call order.
    pub fn captured(&self) -> Vec<String> {
        self.captured
            .lock()
            .expect("lock")
            .iter()
            .map(|c| c.join(" "))
            .collect()
    }

    /// Captured invocations as `[program, args...]`.
    pub fn captured_argv(&self) -> Vec<Vec<String>> {
        self.captured.lock().expect("lock").clone()
    }

    /// Foreground invocations as `[program, args...]`.
    pub fn foreground(&self) -> Vec<Vec<String>> {
        self.foreground.lock().expect("lock").clone()
    }

    fn argv(program: &str, args: &[&str]) -> Vec<String> {
        std::iter::once(program)
            .chain(args.iter().copied())
            .map(str::to_owned)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let argv = Self::argv(program, args);
        let line = argv.join(" ");
        self.captured.lock().expect("lock").push(argv);

        if self.spawn_errors.iter().any(|n| line.contains(n.as_str())) {
            anyhow::bail!("failed to spawn {program}");
        }
        if self.interrupts.iter().any(|n| line.contains(n.as_str())) {
            return Ok(Output {
                status: signal_status(SIGINT),
                stdout: Vec::new(),
                stderr: Vec::new(),
            });
        }
        if let Some((_, code)) = self.failures.iter().find(|(n, _)| line.contains(n.as_str())) {
            return Ok(err_output(*code, b"simulated failure"));
        }
        Ok(ok_output(b""))
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.foreground
            .lock()
            .expect("lock")
            .push(Self::argv(program, args));
        Ok(self.server_status)
    }
}

// ── Mock: in-memory host filesystem ──────────────────────────────────────────

/// Host filesystem made of explicitly declared directories and files.
///
/// Parents are NOT implied: declare every path the test relies on.
pub struct FakeFs {
    dirs: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
    entered: Mutex<Vec<PathBuf>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self {
            dirs: BTreeSet::new(),
            files: BTreeSet::new(),
            entered: Mutex::new(Vec::new()),
        }
    }

    /// Add a directory relative to `ROOT`.
    pub fn with_dir(mut self, rel: &str) -> Self {
        self.dirs.insert(at(rel));
        self
    }

    /// Add a file relative to `ROOT`.
    pub fn with_file(mut self, rel: &str) -> Self {
        self.files.insert(at(rel));
        self
    }

    /// A root holding a usable virtual environment.
    pub fn with_venv(self) -> Self {
        self.with_dir("venv").with_file("venv/bin/python")
    }

    /// A root holding the course platform checkout with its entry point.
    pub fn with_app(self) -> Self {
        self.with_dir("course_platform")
            .with_file("course_platform/manage.py")
    }

    pub fn entered(&self) -> Vec<PathBuf> {
        self.entered.lock().expect("lock").clone()
    }

    fn children<'a>(
        set: &'a BTreeSet<PathBuf>,
        dir: &'a Path,
    ) -> impl Iterator<Item = String> + 'a {
        set.iter()
            .filter(move |p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    }
}

impl HostFs for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<String>> {
        Ok(Self::children(&self.dirs, dir).collect())
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names: Vec<String> = Self::children(&self.dirs, dir)
            .chain(Self::children(&self.files, dir))
            .collect();
        names.sort();
        Ok(names)
    }

    fn enter_dir(&self, dir: &Path) -> Result<PathBuf> {
        self.entered.lock().expect("lock").push(dir.to_path_buf());
        Ok(dir.to_path_buf())
    }
}

// ── Mock: recording progress reporter ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Banner(String),
    Step(String),
    Output(String),
    Success(String),
    Info(String),
    Warn(String),
    Error(String),
    Listing(String, Vec<String>),
}

pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock").clone()
    }

    pub fn has(&self, event: &Event) -> bool {
        self.events().contains(event)
    }

    pub fn listings(&self) -> Vec<(String, Vec<String>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Listing(title, names) => Some((title, names)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().expect("lock").push(event);
    }
}

impl ProgressReporter for RecordingReporter {
    fn banner(&self, message: &str) {
        self.push(Event::Banner(message.to_owned()));
    }
    fn step(&self, message: &str) {
        self.push(Event::Step(message.to_owned()));
    }
    fn output(&self, text: &str) {
        self.push(Event::Output(text.to_owned()));
    }
    fn success(&self, message: &str) {
        self.push(Event::Success(message.to_owned()));
    }
    fn info(&self, message: &str) {
        self.push(Event::Info(message.to_owned()));
    }
    fn warn(&self, message: &str) {
        self.push(Event::Warn(message.to_owned()));
    }
    fn error(&self, message: &str) {
        self.push(Event::Error(message.to_owned()));
    }
    fn listing(&self, title: &str, names: &[String]) {
        self.push(Event::Listing(title.to_owned(), names.to_vec()));
    }
}
