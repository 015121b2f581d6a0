//! Step value types: a single external-command invocation, its fail policy,
//! and the captured result.
//!
//! Pure data only; nothing here spawns a process.

use std::fmt;

/// What happens to the run when a step exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPolicy {
    /// A non-zero exit halts the whole run.
    FailFast,
    /// A non-zero exit is logged and the run continues.
    BestEffort,
}

/// One external-command invocation plus its fail policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
    pub policy: FailPolicy,
}

impl Step {
    /// A step whose failure halts the run.
    #[must_use]
    pub fn fail_fast(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            policy: FailPolicy::FailFast,
        }
    }

    /// A step whose failure is only logged.
    #[must_use]
    pub fn best_effort(program: impl Into<String>) -> Self {
        Self {
            policy: FailPolicy::BestEffort,
            ..Self::fail_fast(program)
        }
    }

    /// A fail-fast step run through `privilege` (e.g. `sudo`).
    ///
    /// An empty `privilege` runs `program` directly.
    #[must_use]
    pub fn elevated(privilege: &str, program: impl Into<String>) -> Self {
        let privilege = privilege.trim();
        if privilege.is_empty() {
            Self::fail_fast(program)
        } else {
            Self::fail_fast(privilege).arg(program)
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Borrowed argument list, in the shape `CommandRunner` expects.
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    /// The command as a single display line: `program arg1 arg2 ...`.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured outcome of a finished step.
///
/// Produced once per step, consumed for logging and the continue/halt
/// decision, then dropped. A process terminated by a signal reports
/// `exit_code == -1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl StepResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
