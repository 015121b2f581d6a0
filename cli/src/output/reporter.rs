//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Errors and diagnostics listings go to stderr and ignore `quiet`;
/// everything else goes to stdout and is suppressed by it.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn banner(&self, message: &str) {
        self.ctx.banner(message);
    }

    fn step(&self, message: &str) {
        self.ctx.step(message);
    }

    fn output(&self, text: &str) {
        self.ctx.raw(text);
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn info(&self, message: &str) {
        self.ctx.info(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        self.ctx.error(message);
    }

    fn listing(&self, title: &str, names: &[String]) {
        self.ctx.listing(title, names);
    }
}
