//! Output formatting module

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Width of the `=` rule drawn above and below a banner.
pub const BANNER_WIDTH: usize = 50;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self { styles, quiet }
    }

    /// Print a section banner between two `=` rules. Suppressed when `quiet`.
    pub fn banner(&self, msg: &str) {
        if !self.quiet {
            let rule = "=".repeat(BANNER_WIDTH);
            println!("\n{rule}\n{}\n{rule}", msg.style(self.styles.header));
        }
    }

    /// Print an in-progress message prefixed with `→`. Suppressed when `quiet`.
    pub fn step(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "→".style(self.styles.step));
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Echo captured command output, dimmed. Suppressed when `quiet`.
    pub fn raw(&self, text: &str) {
        if !self.quiet {
            println!("{}", text.trim_end().style(self.styles.dim));
        }
    }

    /// Print a titled listing to stderr, one name per line. Never suppressed.
    pub fn listing(&self, title: &str, names: &[String]) {
        eprintln!("{title}");
        for name in names {
            eprintln!("  {name}");
        }
    }
}
