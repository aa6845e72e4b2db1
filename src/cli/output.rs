//! Colored terminal output for build progress.

use colored::Colorize;

/// Console output manager for user-facing build progress.
///
/// Progress and diagnostics go to stderr so stdout stays clean for streamed
/// tool output (container logs, pyinstaller).
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Prints a section header.
    pub fn section(&self, title: &str) {
        eprintln!();
        eprintln!("{}", title.bold());
    }

    /// Prints a progress step.
    pub fn progress(&self, message: &str) {
        eprintln!("{} {}", "→".blue(), message);
    }

    /// Prints a success message.
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Prints a warning message.
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow(), message);
    }

    /// Prints indented detail output (streamed tool lines, artifact info).
    pub fn indent(&self, message: &str) {
        println!("   {message}");
    }

    /// Whether verbose detail output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Prints a message only in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.is_verbose() {
            eprintln!("   {}", message.dimmed());
        }
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(false)
    }
}
