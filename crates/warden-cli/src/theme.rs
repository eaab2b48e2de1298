//! Terminal styling for command output.

use colored::Colorize;

/// Styles shared by every command.
pub(crate) struct Theme;

impl Theme {
    /// Section title.
    pub(crate) fn header(text: &str) -> String {
        text.bold().cyan().to_string()
    }

    /// A check that passed or a path that was allowed.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {text}", "✓".green().bold())
    }

    /// A check that failed or a path that was refused.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red().bold(), text.red())
    }

    /// A neutral hint.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {text}", "·".blue())
    }

    /// Secondary detail.
    pub(crate) fn dimmed(text: &str) -> String {
        text.dimmed().to_string()
    }

    /// Rule under a header.
    pub(crate) fn separator() -> String {
        "─".repeat(60).dimmed().to_string()
    }
}
