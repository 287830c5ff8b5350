//! CLI theme and styling.

use colored::Colorize;

/// Terminal styling for messages printed next to reports.
pub(crate) struct Theme;

impl Theme {
    /// Approval verdict for stderr.
    pub(crate) fn verdict(authorized: bool) -> String {
        if authorized {
            format!("{} {}", "✓".green(), "APPROVED".bold().green())
        } else {
            format!("{} {}", "✗".yellow(), "NOT APPROVED".bold().yellow())
        }
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text.dimmed())
    }
}
