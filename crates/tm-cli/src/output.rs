//! Terminal styling for user-facing output.
//!
//! Commands receive an [`OutputStyle`] and format through it, so color is
//! decided once in `main` and never toggled globally.

use colored::{ColoredString, Colorize};

use crate::cli::GlobalArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutputStyle {
    color: bool,
}

impl OutputStyle {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }

    /// Color unless `--no-color` is given or `NO_COLOR` is set.
    pub(crate) fn from_global(global: &GlobalArgs) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!global.no_color && !no_color_env)
    }

    fn paint(&self, text: &str, apply: fn(&str) -> ColoredString) -> String {
        if self.color {
            apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn heading(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan().bold())
    }

    pub(crate) fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub(crate) fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    pub(crate) fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red().bold())
    }

    pub(crate) fn version(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().bold())
    }

    pub(crate) fn sql(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
