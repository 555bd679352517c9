//! Script text as an ordered, immutable sequence of lines.

use serde::Serialize;

/// A loaded script. Line order is canonical and never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    /// Split raw text on line breaks (`\n` or `\r\n`).
    ///
    /// Whitespace-only text yields an empty script.
    pub fn new(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn non_empty_line_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.trim().is_empty()).count()
    }

    /// Reassemble the text with `\n` separators.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl From<&str> for Script {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
