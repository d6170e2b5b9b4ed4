#![allow(dead_code)]

//! Test utilities for building Trionic log text.

/// Builder for synthesizing log text line by line.
///
/// Timestamps are derived from a fixed base (01/01/2023 10:00:00.000) plus a
/// per-record millisecond offset, rendered with a configurable date separator.
pub struct LogBuilder {
    lines: Vec<String>,
    separator: char,
}

impl LogBuilder {
    /// Create a new builder using the `/` date separator.
    pub fn new() -> Self {
        Self::with_separator('/')
    }

    /// Create a new builder with a specific date separator (`/`, `-` or `.`).
    pub fn with_separator(separator: char) -> Self {
        Self {
            lines: Vec::new(),
            separator,
        }
    }

    /// Render the base timestamp plus `offset_ms` in the builder's layout.
    pub fn timestamp(&self, offset_ms: u64) -> String {
        let millisecond = offset_ms % 1000;
        let total_seconds = offset_ms / 1000;
        let second = total_seconds % 60;
        let minute = (total_seconds / 60) % 60;
        let hour = 10 + total_seconds / 3600;
        let sep = self.separator;
        format!(
            "01{sep}01{sep}2023 {:02}:{:02}:{:02}.{:03}",
            hour, minute, second, millisecond
        )
    }

    /// Add a well-formed record line at `offset_ms` past the base timestamp.
    /// Every field is closed with a trailing `|`.
    pub fn record(mut self, offset_ms: u64, fields: &[(&str, &str)]) -> Self {
        let mut line = format!("{}|", self.timestamp(offset_ms));
        for (name, value) in fields {
            line.push_str(name);
            line.push('=');
            line.push_str(value);
            line.push('|');
        }
        self.lines.push(line);
        self
    }

    /// Add a raw line verbatim, for malformed-input cases.
    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Build the final log text, newline-terminated.
    pub fn build(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
