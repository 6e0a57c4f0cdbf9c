//! Line index over raw source text
//!
//!     Forms are located by line span only, so the raw text of a form (or of a run of
//!     merged forms) is recovered by slicing whole lines out of the original source.
//!     This keeps the displayed code byte-for-byte identical to what the author wrote,
//!     which re-serializing the parsed datum never could.
//!
//!     Lines are 1-indexed to match the line numbers reported by the reader.

/// Ordered raw lines of a source text, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    /// Index a source text.
    ///
    /// A trailing newline is appended first so the final line is always captured,
    /// then the text is split on `\n` (a preceding `\r` is dropped). Empty lines are kept.
    pub fn index(text: &str) -> Self {
        let text = format!("{}\n", text);
        let mut lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        // split yields one empty piece after the appended newline
        lines.pop();
        SourceLines { lines }
    }

    /// Number of indexed lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A single line by its 1-based number.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// Join lines `start..=end` (1-based, inclusive) with newlines.
    ///
    /// Bounds are clamped to the indexed range; an empty or inverted range gives an
    /// empty string.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.max(1);
        let end = end.min(self.lines.len());
        if start > end {
            return String::new();
        }
        self.lines[start - 1..end].join("\n")
    }
}
