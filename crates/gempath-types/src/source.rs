use serde::{Deserialize, Serialize};
use std::fmt;

/// The script text a statement was parsed from.
///
/// `line` is 1-based so the UI can highlight the responsible line directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub line: u32,
    pub text: String,
}

impl SourceRef {
    pub fn new(line: u32, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.line, self.text)
    }
}

/// Holds script source text for line lookup.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source: String,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Create a new source file. CRLF and lone CR line endings are
    /// normalised to `\n` and byte order marks are removed.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source
            .into()
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\u{feff}', "");
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        Some(&self.source[start..end])
    }

    /// Iterate over `(line_number, text)` pairs, 1-based.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        (1..=self.line_count() as u32).filter_map(move |n| self.line(n).map(|l| (n, l)))
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_line_extraction() {
        let src = SourceFile::new("moveForward()\nturnLeft()\ncollectGem()");
        assert_eq!(src.line(1), Some("moveForward()"));
        assert_eq!(src.line(2), Some("turnLeft()"));
        assert_eq!(src.line(3), Some("collectGem()"));
        assert_eq!(src.line(0), None);
        assert_eq!(src.line(4), None);
    }

    #[test]
    fn test_source_file_crlf() {
        let src = SourceFile::new("moveForward()\r\nturnLeft()\r\n");
        assert_eq!(src.line(1), Some("moveForward()"));
        assert_eq!(src.line(2), Some("turnLeft()"));
    }

    #[test]
    fn test_source_file_lone_cr() {
        let src = SourceFile::new("a\rb");
        assert_eq!(src.line_count(), 2);
        assert_eq!(src.line(2), Some("b"));
    }

    #[test]
    fn test_source_file_strips_bom() {
        let src = SourceFile::new("\u{feff}moveForward()");
        assert_eq!(src.line(1), Some("moveForward()"));
    }

    #[test]
    fn test_source_file_empty() {
        let src = SourceFile::new("");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line(1), Some(""));
    }

    #[test]
    fn test_lines_iterator() {
        let src = SourceFile::new("a\nb");
        let lines: Vec<_> = src.lines().collect();
        assert_eq!(lines, vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn test_source_ref_display() {
        let s = SourceRef::new(3, "moveForward()");
        assert_eq!(s.to_string(), "3: moveForward()");
    }
}
