//! Source positions attached to tree nodes and diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub line: u32,
    pub column: u32,
}

impl Point {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A span in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub begin: Point,
    pub end: Point,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, begin: Point, end: Point) -> Self {
        Self {
            file_path: file_path.into(),
            begin,
            end,
        }
    }

    /// A location covering `len` columns on a single line.
    pub fn on_line(file_path: impl Into<String>, line: u32, column: u32, len: u32) -> Self {
        Self::new(
            file_path,
            Point::new(line, column),
            Point::new(line, column + len.saturating_sub(1)),
        )
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path, self.begin.line, self.begin.column
        )
    }
}

/// An identifier token exactly as written, with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub identifier: String,
    pub location: SourceLocation,
}

impl Identifier {
    pub fn new(identifier: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            identifier: identifier.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_begin_point() {
        let loc = SourceLocation::on_line("a/b.tmpl", 12, 5, 4);
        assert_eq!(loc.to_string(), "a/b.tmpl:12:5");
        assert_eq!(loc.end, Point::new(12, 8));
    }

    #[test]
    fn test_on_line_zero_length_stays_on_begin() {
        let loc = SourceLocation::on_line("x.tmpl", 1, 1, 0);
        assert_eq!(loc.begin, loc.end);
    }
}
