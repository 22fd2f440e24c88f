//! Phase 1: Scanner
//!
//! The scanner turns raw source text into significant lines. It performs:
//! - Byte order mark rejection
//! - Comment and blank line filtering
//! - Indentation counting (spaces only, tabs are rejected)
//! - Line terminator validation
//! - Physical line number tracking for diagnostics
//!
//! Lines are handed out one at a time through [`LineSource`], which supports a
//! single level of pushback so the parser can peek at the next line's indent.

use crate::error::{ErrorKind, ParseError, Result};
use std::str::SplitInclusive;

/// A single significant line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Number of leading spaces.
    pub indent: usize,
    /// Content after the indent, without the line terminator.
    pub content: String,
    /// 1-based physical line number for error reporting.
    pub line_no: usize,
}

/// Cursor over the significant lines of a source text.
pub struct LineSource<'a> {
    lines: SplitInclusive<'a, char>,
    last: Option<Line>,
    undone: bool,
    line_no: usize,
}

impl<'a> LineSource<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.split_inclusive('\n'),
            last: None,
            undone: false,
            line_no: 0,
        }
    }

    /// Return the next significant line, or `None` once input is exhausted.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        if !self.undone {
            self.last = self.read_line()?;
        }
        self.undone = false;
        Ok(self.last.clone())
    }

    /// Push back the line most recently returned by [`next_line`].
    ///
    /// Only one line can be pushed back at a time.
    ///
    /// [`next_line`]: LineSource::next_line
    pub fn undo(&mut self) {
        debug_assert!(!self.undone, "undo() called twice without next_line()");
        self.undone = true;
    }

    /// Line number of the most recently read physical line.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Fail with `kind` at the current line unless `condition` holds.
    pub fn check(&self, condition: bool, kind: ErrorKind) -> Result<()> {
        if condition {
            Ok(())
        } else {
            Err(self.error(kind))
        }
    }

    /// Build an error located at the current line.
    pub fn error(&self, kind: ErrorKind) -> ParseError {
        kind.at(self.line_no)
    }

    fn read_line(&mut self) -> Result<Option<Line>> {
        for raw in self.lines.by_ref() {
            self.line_no += 1;
            if self.line_no == 1 {
                validate_no_bom(raw)?;
            }

            let (text, terminated) = match raw.strip_suffix('\n') {
                Some(text) => (text.strip_suffix('\r').unwrap_or(text), true),
                None => (raw, false),
            };

            let indent = count_indent(text);
            let rest = &text[indent..];

            // Skip comments and blank lines, whatever their indentation
            if rest.starts_with('#') || rest.trim().is_empty() {
                continue;
            }

            if rest.starts_with('\t') {
                return Err(ErrorKind::TabNotAllowed.at(self.line_no));
            }
            if !terminated {
                return Err(ErrorKind::MalformedInput.at(self.line_no));
            }

            return Ok(Some(Line {
                indent,
                content: rest.to_string(),
                line_no: self.line_no,
            }));
        }
        Ok(None)
    }
}

/// Check that the source doesn't start with a UTF-8 BOM.
fn validate_no_bom(first_line: &str) -> Result<()> {
    if first_line.starts_with('\u{FEFF}') {
        return Err(ErrorKind::IllegalBom.at(1));
    }
    Ok(())
}

/// Count the number of leading spaces in a line.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}
