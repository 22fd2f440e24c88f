//! Error types for register file parsing.

use thiserror::Error;

/// Result type for register file parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// What went wrong, independent of where.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Last significant line has no line terminator.
    #[error("Unexpected end of input")]
    MalformedInput,

    /// Byte order mark at the start of the file.
    #[error("Illegal BOM")]
    IllegalBom,

    /// Tab character found where spaces expected.
    #[error("Tab not allowed in indentation")]
    TabNotAllowed,

    /// Indent increase with nothing to nest under.
    #[error("Invalid indentation")]
    InvalidIndentation,

    /// Second nested block for a line that already has one.
    #[error("Sub-fields already parsed")]
    DuplicateNesting,

    /// Nesting deeper than the configured maximum.
    #[error("Too much indentation")]
    TooMuchIndentation,

    /// Block line is not exactly `name base`.
    #[error("Malformed block header")]
    MalformedBlockHeader,

    /// Field line has a name but no value.
    #[error("Malformed field definition")]
    MalformedField,

    /// Field line has lines nested under it.
    #[error("Unexpected nesting under field")]
    UnexpectedNesting,

    /// Block name seen twice under the strict policy.
    #[error("Block {0} already defined")]
    DuplicateBlock(String),

    /// Field name seen twice in one block under the strict policy.
    #[error("Field {0} already defined")]
    DuplicateField(String),

    /// Field value is neither `start` nor `start .. end`.
    #[error("Malformed range")]
    MalformedRange,

    /// Range covers more offsets than fit in a `u64` count.
    #[error("Range too large")]
    RangeTooLarge,

    /// Token that should be an integer is not.
    #[error("Invalid number \"{0}\"")]
    InvalidNumber(String),
}

/// A parse failure tied to the physical line that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {kind}")]
pub struct ParseError {
    /// 1-based physical line number.
    pub line: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}

impl ErrorKind {
    /// Attach a line number to this error.
    pub fn at(self, line: usize) -> ParseError {
        ParseError::new(line, self)
    }
}

/// Failures while generating output from a reduced register file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The generator needs a block the file does not define.
    #[error("Block {0} not found")]
    MissingBlock(String),

    /// A field could not be expanded.
    #[error(transparent)]
    Field(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line() {
        let err = ErrorKind::InvalidIndentation.at(7);
        assert_eq!(err.to_string(), "Line 7: Invalid indentation");
    }

    #[test]
    fn test_display_with_payload() {
        let err = ErrorKind::DuplicateBlock("*REG".to_string()).at(12);
        assert_eq!(err.to_string(), "Line 12: Block *REG already defined");

        let err = ErrorKind::InvalidNumber("1x".to_string()).at(3);
        assert_eq!(err.to_string(), "Line 3: Invalid number \"1x\"");
    }

    #[test]
    fn test_encode_error_forwards_parse_error() {
        let err: EncodeError = ErrorKind::MalformedRange.at(4).into();
        assert_eq!(err.to_string(), "Line 4: Malformed range");
        assert_eq!(
            EncodeError::MissingBlock("*REG".to_string()).to_string(),
            "Block *REG not found"
        );
    }
}
