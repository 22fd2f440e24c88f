//! Field value expansion.
//!
//! A field value is either a single offset `start` or an inclusive range
//! `start .. end`.

use crate::error::ErrorKind;
use std::ops::RangeInclusive;

/// Offsets covered by one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub start: u64,
    pub count: u64,
}

impl FieldRange {
    /// Parse a field value such as `"8"` or `"8 .. 14"`.
    pub fn parse(value: &str) -> Result<Self, ErrorKind> {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        match tokens.as_slice() {
            [start] => Ok(Self {
                start: parse_int(start)?,
                count: 1,
            }),
            [start, "..", end] => {
                let start = parse_int(start)?;
                let end = parse_int(end)?;
                let span = end.checked_sub(start).ok_or(ErrorKind::MalformedRange)?;
                let count = span.checked_add(1).ok_or(ErrorKind::RangeTooLarge)?;
                Ok(Self { start, count })
            }
            _ => Err(ErrorKind::MalformedRange),
        }
    }

    /// Last offset in the range.
    pub fn end(&self) -> u64 {
        self.start + self.count - 1
    }

    pub fn offsets(&self) -> RangeInclusive<u64> {
        self.start..=self.end()
    }
}

/// Parse a decimal or `0x` hexadecimal integer.
pub fn parse_int(token: &str) -> Result<u64, ErrorKind> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse::<u64>(),
    };
    parsed.map_err(|_| ErrorKind::InvalidNumber(token.to_string()))
}
