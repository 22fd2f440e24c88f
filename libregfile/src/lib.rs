//! Register map parser for indentation-structured register files.
//!
//! A register file lists named register blocks with their base index, and
//! under each block the fields it contains:
//!
//! ```text
//! *REG        0
//!     FPGA_VERSION            0
//!     PCAP_BITS               8 .. 14
//! ```
//!
//! # Parsing Pipeline
//!
//! The parser operates in three phases:
//!
//! 1. **Scanner**: Hands out significant lines one at a time, skipping
//!    comments and blank lines, counting indentation and tracking physical
//!    line numbers.
//!
//! 2. **Indent Parser**: Builds a tree of lines where each line
//!    owns the more deeply indented lines that follow it.
//!
//! 3. **Register-File Reducer**: Checks the two-level block/field shape and
//!    flattens the tree into a map of blocks.
//!
//! Every failure is reported as `Line <N>: <message>` and rejects the whole
//! file.

mod encode;
mod error;
mod field;
mod parser;
mod regfile;
mod scanner;

pub use encode::{encode, encode_header, Format, NAMED_REGISTER_BLOCK};
pub use error::{EncodeError, ErrorKind, ParseError, Result};
pub use field::{parse_int, FieldRange};
pub use parser::{parse_level, FileParse, ParseNode, ParseOptions};
pub use regfile::{
    reduce, Block, DuplicatePolicy, FieldDecl, NamedRegister, RegFileOptions, RegFileParse,
};
pub use scanner::{Line, LineSource};

/// Parse an indented text into a generic tree of lines.
///
/// # Example
///
/// ```
/// use libregfile::parse_indented;
///
/// let tree = parse_indented("a\n    b\n").unwrap();
/// assert_eq!(tree[0].children[0].content(), "b");
/// ```
pub fn parse_indented(input: &str) -> Result<FileParse> {
    parse_indented_with(input, &ParseOptions::default())
}

/// Parse an indented text with explicit options.
pub fn parse_indented_with(input: &str, options: &ParseOptions) -> Result<FileParse> {
    parser::parse_file(input, options)
}

/// Parse a register file into its block map.
pub fn parse_register_file(input: &str, options: &RegFileOptions) -> Result<RegFileParse> {
    // Phase 1 and 2: Scan lines and build the indentation tree
    let tree = parse_indented_with(input, &options.parse)?;

    // Phase 3: Impose block and field structure
    reduce(&tree, options)
}
