//! Phase 3: Register-File Reducer
//!
//! Imposes the register file shape on a generic parse tree. Top-level lines
//! declare blocks as `name base`; the lines nested one level under a block
//! declare its fields as `name value`, where the value is everything after
//! the first run of whitespace. Fields must not have anything nested under
//! them.

use crate::error::{ErrorKind, Result};
use crate::field::FieldRange;
use crate::parser::{FileParse, ParseNode, ParseOptions};
use log::{debug, warn};

/// How to treat a name that is declared twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later block replaces the earlier one.
    #[default]
    LastWins,
    /// Repeated block names, and repeated field names within a block, are errors.
    Reject,
}

/// Options for reducing a register file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegFileOptions {
    pub parse: ParseOptions,
    pub duplicates: DuplicatePolicy,
}

impl RegFileOptions {
    /// Options that reject any repeated block or field name.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            ..Self::default()
        }
    }
}

/// A `name value` line nested under a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Free-form remainder of the line, e.g. `"8"` or `"8 .. 14"`.
    pub value: String,
    pub line_no: usize,
}

impl FieldDecl {
    /// Expand the value into the offsets it covers.
    pub fn range(&self) -> Result<FieldRange> {
        FieldRange::parse(&self.value).map_err(|kind| kind.at(self.line_no))
    }
}

/// A field resolved to its offset and element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRegister {
    pub name: String,
    pub offset: u64,
    pub count: u64,
}

/// One top-level block declaration and its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    /// Base index exactly as written.
    pub base: String,
    pub fields: Vec<FieldDecl>,
    pub line_no: usize,
}

impl Block {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Expand every field, failing on the first malformed value.
    pub fn named_registers(&self) -> Result<Vec<NamedRegister>> {
        self.fields
            .iter()
            .map(|field| {
                let range = field.range()?;
                Ok(NamedRegister {
                    name: field.name.clone(),
                    offset: range.start,
                    count: range.count,
                })
            })
            .collect()
    }
}

/// Blocks of a register file keyed by name, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegFileParse {
    blocks: Vec<Block>,
}

impl RegFileParse {
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.name == name)
    }
}

impl<'a> IntoIterator for &'a RegFileParse {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Reduce a generic parse tree to a register file description.
pub fn reduce(parse: &FileParse, options: &RegFileOptions) -> Result<RegFileParse> {
    let mut result = RegFileParse::default();

    for node in parse {
        let block = reduce_block(node, options.duplicates)?;
        debug!(
            "block {} base {} with {} fields",
            block.name,
            block.base,
            block.fields.len()
        );

        match result.position(&block.name) {
            Some(index) => match options.duplicates {
                DuplicatePolicy::LastWins => {
                    warn!(
                        "Line {}: block {} redefined, replacing definition from line {}",
                        block.line_no, block.name, result.blocks[index].line_no
                    );
                    result.blocks[index] = block;
                }
                DuplicatePolicy::Reject => {
                    return Err(ErrorKind::DuplicateBlock(block.name).at(block.line_no));
                }
            },
            None => result.blocks.push(block),
        }
    }

    Ok(result)
}

fn reduce_block(node: &ParseNode, duplicates: DuplicatePolicy) -> Result<Block> {
    let line_no = node.line.line_no;
    let (name, base) = match node.content().split_whitespace().collect::<Vec<_>>()[..] {
        [name, base] => (name, base),
        _ => return Err(ErrorKind::MalformedBlockHeader.at(line_no)),
    };

    let mut fields: Vec<FieldDecl> = Vec::with_capacity(node.children.len());
    for child in &node.children {
        let field = reduce_field(child)?;
        if duplicates == DuplicatePolicy::Reject && fields.iter().any(|f| f.name == field.name) {
            return Err(ErrorKind::DuplicateField(field.name).at(field.line_no));
        }
        fields.push(field);
    }

    Ok(Block {
        name: name.to_string(),
        base: base.to_string(),
        fields,
        line_no,
    })
}

fn reduce_field(node: &ParseNode) -> Result<FieldDecl> {
    if let Some(nested) = node.children.first() {
        return Err(ErrorKind::UnexpectedNesting.at(nested.line.line_no));
    }

    let line_no = node.line.line_no;
    let (name, value) = split_first_word(node.content())
        .ok_or_else(|| ErrorKind::MalformedField.at(line_no))?;

    Ok(FieldDecl {
        name: name.to_string(),
        value: value.to_string(),
        line_no,
    })
}

/// Split on the first run of whitespace, requiring a non-empty remainder.
fn split_first_word(content: &str) -> Option<(&str, &str)> {
    let content = content.trim();
    let split = content.find(char::is_whitespace)?;
    let (name, rest) = content.split_at(split);
    Some((name, rest.trim_start()))
}
