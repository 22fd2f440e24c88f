//! Machine-readable encodings of a reduced register file.
//!
//! Every format carries the same shape: a map from block name, in file
//! order, to the block's base index and its ordered list of fields. JSON,
//! YAML and TOML write each field as a `{name, value}` object:
//!
//! ```text
//! { "*REG": { "base": "0", "fields": [ { "name": "FPGA_VERSION", "value": "0" } ] } }
//! ```
//!
//! CBOR writes each field as a compact `[name, value]` pair instead.
//!
//! Base and field values stay strings exactly as written in the source.

pub mod cbor;
pub mod json;
pub mod toml;
pub mod yaml;
