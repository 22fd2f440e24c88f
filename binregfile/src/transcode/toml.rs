//! TOML encoding of a register file.
//!
//! Each block becomes a table keyed by its name, holding a `base` string and
//! a `fields` array of tables. Block names such as `*REG` are emitted as
//! quoted keys.

use libregfile::{Block, RegFileParse};
use toml_edit::{value, ArrayOfTables, DocumentMut, Item, Table};

/// Encode a register file as a TOML string.
pub fn encode(regs: &RegFileParse) -> Result<String, String> {
    let mut doc = DocumentMut::new();
    for block in regs {
        doc.insert(&block.name, Item::Table(block_to_toml(block)));
    }
    Ok(doc.to_string())
}

fn block_to_toml(block: &Block) -> Table {
    let mut table = Table::new();
    table.insert("base", value(block.base.clone()));

    let mut fields = ArrayOfTables::new();
    for field in &block.fields {
        let mut entry = Table::new();
        entry.insert("name", value(field.name.clone()));
        entry.insert("value", value(field.value.clone()));
        fields.push(entry);
    }
    if !fields.is_empty() {
        table.insert("fields", Item::ArrayOfTables(fields));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use libregfile::{parse_register_file, RegFileOptions};

    #[test]
    fn test_encode_parses_back() {
        let regs = parse_register_file(
            "*REG 0\n    FPGA_VERSION 0\n    PCAP_BITS 8 .. 14\nTTL 3\n",
            &RegFileOptions::default(),
        )
        .unwrap();
        let text = encode(&regs).unwrap();
        let doc: DocumentMut = text.parse().unwrap();

        assert_eq!(doc["*REG"]["base"].as_str(), Some("0"));
        let fields = doc["*REG"]["fields"].as_array_of_tables().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(1).unwrap()["value"].as_str(), Some("8 .. 14"));
        assert_eq!(doc["TTL"]["base"].as_str(), Some("3"));
        assert!(doc["TTL"].get("fields").is_none());
    }
}
