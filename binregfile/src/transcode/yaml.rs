//! YAML encoding of a register file.
//!
//! Mapping from register file to YAML:
//!   - RegFileParse  -> YAML mapping keyed by block name, in file order
//!   - Block         -> YAML mapping with `base` and `fields`
//!   - FieldDecl     -> YAML mapping with `name` and `value`
//!
//! Base indices and field values are emitted as YAML strings so that values
//! such as `0x10` or `8 .. 14` come back exactly as written.

use libregfile::{Block, RegFileParse};
use serde_yaml::{Mapping, Value};

/// Encode a register file as a YAML string.
pub fn encode(regs: &RegFileParse) -> Result<String, String> {
    let mut doc = Mapping::new();
    for block in regs {
        doc.insert(Value::String(block.name.clone()), block_to_yaml(block));
    }
    serde_yaml::to_string(&Value::Mapping(doc)).map_err(|e| format!("YAML encode error: {}", e))
}

fn block_to_yaml(block: &Block) -> Value {
    let fields: Vec<Value> = block
        .fields
        .iter()
        .map(|f| {
            let mut field = Mapping::new();
            field.insert("name".into(), Value::String(f.name.clone()));
            field.insert("value".into(), Value::String(f.value.clone()));
            Value::Mapping(field)
        })
        .collect();

    let mut map = Mapping::new();
    map.insert("base".into(), Value::String(block.base.clone()));
    map.insert("fields".into(), Value::Sequence(fields));
    Value::Mapping(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libregfile::{parse_register_file, RegFileOptions};

    #[test]
    fn test_encode_round_trips_through_serde_yaml() {
        let regs = parse_register_file(
            "*REG 0\n    FPGA_VERSION 0\n    PCAP_BITS 8 .. 14\n",
            &RegFileOptions::default(),
        )
        .unwrap();
        let text = encode(&regs).unwrap();
        let value: Value = serde_yaml::from_str(&text).unwrap();

        let block = &value["*REG"];
        assert_eq!(block["base"], Value::String("0".to_string()));
        assert_eq!(
            block["fields"][1]["value"],
            Value::String("8 .. 14".to_string())
        );
    }
}
