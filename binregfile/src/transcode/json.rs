//! JSON encoding of a register file.

use libregfile::{Block, RegFileParse};
use serde_json::{json, Map, Value};

/// Encode a register file as pretty-printed JSON.
pub fn encode(regs: &RegFileParse) -> Result<String, String> {
    let mut doc = Map::new();
    for block in regs {
        doc.insert(block.name.clone(), block_to_json(block));
    }
    let mut text = serde_json::to_string_pretty(&Value::Object(doc))
        .map_err(|e| format!("JSON encode error: {}", e))?;
    text.push('\n');
    Ok(text)
}

fn block_to_json(block: &Block) -> Value {
    let fields: Vec<Value> = block
        .fields
        .iter()
        .map(|f| json!({ "name": f.name, "value": f.value }))
        .collect();
    json!({ "base": block.base, "fields": fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use libregfile::{parse_register_file, RegFileOptions};

    #[test]
    fn test_encode_keeps_block_order() {
        let regs = parse_register_file(
            "TTL 3\n    VAL 0\n*REG 0\n    PCAP_BITS 8 .. 14\n",
            &RegFileOptions::default(),
        )
        .unwrap();
        let text = encode(&regs).unwrap();
        assert!(text.find("\"TTL\"").unwrap() < text.find("\"*REG\"").unwrap());

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["*REG"]["base"], "0");
        assert_eq!(value["*REG"]["fields"][0]["name"], "PCAP_BITS");
        assert_eq!(value["*REG"]["fields"][0]["value"], "8 .. 14");
    }
}
