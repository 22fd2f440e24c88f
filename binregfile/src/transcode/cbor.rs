//! CBOR encoding of a register file.
//!
//! Mapping from register file to CBOR:
//!   - RegFileParse -> CBOR map (determinate length, text keys in file order)
//!   - Block        -> CBOR map with text keys `base` and `fields`
//!   - FieldDecl    -> CBOR array `[name, value]`
//!   - names/values -> CBOR text strings
//!
//! The diagnostic notation output (RFC 8949 §8) renders the same value as
//! text for inspection.

use ciborium::value::Value as CborValue;
use libregfile::{Block, RegFileParse};
use std::fmt::Write as FmtWrite;

/// Encode a register file as CBOR bytes.
pub fn encode(regs: &RegFileParse) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&to_cbor(regs), &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

/// Render a register file in CBOR diagnostic notation.
pub fn diagnostic(regs: &RegFileParse) -> String {
    let mut out = String::new();
    diag_value(&mut out, &to_cbor(regs), 0);
    out.push('\n');
    out
}

fn to_cbor(regs: &RegFileParse) -> CborValue {
    CborValue::Map(
        regs.iter()
            .map(|block| (CborValue::Text(block.name.clone()), block_to_cbor(block)))
            .collect(),
    )
}

fn block_to_cbor(block: &Block) -> CborValue {
    let fields = block
        .fields
        .iter()
        .map(|f| {
            CborValue::Array(vec![
                CborValue::Text(f.name.clone()),
                CborValue::Text(f.value.clone()),
            ])
        })
        .collect();

    CborValue::Map(vec![
        (
            CborValue::Text("base".to_string()),
            CborValue::Text(block.base.clone()),
        ),
        (CborValue::Text("fields".to_string()), CborValue::Array(fields)),
    ])
}

fn diag_value(out: &mut String, val: &CborValue, indent: usize) {
    match val {
        CborValue::Text(s) => diag_text(out, s),
        CborValue::Array(arr) => diag_array(out, arr, indent),
        CborValue::Map(pairs) => diag_map(out, pairs, indent),
        _ => {
            let _ = write!(out, "<?unknown {:?}>", val);
        }
    }
}

fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

fn diag_array(out: &mut String, arr: &[CborValue], indent: usize) {
    if arr.is_empty() {
        out.push_str("[]");
        return;
    }
    // Field pairs stay on one line
    if arr.iter().all(|v| matches!(v, CborValue::Text(_))) {
        out.push('[');
        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            diag_value(out, item, indent);
        }
        out.push(']');
        return;
    }
    out.push_str("[\n");
    for (i, item) in arr.iter().enumerate() {
        push_indent(out, indent + 2);
        diag_value(out, item, indent + 2);
        if i < arr.len() - 1 {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push(']');
}

fn diag_map(out: &mut String, pairs: &[(CborValue, CborValue)], indent: usize) {
    if pairs.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for (i, (k, v)) in pairs.iter().enumerate() {
        push_indent(out, indent + 2);
        diag_value(out, k, indent + 2);
        out.push_str(": ");
        diag_value(out, v, indent + 2);
        if i < pairs.len() - 1 {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push('}');
}
