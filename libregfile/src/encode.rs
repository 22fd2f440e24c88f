//! Encode reduced register files to text outputs.
//!
//! Machine-readable formats (JSON, YAML, TOML, CBOR) are handled by the CLI
//! tool (binregfile) using dedicated libraries.

use crate::error::EncodeError;
use crate::regfile::{Block, RegFileParse};
use std::fmt::Write;

/// Name of the block holding the named register definitions.
pub const NAMED_REGISTER_BLOCK: &str = "*REG";

/// Text output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Canonical register file text
    RegFile,
    /// C header with named register definitions from the `*REG` block
    Header,
}

/// Encode a register file in the given format.
pub fn encode(regs: &RegFileParse, format: Format) -> Result<String, EncodeError> {
    match format {
        Format::RegFile => Ok(encode_regfile(regs)),
        Format::Header => {
            let block = regs
                .get(NAMED_REGISTER_BLOCK)
                .ok_or_else(|| EncodeError::MissingBlock(NAMED_REGISTER_BLOCK.to_string()))?;
            encode_header(block)
        }
    }
}

fn encode_regfile(regs: &RegFileParse) -> String {
    let name_width = regs.names().map(str::len).max().unwrap_or(0);
    let field_width = regs
        .iter()
        .flat_map(|b| b.fields.iter().map(|f| f.name.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, block) in regs.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{:<name_width$}  {}", block.name, block.base);
        for field in &block.fields {
            let _ = writeln!(out, "    {:<field_width$}  {}", field.name, field.value);
        }
    }
    out
}

/// Generate the named register header for a `*REG` block.
///
/// Emits a `#define` per field giving its first offset, then a table pairing
/// each name with its element count for the server's startup check.
pub fn encode_header(block: &Block) -> Result<String, EncodeError> {
    let registers = block.named_registers()?;

    let mut out = String::new();
    out.push_str(
        "/* Named register definitions taken from the *REG block of the register\n\
         \x20* configuration file.  The server re-reads that file on startup and checks\n\
         \x20* it against this table.\n\
         \x20*\n\
         \x20* This file is generated by regfile, do not edit it by hand. */\n\n",
    );

    let _ = writeln!(out, "#define REG_BLOCK_BASE {}", block.base);
    out.push('\n');
    for reg in &registers {
        let _ = writeln!(out, "#define {} {}", reg.name, reg.offset);
    }

    out.push_str("\nstatic struct named_register named_registers[] = {\n");
    for reg in &registers {
        let _ = writeln!(
            out,
            "    [{}] = {{ \"{}\", {}, false }},",
            reg.name, reg.name, reg.count
        );
    }
    out.push_str("};\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::{parse_register_file, RegFileOptions};

    fn regs(input: &str) -> RegFileParse {
        parse_register_file(input, &RegFileOptions::default()).unwrap()
    }

    #[test]
    fn test_header() {
        let regs = regs("*REG 0\n    FPGA_VERSION 0\n    PCAP_BITS 8 .. 14\n");
        let header = encode(&regs, Format::Header).unwrap();
        assert!(header.starts_with("/* Named register definitions"));
        assert!(header.contains("\n#define REG_BLOCK_BASE 0\n\n#define FPGA_VERSION 0\n#define PCAP_BITS 8\n"));
        assert!(header.ends_with(
            "static struct named_register named_registers[] = {\n\
             \x20   [FPGA_VERSION] = { \"FPGA_VERSION\", 1, false },\n\
             \x20   [PCAP_BITS] = { \"PCAP_BITS\", 7, false },\n\
             };\n"
        ));
    }

    #[test]
    fn test_header_needs_reg_block() {
        let regs = regs("TTL 3\n    VAL 0\n");
        assert_eq!(
            encode(&regs, Format::Header),
            Err(EncodeError::MissingBlock("*REG".to_string()))
        );
    }

    #[test]
    fn test_header_reports_bad_range() {
        let regs = regs("*REG 0\n    PCAP_BITS 8 .. 14 .. 20\n");
        assert_eq!(
            encode(&regs, Format::Header),
            Err(EncodeError::Field(ErrorKind::MalformedRange.at(2)))
        );
    }

    #[test]
    fn test_regfile_layout() {
        let regs = regs("*REG 0\n  FPGA_VERSION 0\n  PCAP_BITS   8 .. 14\nTTL 3\n");
        assert_eq!(
            encode(&regs, Format::RegFile).unwrap(),
            "*REG  0\n    FPGA_VERSION  0\n    PCAP_BITS     8 .. 14\n\nTTL   3\n"
        );
    }

    #[test]
    fn test_regfile_reparses() {
        let original = regs("# c\nA 1\n      X 0\n      Y 1 .. 3\n\nB 2\n");
        let text = encode(&original, Format::RegFile).unwrap();
        let again = regs(&text);

        let strip = |r: &RegFileParse| -> Vec<(String, String, Vec<(String, String)>)> {
            r.iter()
                .map(|b| {
                    (
                        b.name.clone(),
                        b.base.clone(),
                        b.fields
                            .iter()
                            .map(|f| (f.name.clone(), f.value.clone()))
                            .collect(),
                    )
                })
                .collect()
        };
        assert_eq!(strip(&original), strip(&again));
    }
}
