//! Command-line tool for checking register files and converting them to other
//! formats.
//!
//! Usage: regfile [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (regfile, header, json, yaml, toml, cbor, diag)
//!   -w, --write            Write output next to the input with inferred extension
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   --strict               Reject repeated block and field names
//!   --max-depth <N>        Maximum nesting below the top level
//!   -v, --verbose          Increase log verbosity (repeatable)
//!   -h, --help             Print help
//!   -V, --version          Print version

use clap::{ArgAction, Parser, ValueEnum};
use libregfile::{
    encode, parse_register_file, DuplicatePolicy, Format, ParseError, ParseOptions,
    RegFileOptions, RegFileParse, NAMED_REGISTER_BLOCK,
};
use log::{debug, info, LevelFilter};
use simple_logger::SimpleLogger;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

mod transcode;

/// File name used for register files that have no extension.
const REGISTERS_FILE_NAME: &str = "registers";

#[derive(Parser, Debug)]
#[command(
    name = "regfile",
    version,
    about = "Check register map files and convert them to other formats",
    after_help = EXAMPLES
)]
struct Cli {
    /// Input file or directory (reads from stdin if not provided or "-").
    /// A directory is scanned for *.regs files and files named "registers".
    input: Option<PathBuf>,

    /// Output format
    #[arg(short = 't', long = "to", value_enum, default_value_t = OutputFormat::Json)]
    to: OutputFormat,

    /// Write output next to each input file with inferred extension
    #[arg(short, long, conflicts_with = "output")]
    write: bool,

    /// Write output to specified file (not valid with directory input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only check that the input is valid
    #[arg(long)]
    check: bool,

    /// Reject repeated block names, and repeated field names within a block
    #[arg(long)]
    strict: bool,

    /// Maximum nesting depth below the top level
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn regfile_options(&self) -> RegFileOptions {
        RegFileOptions {
            parse: ParseOptions {
                max_depth: self.max_depth,
            },
            duplicates: if self.strict {
                DuplicatePolicy::Reject
            } else {
                DuplicatePolicy::LastWins
            },
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Canonical register file text
    Regfile,
    /// C header with named register definitions from the *REG block
    Header,
    Json,
    Yaml,
    Toml,
    Cbor,
    /// CBOR diagnostic notation
    Diag,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Regfile => "regs",
            OutputFormat::Header => "h",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Toml => "toml",
            OutputFormat::Cbor => "cbor",
            OutputFormat::Diag => "diag",
        }
    }
}

/// Encoded output, ready to write.
enum Output {
    Text(String),
    Binary(Vec<u8>),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input_path = cli.input.as_deref().filter(|p| *p != Path::new("-"));

    if let Some(path) = input_path {
        if path.is_dir() {
            if cli.output.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process_directory(path, &cli);
        }
    }

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    let exit_code = process_input(&input, input_path, &cli);
    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Warning: logger already initialised: {}", e);
    }
}

/// Whether a directory entry looks like a register file.
fn is_register_file(path: &Path) -> bool {
    path.extension().map(|e| e == "regs").unwrap_or(false)
        || path
            .file_name()
            .map(|n| n == REGISTERS_FILE_NAME)
            .unwrap_or(false)
}

fn process_directory(dir_path: &Path, cli: &Cli) -> ! {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path.display(), e);
            process::exit(1);
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_register_file(path))
        .collect();
    paths.sort();
    info!("{} register files in {}", paths.len(), dir_path.display());

    let mut had_errors = false;
    for path in &paths {
        let input = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                had_errors = true;
                continue;
            }
        };

        if process_input(&input, Some(path), cli) != 0 {
            had_errors = true;
        }
    }

    process::exit(if had_errors { 1 } else { 0 });
}

fn process_input(input: &str, input_file: Option<&Path>, cli: &Cli) -> i32 {
    let label = input_file.map(|p| p.display().to_string());
    let options = cli.regfile_options();
    debug!("parsing {} with {:?}", label.as_deref().unwrap_or("<stdin>"), options);

    let regs = match parse_register_file(input, &options) {
        Ok(regs) => regs,
        Err(e) => {
            match &label {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
    };
    info!(
        "{}: {} blocks",
        label.as_deref().unwrap_or("<stdin>"),
        regs.len()
    );

    if cli.check {
        if let Err(e) = check_named_registers(&regs) {
            match &label {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
        match &label {
            Some(path) => println!("{}: ok", path),
            None => println!("ok"),
        }
        return 0;
    }

    let output = match render(&regs, cli.to) {
        Ok(output) => output,
        Err(e) => {
            match &label {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Error: {}", e),
            }
            return 1;
        }
    };

    match write_output(&output, cli, input_file) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

/// Expand the `*REG` field ranges, when that block is present.
fn check_named_registers(regs: &RegFileParse) -> Result<(), ParseError> {
    if let Some(block) = regs.get(NAMED_REGISTER_BLOCK) {
        let named = block.named_registers()?;
        debug!("{} named registers", named.len());
    }
    Ok(())
}

fn render(regs: &RegFileParse, format: OutputFormat) -> Result<Output, String> {
    match format {
        OutputFormat::Regfile => encode(regs, Format::RegFile)
            .map(Output::Text)
            .map_err(|e| e.to_string()),
        OutputFormat::Header => encode(regs, Format::Header)
            .map(Output::Text)
            .map_err(|e| e.to_string()),
        OutputFormat::Json => transcode::json::encode(regs).map(Output::Text),
        OutputFormat::Yaml => transcode::yaml::encode(regs).map(Output::Text),
        OutputFormat::Toml => transcode::toml::encode(regs).map(Output::Text),
        OutputFormat::Cbor => transcode::cbor::encode(regs).map(Output::Binary),
        OutputFormat::Diag => Ok(Output::Text(transcode::cbor::diagnostic(regs))),
    }
}

fn write_output(output: &Output, cli: &Cli, input_file: Option<&Path>) -> Result<(), String> {
    let bytes = match output {
        Output::Text(text) => text.as_bytes(),
        Output::Binary(bytes) => bytes.as_slice(),
    };

    let target = if let Some(path) = &cli.output {
        Some(path.clone())
    } else if cli.write {
        let input_path = input_file.ok_or("Error: --write requires an input file")?;
        Some(input_path.with_extension(cli.to.extension()))
    } else {
        None
    };

    match target {
        Some(path) => {
            fs::write(&path, bytes)
                .map_err(|e| format!("Error writing {}: {}", path.display(), e))?;
            info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(bytes)
                .map_err(|e| format!("Error writing to stdout: {}", e))?;
            // Ensure text output ends with newline
            if matches!(output, Output::Text(text) if !text.ends_with('\n')) {
                let _ = handle.write_all(b"\n");
            }
            Ok(())
        }
    }
}

const EXAMPLES: &str = "EXAMPLES:
    # Check a register file
    regfile --check config_d/registers

    # Check every register file in a directory, rejecting duplicate names
    regfile --check --strict config_d/

    # Generate the named register header
    regfile -t header config_d/registers -o named_registers.h

    # Convert to JSON or YAML
    regfile -t json config_d/registers
    regfile -t yaml config_d/registers

    # Reformat a register file to canonical layout
    regfile -t regfile messy.regs -o tidy.regs

    # Convert to CBOR and view it in diagnostic notation
    regfile -t cbor registers.regs -o registers.cbor
    regfile -t diag registers.regs";
