//! DPCD Decoder CLI Application
//!
//! This is the command-line interface for the DPCD register decoder.
//! It uses the dpcd-decoder library and adds:
//! - Hex dump and manual register write input
//! - Trace log input from stdin or a file
//! - Optional TOML configuration
//! - Text and JSON reports

use anyhow::{bail, Context, Result};
use clap::Parser;
use dpcd_decoder::{command::USAGE_HINT, Decoder};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

/// Example for the --dpcd input
const DPCD_HINT: &str = "dpcd-cli --dpcd \"12 14 c4 81\" --base 0x0";

mod config;
mod report;

use config::{AppConfig, OutputFormat};
use report::ReportWriter;

/// DPCD Decoder - Decode DisplayPort Configuration Data registers
#[derive(Parser, Debug)]
#[command(name = "dpcd-cli")]
#[command(about = "Decode DisplayPort DPCD register dumps and AUX trace logs", long_about = None)]
#[command(version)]
struct Args {
    /// DPCD values, base16 space separated ("12 14 c4 ...")
    #[arg(long, value_name = "BYTES")]
    dpcd: Option<String>,

    /// DPCD address of the first --dpcd byte
    #[arg(long, value_name = "ADDR", default_value = "0x0")]
    base: String,

    /// Read AUX transactions from a kernel log on stdin
    #[arg(long)]
    logs: bool,

    /// Read AUX transactions from a kernel log file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Decode a single register write [dpcd-cli -p 0x3000 0x1]
    #[arg(short, long, num_args = 1..=2, value_names = ["ADDR", "VALUE"])]
    parse: Option<Vec<String>>,

    /// Print the DPCD field address mapping
    #[arg(short, long)]
    mapping: bool,

    /// Only decode transactions on this port (can be repeated)
    #[arg(long, value_name = "PORT")]
    port: Vec<String>,

    /// Keep reading the log past blank lines
    #[arg(long)]
    read_to_eof: bool,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("DPCD Decoder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", dpcd_decoder::VERSION);

    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    apply_overrides(&mut app_config, &args);

    let has_input = args.dpcd.is_some()
        || args.logs
        || args.log_file.is_some()
        || args.parse.is_some()
        || args.mapping;
    if !has_input {
        // No arguments - show help
        println!("DPCD Decoder - No input specified");
        println!("\nQuick Start:");
        println!("  {}", DPCD_HINT);
        println!("  dmesg | dpcd-cli --logs");
        println!("  {}", USAGE_HINT);
        println!("  dpcd-cli -m");
        println!("\nUse --help for more options");
        return Ok(());
    }

    let decoder = Decoder::with_config(app_config.decoder.clone());
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock(), app_config.output.format);

    let failed = run(&args, &decoder, &mut writer)?;
    writer.flush()?;
    if failed > 0 {
        bail!("{} input(s) could not be decoded", failed);
    }
    Ok(())
}

/// Run every requested mode in order, returning how many inputs were rejected
///
/// Malformed `--dpcd` or `-p` input is reported with a usage hint and the
/// remaining modes still run. Read and write failures abort the run.
fn run<W: Write>(args: &Args, decoder: &Decoder, writer: &mut ReportWriter<W>) -> Result<usize> {
    let mut failed = 0;

    if let Some(dpcd) = &args.dpcd {
        match dpcd_input(dpcd, &args.base) {
            Ok((bytes, base)) => writer.session(&decoder.decode_bytes(&bytes, base))?,
            Err(e) => {
                log::error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if args.logs {
        let stdin = io::stdin();
        decode_log(decoder, stdin.lock(), writer).context("Failed to decode log from stdin")?;
    }

    if let Some(path) = &args.log_file {
        let file = File::open(path).with_context(|| format!("Failed to open log file: {:?}", path))?;
        decode_log(decoder, BufReader::new(file), writer)
            .with_context(|| format!("Failed to decode log file: {:?}", path))?;
    }

    if let Some(params) = &args.parse {
        let session = split_parse_args(params).and_then(|(addr, value)| {
            log::info!("addr: {} value: {}", addr, value);
            Ok(decoder.decode_manual_write(&addr, &value)?)
        });
        match session {
            Ok(session) => writer.session(&session)?,
            Err(e) => {
                log::error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if args.mapping {
        writer.mapping(&decoder.mapping())?;
    }

    Ok(failed)
}

/// Bytes and base address of the --dpcd input, with a usage hint on error
fn dpcd_input(dpcd: &str, base: &str) -> Result<(Vec<u8>, u32)> {
    let base = parse_hex_u32(base)
        .with_context(|| format!("Invalid --base {:?} (usage: {})", base, DPCD_HINT))?;
    let bytes = parse_dpcd_bytes(dpcd).with_context(|| format!("Invalid --dpcd input (usage: {})", DPCD_HINT))?;
    Ok((bytes, base))
}

/// Command line flags win over config file values
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if !args.port.is_empty() {
        config.decoder.port_filter = Some(args.port.clone());
    }
    if args.read_to_eof {
        config.decoder.stop_at_blank_line = false;
    }
    if args.verbose >= 2 {
        config.decoder.debug_windows = true;
    }
}

fn decode_log<R: BufRead, W: Write>(
    decoder: &Decoder,
    reader: R,
    writer: &mut ReportWriter<W>,
) -> Result<()> {
    let mut count = 0usize;
    for report in decoder.decode_log(reader) {
        writer.transaction(&report?)?;
        count += 1;
    }
    log::info!("Decoded {} AUX transactions", count);
    Ok(())
}

/// Parse `"12 14 c4"` (or `"0x12 0x14 0xc4"`) into bytes
fn parse_dpcd_bytes(input: &str) -> Result<Vec<u8>> {
    input
        .split_whitespace()
        .map(|token| {
            let digits = token.trim_start_matches("0x").trim_start_matches("0X");
            u8::from_str_radix(digits, 16).with_context(|| format!("Invalid DPCD byte {:?}", token))
        })
        .collect()
}

fn parse_hex_u32(input: &str) -> Result<u32> {
    let digits = input.trim().trim_start_matches("0x").trim_start_matches("0X");
    Ok(u32::from_str_radix(digits, 16)?)
}

/// `-p 0x3000 0x1` or `-p "0x3000 0x1"`
fn split_parse_args(params: &[String]) -> Result<(String, String)> {
    let parts: Vec<&str> = params.iter().flat_map(|p| p.split_whitespace()).collect();
    match parts.as_slice() {
        [addr, value] => Ok((addr.to_string(), value.to_string())),
        _ => bail!("Expected an address and a value, got {} arguments (usage: {})", parts.len(), USAGE_HINT),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dpcd_bytes() {
        assert_eq!(parse_dpcd_bytes("12 14 c4").unwrap(), vec![0x12, 0x14, 0xc4]);
        assert_eq!(parse_dpcd_bytes(" 0x01\t0XfF ").unwrap(), vec![0x01, 0xff]);
        assert!(parse_dpcd_bytes("12 1g").is_err());
        assert!(parse_dpcd_bytes("123").is_err());
    }

    #[test]
    fn test_split_parse_args() {
        let split = split_parse_args(&["0x3000 0x1".to_string()]).unwrap();
        assert_eq!(split, ("0x3000".to_string(), "0x1".to_string()));

        let split = split_parse_args(&["0x3000".to_string(), "0x1".to_string()]).unwrap();
        assert_eq!(split.1, "0x1");

        let err = split_parse_args(&["0x3000".to_string()]).unwrap_err();
        assert!(err.to_string().contains(USAGE_HINT));
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["dpcd-cli", "--logs", "--port", "eDP-1", "--read-to-eof", "-f", "json"]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.decoder.port_filter, Some(vec!["eDP-1".to_string()]));
        assert!(!config.decoder.stop_at_blank_line);
    }

    #[test]
    fn test_bad_dpcd_reports_hint_and_keeps_going() {
        let args = Args::parse_from(["dpcd-cli", "--dpcd", "12 zz", "-p", "0x600", "0x1", "-m"]);
        let decoder = Decoder::new();
        let mut buf = Vec::new();
        let failed = run(&args, &decoder, &mut ReportWriter::new(&mut buf, OutputFormat::Text)).unwrap();
        assert_eq!(failed, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("SET_POWER"));
        assert!(output.starts_with("  0x600"));
        assert!(output.contains("DPCD_REV"));

        let err = dpcd_input("12 zz", "0x0").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains(DPCD_HINT), "{}", message);
        assert!(message.contains("zz"), "{}", message);

        let err = dpcd_input("12", "0xnope").unwrap_err();
        assert!(format!("{:#}", err).contains(DPCD_HINT));
    }

    #[test]
    fn test_bad_parse_counts_as_failure() {
        let args = Args::parse_from(["dpcd-cli", "-p", "0x600", "zz", "--dpcd", "12"]);
        let decoder = Decoder::new();
        let mut buf = Vec::new();
        let failed = run(&args, &decoder, &mut ReportWriter::new(&mut buf, OutputFormat::Text)).unwrap();
        assert_eq!(failed, 1);
        assert!(String::from_utf8(buf).unwrap().contains("DPCD_REV"));
    }

    #[test]
    fn test_base_address() {
        assert_eq!(parse_hex_u32("0x2200").unwrap(), 0x2200);
        assert_eq!(parse_hex_u32("68000").unwrap(), 0x68000);
        assert!(parse_hex_u32("0xnope").is_err());
    }
}
