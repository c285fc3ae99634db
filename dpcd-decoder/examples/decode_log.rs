//! Standalone DPCD trace log summary tool
//!
//! This tool reads a kernel log with DRM DPCD tracing enabled and prints each
//! AUX transaction together with the registers it touched, followed by a
//! per-port summary.
//!
//! Usage:
//!   decode_log <dmesg.txt> [--limit <count>] [--port <name>] [--verbose]
//!
//! Example:
//!   decode_log boot.log --port eDP-1 --limit 50

use dpcd_decoder::{AuxOperation, DecodedRegister, Decoder, DecoderConfig, TransactionReport};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Default)]
struct LogStats {
    transactions: usize,
    reads: usize,
    writes: usize,
    failed: usize,
    registers_decoded: usize,
    unparsed_bytes: usize,
    per_port: HashMap<String, usize>,
    per_register: HashMap<String, usize>,
}

impl LogStats {
    fn record(&mut self, report: &TransactionReport) {
        let tx = &report.transaction;
        self.transactions += 1;
        match tx.operation {
            AuxOperation::Read => self.reads += 1,
            AuxOperation::Write => self.writes += 1,
        }
        if tx.retcode < 0 {
            self.failed += 1;
        }
        *self.per_port.entry(tx.port.clone()).or_insert(0) += 1;

        self.registers_decoded += report.session.results().len();
        self.unparsed_bytes += report.session.unparsed_count();
        for register in report.session.results() {
            *self
                .per_register
                .entry(register.register_label().to_string())
                .or_insert(0) += 1;
        }
    }

    fn print_summary(&self) {
        println!("\n=== DECODING SUMMARY ===");
        println!("AUX transactions: {}", self.transactions);
        println!("Reads: {}", self.reads);
        println!("Writes: {}", self.writes);
        println!("Failed (ret < 0): {}", self.failed);
        println!("Registers decoded: {}", self.registers_decoded);
        println!("Unparsed bytes: {}", self.unparsed_bytes);

        if !self.per_port.is_empty() {
            println!("\nTransactions per port:");
            let mut ports: Vec<_> = self.per_port.iter().collect();
            ports.sort();
            for (port, count) in ports {
                println!("  {}: {}", port, count);
            }
        }

        if !self.per_register.is_empty() {
            println!("\nTop 10 Most Accessed Registers:");
            let mut sorted: Vec<_> = self.per_register.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (name, count) in sorted.iter().take(10) {
                println!("  {}: {} times", name, count);
            }
        }
    }
}

fn print_report(report: &TransactionReport, verbose: bool) {
    let tx = &report.transaction;
    println!(
        "[{}] {} {} [0x{:05x}:0x{:05x}] on {} (ret={})",
        tx.timestamp.as_deref().unwrap_or("-"),
        tx.type_tag,
        tx.operation,
        tx.address,
        tx.end_address(),
        tx.port,
        tx.retcode
    );

    for register in report.session.results() {
        match register {
            DecodedRegister::Range(range) => {
                println!("    0x{:05x} {}", range.address, range.register_label);
                if verbose {
                    for field in &range.fields {
                        println!("        {}: {}", field.field_label, field.rendered_text);
                    }
                }
            }
            DecodedRegister::Blob(blob) => {
                println!("    0x{:05x} {} = {}", blob.address, blob.register_label, blob.rendered_text);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <dmesg.txt> [--limit <count>] [--port <name>] [--verbose]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} boot.log --port eDP-1 --limit 50", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut limit: Option<usize> = None;
    let mut ports = Vec::new();
    let mut verbose = false;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = Some(args[i].parse()?);
                }
            }
            "--port" => {
                i += 1;
                if i < args.len() {
                    ports.push(args[i].clone());
                }
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("=== DPCD Trace Log Decoder ===");
    println!("Log file: {:?}", log_file);
    if let Some(n) = limit {
        println!("Limit: {} transactions", n);
    }
    println!("Verbose: {}", verbose);
    println!();

    // Kernel logs have blank lines; read the whole file
    let mut config = DecoderConfig::new().with_stop_at_blank_line(false);
    if !ports.is_empty() {
        config = config.with_port_filter(ports);
    }
    let decoder = Decoder::with_config(config);

    let stats = decoder.registry_stats();
    println!("=== DESCRIPTOR CATALOG ===");
    println!("Descriptors: {} ({} range, {} blob)", stats.num_descriptors, stats.num_range, stats.num_blob);
    println!("Covered addresses: {}", stats.covered_addresses);
    println!();

    println!("=== DECODING LOG FILE ===\n");
    let reader = BufReader::new(File::open(&log_file)?);
    let mut log_stats = LogStats::default();
    let mut shown = 0;

    for result in decoder.decode_log(reader) {
        match result {
            Ok(report) => {
                log_stats.record(&report);

                if let Some(max) = limit {
                    if shown >= max {
                        continue;
                    }
                }
                print_report(&report, verbose);
                shown += 1;
            }
            Err(e) => {
                eprintln!("Error reading log: {}", e);
            }
        }
    }

    if let Some(max) = limit {
        if shown >= max && log_stats.transactions > max {
            println!("\n... (limit of {} transactions reached)", max);
        }
    }

    log_stats.print_summary();

    Ok(())
}
