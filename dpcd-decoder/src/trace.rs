//! Kernel trace log extraction
//!
//! Recognizes DPCD AUX transactions logged by the DRM DisplayPort helpers,
//! either in `dmesg` style or through the `drm_trace_printf` ftrace event:
//!
//! ```text
//! [   12.345678] [drm:drm_dp_dpcd_read] eDP-1: 0x00000 AUX_CH -> (ret=  15) 12 14 c4 01
//! kworker/u8:2-123   [001] ....  123.456789: drm_trace_printf: [drm:drm_dp_dpcd_write] DP-1: 0x00100 AUX_CH <- (ret=   1) 14
//! ```
//!
//! Lines that do not match are skipped; log files are full of unrelated text.

use crate::config::DecoderConfig;
use crate::types::{AuxOperation, AuxTransaction, Result};
use regex::{Captures, Regex};
use std::io::BufRead;
use std::iter::FusedIterator;
use std::sync::LazyLock;

/// `task-pid [cpu] flags timestamp: drm_trace_printf:`
const SCHED_TIMESTAMP: &str = r"\S+-[0-9]+\s+\[[0-9]+\]\s+\S+\s+([0-9]+\.[0-9]+):\s+drm_trace_printf:";

/// `[timestamp]` or `[cpu timestamp]`
const LEGACY_TIMESTAMP: &str = r"\[\s*(?:[0-9]+\s+)?([0-9]+\.[0-9]+)\]";

/// `i915 0000:00:02.0:` printed by `drm_dbg_kms` on newer kernels
const DEVICE_PREFIX: &str = r"\S+\s+\S+:";

/// `[drm:drm_dp_dpcd_read] port: 0xADDR TYPE -> (ret= N) aa bb ...`
const AUX_TAIL: &str = concat!(
    r"\[(?:drm:)?drm_dp_dpcd_(read|write)(?:\s+\[[\w-]+\])?\]",
    r"\s+([^:]+):",
    r"\s+0x([0-9A-Fa-f]+)",
    r"\s+(\S+)",
    r"\s+-[<>]",
    r"\s+\(ret=\s*(-?[0-9]+)\)",
    r"\s+((?:[0-9A-Fa-f]{2}\s?)+)",
);

static AUX_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = [
        r"(?:(?:",
        SCHED_TIMESTAMP,
        "|",
        LEGACY_TIMESTAMP,
        r")\s+)?(?:",
        DEVICE_PREFIX,
        r"\s+)?",
        AUX_TAIL,
    ]
    .concat();
    Regex::new(&pattern).expect("Invalid AUX trace line regex pattern")
});

/// Lazy iterator over the AUX transactions of a trace log
///
/// Consumes the reader line by line. Bytes that are not valid UTF-8 are
/// replaced, so such lines are skipped like any other unrelated text.
/// Iteration ends at end of stream or, when configured, at the first blank
/// line; read errors are yielded once and end the iteration.
pub struct TraceLogExtractor<R> {
    reader: R,
    buf: Vec<u8>,
    config: DecoderConfig,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> TraceLogExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: &DecoderConfig) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            config: config.clone(),
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

/// Parse a single log line
///
/// Returns `None` for lines that are not DPCD AUX transactions.
pub fn parse_line(line: &str) -> Option<AuxTransaction> {
    let caps = AUX_LINE_RE.captures(line)?;
    transaction_from(&caps)
}

fn transaction_from(caps: &Captures<'_>) -> Option<AuxTransaction> {
    let timestamp = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string());

    let operation = match &caps[3] {
        "read" => AuxOperation::Read,
        _ => AuxOperation::Write,
    };

    let address = match u32::from_str_radix(&caps[5], 16) {
        Ok(a) => a,
        Err(e) => {
            log::trace!("Skipping AUX line with bad address 0x{}: {}", &caps[5], e);
            return None;
        }
    };

    let retcode = match caps[7].parse::<i32>() {
        Ok(r) => r,
        Err(e) => {
            log::trace!("Skipping AUX line with bad return code {}: {}", &caps[7], e);
            return None;
        }
    };

    Some(AuxTransaction {
        timestamp,
        operation,
        port: caps[4].trim().to_string(),
        address,
        type_tag: caps[6].to_string(),
        retcode,
        payload: parse_hex_run(&caps[8]),
    })
}

/// Parse a run of hex byte pairs, with or without separating whitespace
fn parse_hex_run(run: &str) -> Vec<u8> {
    let digits: Vec<u8> = run
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .filter_map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect();
    digits.chunks_exact(2).map(|pair| pair[0] << 4 | pair[1]).collect()
}

impl<R: BufRead> Iterator for TraceLogExtractor<R> {
    type Item = Result<AuxTransaction>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
            self.line_no += 1;

            let raw = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf[..]);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw);

            if self.config.stop_at_blank_line && line.is_empty() {
                log::debug!("Blank line at line {}, stopping", self.line_no);
                self.done = true;
                break;
            }

            let Some(tx) = parse_line(&line) else {
                log::trace!("line {}: not an AUX transaction", self.line_no);
                continue;
            };

            if !self.config.should_process_transaction(&tx.port, tx.operation) {
                log::trace!("line {}: filtered out ({} on {})", self.line_no, tx.operation, tx.port);
                continue;
            }

            return Some(Ok(tx));
        }
        None
    }
}

impl<R: BufRead> FusedIterator for TraceLogExtractor<R> {}
