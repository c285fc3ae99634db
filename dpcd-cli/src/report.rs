//! Report generation
//!
//! Writes decode sessions, trace log transactions and the address map either
//! as aligned text columns or as JSON.

use crate::config::OutputFormat;
use dpcd_decoder::{AuxTransaction, DecodeSession, DecodedRegister, MappingEntry, TransactionReport};
use std::io::{self, Write};

/// Writes reports in one output format
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn session(&mut self, session: &DecodeSession) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write_session(&mut self.out, session),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, session)?;
                writeln!(self.out)
            }
        }
    }

    /// One trace log transaction; JSON output is one document per line
    pub fn transaction(&mut self, report: &TransactionReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", transaction_header(&report.transaction))?;
                write_session(&mut self.out, &report.session)
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, report)?;
                writeln!(self.out)
            }
        }
    }

    pub fn mapping(&mut self, entries: &[MappingEntry]) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write_mapping(&mut self.out, entries),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, entries)?;
                writeln!(self.out)
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn hex_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:#x}", b))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `[timestamp] type operation [start:end] on port`
pub fn transaction_header(tx: &AuxTransaction) -> String {
    format!(
        "[{}] {} {} [{:#x}:{:#x}] on {}",
        tx.timestamp.as_deref().unwrap_or("-"),
        tx.type_tag,
        tx.operation,
        tx.address,
        tx.end_address(),
        tx.port
    )
}

fn write_session<W: Write>(out: &mut W, session: &DecodeSession) -> io::Result<()> {
    for register in session.results() {
        let address = format!("{:#x}", register.address());
        writeln!(
            out,
            "  {:<10}{:<41}[{}]",
            address,
            register.register_label(),
            hex_list(register.raw_bytes())
        )?;

        match register {
            DecodedRegister::Range(range) => {
                for field in &range.fields {
                    let value = field.raw_value.to_string();
                    writeln!(
                        out,
                        "    [{:<3}{}:{}] {:<40}{}",
                        value, field.start_bit, field.end_bit, field.field_label, field.rendered_text
                    )?;
                }
                if range.truncated {
                    writeln!(out, "    (window truncated, {} bytes available)", range.raw_bytes.len())?;
                }
            }
            DecodedRegister::Blob(blob) => {
                writeln!(out, "  {:<11}{:<40}{}", "", "Value", blob.rendered_text)?;
            }
        }
    }

    if !session.field_errors().is_empty() {
        writeln!(out)?;
        writeln!(out, "-- Field errors")?;
        for error in session.field_errors() {
            writeln!(out, "  {}", error)?;
        }
    }

    if session.unparsed_count() == 0 {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "-- Unparsed values")?;
    for byte in session.unparsed() {
        let address = format!("{:#x}", byte.address);
        writeln!(out, "{:<10}{:<41}[{:#x}]", address, "UNKNOWN", byte.raw_value)?;
    }
    Ok(())
}

fn write_mapping<W: Write>(out: &mut W, entries: &[MappingEntry]) -> io::Result<()> {
    writeln!(out, "{:<10}{:<10}{:<7}{}", "START", "END", "KIND", "REGISTER")?;
    for entry in entries {
        writeln!(
            out,
            "{:<10}{:<10}{:<7}{}",
            format!("{:#07x}", entry.start),
            format!("{:#07x}", entry.end),
            entry.kind,
            entry.label
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpcd_decoder::{AuxOperation, Decoder};

    fn render_text(session: &DecodeSession) -> String {
        let mut buf = Vec::new();
        ReportWriter::new(&mut buf, OutputFormat::Text).session(session).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_range_layout() {
        let session = Decoder::new().decode_bytes(&[0x12], 0);
        let text = render_text(&session);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("  {:<10}{:<41}[0x12]", "0x0", "DPCD_REV"));
        assert_eq!(lines[1], format!("    [1  4:7] {:<40}1", "Major rev"));
        assert_eq!(lines[2], format!("    [2  0:3] {:<40}2", "Minor rev"));
        assert!(!text.contains("Unparsed"));
    }

    #[test]
    fn test_blob_and_unparsed_sections() {
        let session = Decoder::new().decode_bytes(&[0x00, 0x1c, 0xf8], 0x400);
        let text = render_text(&session);
        assert!(text.contains(&format!("  {:<11}{:<40}00-1c-f8", "", "Value")));

        let session = Decoder::new().decode_bytes(&[0xab], 0x0f);
        let text = render_text(&session);
        assert!(text.contains("-- Unparsed values"));
        assert!(text.contains(&format!("{:<10}{:<41}[0xab]", "0xf", "UNKNOWN")));
    }

    #[test]
    fn test_transaction_header() {
        let tx = AuxTransaction {
            timestamp: Some("12.5".to_string()),
            operation: AuxOperation::Read,
            port: "eDP-1".to_string(),
            address: 0x2202,
            type_tag: "AUX_READ".to_string(),
            retcode: 2,
            payload: vec![0x0a, 0x01],
        };
        assert_eq!(transaction_header(&tx), "[12.5] AUX_READ read [0x2202:0x2203] on eDP-1");
    }

    #[test]
    fn test_json_log_lines() {
        let log = "[drm:drm_dp_dpcd_read] eDP-1: 0x00000 AUX_CH -> (ret=   1) 12\n\
                   [drm:drm_dp_dpcd_read] eDP-1: 0x00001 AUX_CH -> (ret=   1) 14\n";
        let decoder = Decoder::new();
        let mut buf = Vec::new();
        let mut writer = ReportWriter::new(&mut buf, OutputFormat::Json);
        for report in decoder.decode_log(std::io::Cursor::new(log)) {
            writer.transaction(&report.unwrap()).unwrap();
        }
        drop(writer);
        let output = String::from_utf8(buf).unwrap();

        let docs: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["transaction"]["operation"], "read");
        assert_eq!(docs[1]["transaction"]["address"], 1);
        assert_eq!(docs[1]["session"]["results"][0]["kind"], "range");
    }

    #[test]
    fn test_mapping_text() {
        let mapping = Decoder::new().mapping();
        let mut buf = Vec::new();
        ReportWriter::new(&mut buf, OutputFormat::Text).mapping(&mapping).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), mapping.len() + 1);
        assert!(text.lines().nth(1).unwrap().starts_with("0x00000   0x00000   range  DPCD_REV"));
    }
}
