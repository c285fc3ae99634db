//! Core types for the DPCD decoder library
//!
//! This module defines the values the decoder emits when it walks a register
//! buffer. Every [`DecodeSession`] is created by a single decode call and owns
//! everything it holds; nothing is shared between sessions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that can occur during decoding
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Invalid field spec '{label}' in {register}: end bit {end_bit} < start bit {start_bit}")]
    InvalidFieldSpec {
        register: String,
        label: String,
        start_bit: u8,
        end_bit: u8,
    },

    #[error("Field '{label}' in {register}: byte offset {offset} outside {window_len}-byte window")]
    FieldOffsetOutOfRange {
        register: String,
        label: String,
        offset: usize,
        window_len: usize,
    },

    #[error("Invalid descriptor {label}: start 0x{start:05x} > end 0x{end:05x}")]
    InvalidDescriptor { label: String, start: u32, end: u32 },

    #[error("Malformed input: {message} (usage: {hint})")]
    MalformedInput { message: String, hint: &'static str },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// AUX transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuxOperation {
    Read,
    Write,
}

impl fmt::Display for AuxOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuxOperation::Read => write!(f, "read"),
            AuxOperation::Write => write!(f, "write"),
        }
    }
}

/// One DPCD AUX transaction recovered from a kernel trace log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxTransaction {
    /// Timestamp as printed in the log (seconds since boot), if the line had one
    pub timestamp: Option<String>,
    /// Read or write
    pub operation: AuxOperation,
    /// Connector / AUX channel name (e.g. "eDP-1", "AUX A/DDI A/PHY A")
    pub port: String,
    /// First DPCD address touched by the transaction
    pub address: u32,
    /// Transaction type tag (e.g. "AUX_READ")
    pub type_tag: String,
    /// Return code reported by the kernel
    pub retcode: i32,
    /// Transferred bytes in the order they were logged
    pub payload: Vec<u8>,
}

impl AuxTransaction {
    /// Last address covered by the payload
    pub fn end_address(&self) -> u32 {
        let len = self.payload.len().max(1) as u32;
        self.address.saturating_add(len - 1)
    }
}

/// One decoded bit-field of a range register
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub register_label: String,
    pub byte_offset: usize,
    pub start_bit: u8,
    pub end_bit: u8,
    pub field_label: String,
    pub raw_value: u8,
    pub rendered_text: String,
}

/// All fields decoded from one range descriptor window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeResult {
    pub register_label: String,
    /// Descriptor start address
    pub address: u32,
    pub raw_bytes: Vec<u8>,
    pub fields: Vec<FieldResult>,
    /// True if the buffer ended before the descriptor's window did
    pub truncated: bool,
}

/// A blob descriptor window rendered as a single value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobResult {
    pub register_label: String,
    /// Descriptor start address
    pub address: u32,
    pub raw_bytes: Vec<u8>,
    pub rendered_text: String,
}

/// Output of decoding one descriptor window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecodedRegister {
    Range(RangeResult),
    Blob(BlobResult),
}

impl DecodedRegister {
    pub fn register_label(&self) -> &str {
        match self {
            DecodedRegister::Range(r) => &r.register_label,
            DecodedRegister::Blob(b) => &b.register_label,
        }
    }

    pub fn address(&self) -> u32 {
        match self {
            DecodedRegister::Range(r) => r.address,
            DecodedRegister::Blob(b) => b.address,
        }
    }

    pub fn raw_bytes(&self) -> &[u8] {
        match self {
            DecodedRegister::Range(r) => &r.raw_bytes,
            DecodedRegister::Blob(b) => &b.raw_bytes,
        }
    }
}

/// A byte that no descriptor claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnparsedByte {
    pub address: u32,
    pub raw_value: u8,
}

/// Everything produced by one decode invocation
#[derive(Debug, Default, Serialize)]
pub struct DecodeSession {
    results: Vec<DecodedRegister>,
    unparsed: BTreeMap<u32, UnparsedByte>,
    #[serde(serialize_with = "serialize_errors")]
    field_errors: Vec<DecoderError>,
}

fn serialize_errors<S>(errors: &[DecoderError], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

impl DecodeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_result(&mut self, result: DecodedRegister) {
        self.results.push(result);
    }

    pub fn record_unparsed(&mut self, address: u32, raw_value: u8) {
        self.unparsed.insert(address, UnparsedByte { address, raw_value });
    }

    pub fn record_field_error(&mut self, error: DecoderError) {
        log::warn!("{}", error);
        self.field_errors.push(error);
    }

    /// Decoded registers in walk order
    pub fn results(&self) -> &[DecodedRegister] {
        &self.results
    }

    /// Unparsed bytes ordered by address
    pub fn unparsed(&self) -> impl Iterator<Item = &UnparsedByte> {
        self.unparsed.values()
    }

    pub fn unparsed_count(&self) -> usize {
        self.unparsed.len()
    }

    pub fn field_errors(&self) -> &[DecoderError] {
        &self.field_errors
    }

    /// Iterate over every field of every range register, in order
    pub fn fields(&self) -> impl Iterator<Item = &FieldResult> {
        self.results.iter().flat_map(|r| match r {
            DecodedRegister::Range(range) => range.fields.as_slice(),
            DecodedRegister::Blob(_) => &[],
        })
    }

    /// Find the first field with the given register and field label
    pub fn field(&self, register: &str, field: &str) -> Option<&FieldResult> {
        self.fields()
            .find(|f| f.register_label == register && f.field_label == field)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.unparsed.is_empty()
    }
}
