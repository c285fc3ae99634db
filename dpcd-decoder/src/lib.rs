//! DPCD Decoder Library
//!
//! A stateless, reusable library for decoding DisplayPort Configuration Data
//! (DPCD) register contents into labelled bit fields.
//!
//! # Architecture
//!
//! Decoding is driven by a static, ordered catalog of register descriptors:
//! - A descriptor covers an inclusive address range and either splits its
//!   bytes into bit fields (range) or renders them as one value (blob)
//! - The address walker resolves each position of a byte buffer to the first
//!   descriptor that accepts it and advances by the descriptor's full window
//! - Bytes no descriptor claims are kept as unparsed values
//! - Kernel trace logs are scanned for DPCD AUX transactions whose payloads
//!   are decoded at their own address
//!
//! The library does NOT:
//! - Talk to hardware or issue AUX transactions
//! - Print anything; results are plain data (and `Serialize`)
//!
//! Presentation lives in the application layer (dpcd-cli).
//!
//! # Example Usage
//!
//! ```
//! use dpcd_decoder::{Decoder, DecoderConfig};
//!
//! let decoder = Decoder::with_config(DecoderConfig::new());
//!
//! // DPCD_REV, MAX_LINK_RATE, MAX_LANE_COUNT
//! let session = decoder.decode_bytes(&[0x12, 0x14, 0xc4], 0x00000);
//!
//! for register in session.results() {
//!     println!("0x{:05x} {}", register.address(), register.register_label());
//! }
//! let rev = session.field("DPCD_REV", "Minor rev").unwrap();
//! assert_eq!(rev.raw_value, 2);
//! ```

// Public modules
pub mod command;
pub mod config;
pub mod decoder;
pub mod descriptor;
pub mod field_decoder;
pub mod registry;
pub mod render;
pub mod trace;
pub mod types;
pub mod walker;

// Re-export main types for convenience
pub use command::{parse_manual_write, to_bytes, ManualWrite};
pub use config::DecoderConfig;
pub use decoder::{Decoder, LogDecodingIterator, TransactionReport};
pub use descriptor::{Descriptor, DescriptorKind, FieldLayout, FieldSpec};
pub use registry::{DescriptorRegistry, MappingEntry, Overlap, RegistryStats};
pub use trace::TraceLogExtractor;
pub use types::{
    AuxOperation, AuxTransaction, BlobResult, DecodeSession, DecodedRegister, DecoderError,
    FieldResult, RangeResult, Result, UnparsedByte,
};
pub use walker::AddressWalker;

// Internal modules (not exposed in public API)
mod catalog;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
