//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! The Decoder struct bundles a descriptor registry with a configuration and
//! exposes the three ways of feeding it bytes: a raw register buffer, a kernel
//! trace log, or a single manual register write.

use crate::command;
use crate::config::DecoderConfig;
use crate::registry::{DescriptorRegistry, MappingEntry, RegistryStats};
use crate::trace::TraceLogExtractor;
use crate::types::{AuxTransaction, DecodeSession, Result};
use crate::walker::AddressWalker;
use serde::Serialize;
use std::io::BufRead;

enum RegistrySource {
    Standard(&'static DescriptorRegistry),
    Custom(DescriptorRegistry),
}

/// The main decoder struct - entry point for all decoding operations
pub struct Decoder {
    registry: RegistrySource,
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder over the built-in DPCD catalog
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder over the built-in DPCD catalog with a custom configuration
    ///
    /// # Example
    /// ```
    /// use dpcd_decoder::{Decoder, DecoderConfig};
    ///
    /// let decoder = Decoder::with_config(DecoderConfig::new().with_debug_windows(true));
    /// let session = decoder.decode_bytes(&[0x12], 0);
    /// assert_eq!(session.results().len(), 1);
    /// ```
    pub fn with_config(config: DecoderConfig) -> Self {
        let decoder = Self {
            registry: RegistrySource::Standard(DescriptorRegistry::standard()),
            config,
        };
        decoder.report_overlaps();
        decoder
    }

    /// Create a decoder over a caller supplied registry
    ///
    /// Overlaps in `registry` are logged when `config.report_overlaps` is set.
    pub fn with_registry(registry: DescriptorRegistry, config: DecoderConfig) -> Self {
        let decoder = Self {
            registry: RegistrySource::Custom(registry),
            config,
        };
        decoder.report_overlaps();
        decoder
    }

    fn report_overlaps(&self) {
        for warning in self.overlap_warnings() {
            log::warn!("{}", warning);
        }
    }

    /// Overlap warnings for the registry, empty unless `report_overlaps` is set
    pub fn overlap_warnings(&self) -> Vec<String> {
        if !self.config.report_overlaps {
            return Vec::new();
        }
        self.registry()
            .overlaps()
            .iter()
            .map(|o| {
                format!(
                    "catalog: '{}' overlaps '{}' at 0x{:05x}-0x{:05x}, '{}' wins",
                    o.first_label, o.second_label, o.start, o.end, o.first_label
                )
            })
            .collect()
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        match &self.registry {
            RegistrySource::Standard(registry) => *registry,
            RegistrySource::Custom(registry) => registry,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a register buffer whose first byte lives at `base_address`
    ///
    /// # Arguments
    /// * `buffer` - Raw register bytes, e.g. a DPCD dump
    /// * `base_address` - DPCD address of `buffer[0]`
    ///
    /// # Returns
    /// * `DecodeSession` - Decoded registers in address order plus unparsed bytes
    pub fn decode_bytes(&self, buffer: &[u8], base_address: u32) -> DecodeSession {
        log::info!("Decoding {} bytes at 0x{:05x}", buffer.len(), base_address);
        let session = AddressWalker::new(self.registry(), &self.config).walk(buffer, base_address);
        log::info!(
            "Decoded {} registers, {} unparsed bytes, {} field errors",
            session.results().len(),
            session.unparsed_count(),
            session.field_errors().len()
        );
        session
    }

    /// Decode the AUX transactions of a kernel trace log
    ///
    /// Returns an iterator that lazily reads `reader`, emitting one report per
    /// recognized transaction as soon as its line is read.
    ///
    /// # Example
    /// ```
    /// use dpcd_decoder::Decoder;
    /// use std::io::Cursor;
    ///
    /// let log = "[drm:drm_dp_dpcd_read] eDP-1: 0x00000 AUX_CH -> (ret=   1) 12\n";
    /// let decoder = Decoder::new();
    /// for report in decoder.decode_log(Cursor::new(log)) {
    ///     let report = report.unwrap();
    ///     assert_eq!(report.transaction.port, "eDP-1");
    /// }
    /// ```
    pub fn decode_log<R: BufRead>(&self, reader: R) -> LogDecodingIterator<'_, R> {
        log::info!("Decoding AUX transactions from trace log");
        LogDecodingIterator {
            extractor: TraceLogExtractor::with_config(reader, &self.config),
            walker: AddressWalker::new(self.registry(), &self.config),
        }
    }

    /// Decode a single register write given as hex strings (`0x3000`, `0x1`)
    ///
    /// The values are decoded as the window of the descriptor that accepts the
    /// address. Values past that window, or all values when no descriptor
    /// accepts the address, are reported as unparsed bytes at consecutive
    /// addresses.
    pub fn decode_manual_write(&self, addr_hex: &str, params_hex: &str) -> Result<DecodeSession> {
        let write = command::parse_manual_write(addr_hex, params_hex)?;
        let mut session = DecodeSession::new();

        let consumed = match self.registry().resolve(write.address) {
            Some(descriptor) => {
                let window_len = descriptor.window_len().min(write.values.len());
                log::debug!(
                    "Manual write at 0x{:05x} decoded as {}",
                    write.address,
                    descriptor.label
                );
                let (result, errors) = descriptor.decode(&write.values[..window_len]);
                session.record_result(result);
                for error in errors {
                    session.record_field_error(error);
                }
                window_len
            }
            None => {
                log::info!("No descriptor accepts address 0x{:05x}", write.address);
                0
            }
        };

        for (offset, value) in write.values.iter().enumerate().skip(consumed) {
            let Some(address) = u32::try_from(offset)
                .ok()
                .and_then(|o| write.address.checked_add(o))
            else {
                break;
            };
            session.record_unparsed(address, *value);
        }

        Ok(session)
    }

    /// Address map of the registry, sorted by start address
    pub fn mapping(&self) -> Vec<MappingEntry> {
        self.registry().mapping()
    }

    /// Get statistics about the registry
    pub fn registry_stats(&self) -> RegistryStats {
        self.registry().stats()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// One trace log transaction with the session decoded from its payload
#[derive(Debug, Serialize)]
pub struct TransactionReport {
    pub transaction: AuxTransaction,
    pub session: DecodeSession,
}

/// Iterator that decodes trace log transactions into reports
///
/// Every transaction gets a fresh session; the payload is walked starting at
/// the transaction's address.
pub struct LogDecodingIterator<'a, R> {
    extractor: TraceLogExtractor<R>,
    walker: AddressWalker<'a>,
}

impl<'a, R: BufRead> Iterator for LogDecodingIterator<'a, R> {
    type Item = Result<TransactionReport>;

    fn next(&mut self) -> Option<Self::Item> {
        let transaction = match self.extractor.next()? {
            Ok(tx) => tx,
            Err(e) => return Some(Err(e)),
        };

        log::debug!(
            "{} {} on {}: {} bytes at 0x{:05x}",
            transaction.type_tag,
            transaction.operation,
            transaction.port,
            transaction.payload.len(),
            transaction.address
        );
        let session = self.walker.walk(&transaction.payload, transaction.address);

        Some(Ok(TransactionReport {
            transaction,
            session,
        }))
    }
}
