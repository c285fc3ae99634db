//! Address walker
//!
//! Drives the resolve → decode → advance loop over a register buffer. Every
//! iteration advances the cursor by at least one byte, so a walk always ends.

use crate::config::DecoderConfig;
use crate::registry::DescriptorRegistry;
use crate::types::DecodeSession;

/// Walks byte buffers against a descriptor registry
pub struct AddressWalker<'a> {
    registry: &'a DescriptorRegistry,
    config: &'a DecoderConfig,
}

impl<'a> AddressWalker<'a> {
    pub fn new(registry: &'a DescriptorRegistry, config: &'a DecoderConfig) -> Self {
        Self { registry, config }
    }

    /// Decode `buffer`, whose first byte lives at `base_address`
    pub fn walk(&self, buffer: &[u8], base_address: u32) -> DecodeSession {
        let mut session = DecodeSession::new();
        self.walk_into(&mut session, buffer, base_address);
        session
    }

    /// Same as [`walk`](Self::walk), appending to an existing session
    pub fn walk_into(&self, session: &mut DecodeSession, buffer: &[u8], base_address: u32) {
        let mut cursor = 0usize;

        while cursor < buffer.len() {
            let Some(address) = u32::try_from(cursor)
                .ok()
                .and_then(|offset| base_address.checked_add(offset))
            else {
                log::warn!(
                    "Buffer runs past the 32-bit address space at offset {}, {} bytes left undecoded",
                    cursor,
                    buffer.len() - cursor
                );
                break;
            };

            match self.registry.resolve(address) {
                None => {
                    log::trace!("0x{:05x}: no descriptor, unparsed 0x{:02x}", address, buffer[cursor]);
                    session.record_unparsed(address, buffer[cursor]);
                    cursor += 1;
                }
                Some(descriptor) => {
                    let window_len = descriptor.window_len();
                    let window_end = buffer.len().min(cursor + window_len);
                    let window = &buffer[cursor..window_end];

                    if self.config.debug_windows {
                        log::debug!(
                            "0x{:05x}: {} [{}]",
                            address,
                            descriptor.label,
                            crate::render::hex_bytes(window)
                        );
                    }

                    let (result, errors) = descriptor.decode(window);
                    session.record_result(result);
                    for error in errors {
                        session.record_field_error(error);
                    }
                    cursor += window_len;
                }
            }
        }
    }
}
