//! Field Decoding Engine
//!
//! Extracts bit-field values from a descriptor window and renders them, or
//! renders a blob window as one value. Failures are scoped to the field that
//! caused them; the rest of the window is still decoded.

use crate::descriptor::{BlobRenderFn, FieldSpec};
use crate::types::{BlobResult, DecoderError, FieldResult, RangeResult, Result};

/// Decoder for bit-field (range) descriptors
pub struct RangeDecoder;

impl RangeDecoder {
    /// Decode every field spec against `window`
    ///
    /// # Arguments
    /// * `register` - Descriptor label, copied into each result
    /// * `address` - Descriptor start address
    /// * `window_len` - Width the descriptor declares
    /// * `window` - Bytes actually available (may be shorter than `window_len`)
    /// * `fields` - Layout to apply, in evaluation order
    ///
    /// # Returns
    /// The decoded register and the field errors that were skipped over
    pub fn decode(
        register: &str,
        address: u32,
        window_len: usize,
        window: &[u8],
        fields: &[FieldSpec],
    ) -> (RangeResult, Vec<DecoderError>) {
        let mut decoded = Vec::with_capacity(fields.len());
        let mut errors = Vec::new();
        let mut truncated = window.len() < window_len;

        for spec in fields {
            if let Err(e) = Self::check_spec(register, spec, window_len) {
                errors.push(e);
                continue;
            }

            // Valid spec, but the buffer ended early
            let Some(&byte) = window.get(spec.byte_offset) else {
                log::debug!(
                    "{}: skipping '{}', byte {} not in {}-byte window",
                    register,
                    spec.label,
                    spec.byte_offset,
                    window.len()
                );
                truncated = true;
                continue;
            };

            let raw_value = Self::extract_field(byte, spec.start_bit, spec.end_bit);
            let rendered_text = match spec.render {
                Some(render) => render(raw_value),
                None => raw_value.to_string(),
            };

            decoded.push(FieldResult {
                register_label: register.to_string(),
                byte_offset: spec.byte_offset,
                start_bit: spec.start_bit,
                end_bit: spec.end_bit,
                field_label: spec.label.to_string(),
                raw_value,
                rendered_text,
            });
        }

        let result = RangeResult {
            register_label: register.to_string(),
            address,
            raw_bytes: window.to_vec(),
            fields: decoded,
            truncated,
        };

        (result, errors)
    }

    /// Validate a field spec against the descriptor window width
    pub fn check_spec(register: &str, spec: &FieldSpec, window_len: usize) -> Result<()> {
        if spec.end_bit < spec.start_bit || spec.end_bit > 7 {
            return Err(DecoderError::InvalidFieldSpec {
                register: register.to_string(),
                label: spec.label.to_string(),
                start_bit: spec.start_bit,
                end_bit: spec.end_bit,
            });
        }

        if spec.byte_offset >= window_len {
            return Err(DecoderError::FieldOffsetOutOfRange {
                register: register.to_string(),
                label: spec.label.to_string(),
                offset: spec.byte_offset,
                window_len,
            });
        }

        Ok(())
    }

    /// Extract bits `start_bit..=end_bit` of `byte`, LSB numbered 0
    ///
    /// Callers must have checked `start_bit <= end_bit <= 7`.
    pub fn extract_field(byte: u8, start_bit: u8, end_bit: u8) -> u8 {
        let end_mask = (1u16 << (end_bit + 1)) - 1;
        let start_mask = (1u16 << start_bit) - 1;
        let mask = (end_mask ^ start_mask) as u8;
        (byte & mask) >> start_bit
    }
}

/// Decoder for opaque (blob) descriptors
pub struct BlobDecoder;

impl BlobDecoder {
    /// Render the whole window as one value
    pub fn decode(register: &str, address: u32, window: &[u8], render: BlobRenderFn) -> BlobResult {
        BlobResult {
            register_label: register.to_string(),
            address,
            raw_bytes: window.to_vec(),
            rendered_text: render(window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;

    const REV_FIELDS: &[FieldSpec] = &[
        FieldSpec::bits("Major rev", 0, 4, 7),
        FieldSpec::bits("Minor rev", 0, 0, 3),
    ];

    #[test]
    fn test_extract_field_nibbles() {
        assert_eq!(RangeDecoder::extract_field(0x12, 0, 3), 0x2);
        assert_eq!(RangeDecoder::extract_field(0x12, 4, 7), 0x1);
    }

    #[test]
    fn test_extract_field_single_bits() {
        // 0b1010_0101
        let byte = 0xA5;
        let bits: Vec<u8> = (0..8).map(|b| RangeDecoder::extract_field(byte, b, b)).collect();
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_extract_full_byte() {
        assert_eq!(RangeDecoder::extract_field(0xFF, 0, 7), 0xFF);
        assert_eq!(RangeDecoder::extract_field(0x9C, 2, 6), 0x07);
    }

    #[test]
    fn test_decode_dpcd_rev() {
        let (result, errors) = RangeDecoder::decode("DPCD_REV", 0, 1, &[0x12], REV_FIELDS);
        assert!(errors.is_empty());
        assert!(!result.truncated);
        assert_eq!(result.fields.len(), 2);
        assert_eq!(result.fields[0].field_label, "Major rev");
        assert_eq!(result.fields[0].raw_value, 1);
        assert_eq!(result.fields[0].rendered_text, "1");
        assert_eq!(result.fields[1].raw_value, 2);
        assert_eq!(result.fields[1].register_label, "DPCD_REV");
    }

    #[test]
    fn test_bad_field_does_not_stop_the_rest() {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::bits("Inverted", 0, 6, 1),
            FieldSpec::bit("Too far", 2, 0),
            FieldSpec::bit("Fine", 0, 7),
        ];
        let (result, errors) = RangeDecoder::decode("REG", 0x10, 2, &[0x80, 0x00], FIELDS);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], DecoderError::InvalidFieldSpec { .. }));
        assert!(matches!(errors[1], DecoderError::FieldOffsetOutOfRange { window_len: 2, .. }));
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.fields[0].field_label, "Fine");
        assert_eq!(result.fields[0].raw_value, 1);
    }

    #[test]
    fn test_truncated_window_skips_missing_bytes() {
        const FIELDS: &[FieldSpec] = &[
            FieldSpec::bit("Low", 0, 0),
            FieldSpec::bits("Second byte", 1, 0, 7),
        ];
        let (result, errors) = RangeDecoder::decode("REG", 0x8, 2, &[0x01], FIELDS);
        assert!(errors.is_empty());
        assert!(result.truncated);
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.raw_bytes, vec![0x01]);
    }

    #[test]
    fn test_render_function_applied() {
        const FIELDS: &[FieldSpec] = &[FieldSpec::bit("Flag", 0, 0).render(render::supported)];
        let (result, _) = RangeDecoder::decode("REG", 0, 1, &[0x01], FIELDS);
        assert_eq!(result.fields[0].rendered_text, "supported");
    }

    #[test]
    fn test_blob_decode() {
        let result = BlobDecoder::decode("Sink IEEE_OUI", 0x400, &[0x00, 0x1b, 0xc5], render::ieee_oui);
        assert_eq!(result.rendered_text, "00-1b-c5");
        assert_eq!(result.raw_bytes, vec![0x00, 0x1b, 0xc5]);
        assert_eq!(result.address, 0x400);
    }
}
