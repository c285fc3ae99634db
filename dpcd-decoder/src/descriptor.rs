//! Register descriptors
//!
//! A [`Descriptor`] describes how to decode the fixed-width window that starts
//! at a DPCD address. Descriptors are plain data: labels, address bounds and
//! function pointers, so whole catalogs can be declared as `const` tables.

use crate::field_decoder::{BlobDecoder, RangeDecoder};
use crate::types::{DecodedRegister, DecoderError};
use std::borrow::Cow;

/// Renders the raw value of a bit-field
pub type RenderFn = fn(u8) -> String;

/// Renders the whole window of a blob descriptor
pub type BlobRenderFn = fn(&[u8]) -> String;

/// Computes a field layout from the window contents
pub type LayoutFn = fn(&[u8]) -> Vec<FieldSpec>;

/// One row of a range descriptor's bit layout
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub label: &'static str,
    /// Byte within the descriptor window
    pub byte_offset: usize,
    /// Inclusive, bit 0 is the LSB
    pub start_bit: u8,
    /// Inclusive
    pub end_bit: u8,
    /// Defaults to the decimal value when absent
    pub render: Option<RenderFn>,
}

impl FieldSpec {
    /// Multi-bit field `start_bit..=end_bit` of byte `byte_offset`
    pub const fn bits(label: &'static str, byte_offset: usize, start_bit: u8, end_bit: u8) -> Self {
        Self {
            label,
            byte_offset,
            start_bit,
            end_bit,
            render: None,
        }
    }

    /// Single-bit field
    pub const fn bit(label: &'static str, byte_offset: usize, bit: u8) -> Self {
        Self::bits(label, byte_offset, bit, bit)
    }

    /// Attach a render function
    pub const fn render(self, render: RenderFn) -> Self {
        Self {
            render: Some(render),
            ..self
        }
    }

    /// Field width in bits (0 for an inverted spec)
    pub fn width(&self) -> u8 {
        if self.end_bit < self.start_bit {
            0
        } else {
            self.end_bit - self.start_bit + 1
        }
    }
}

/// Field layout of a range descriptor
#[derive(Debug, Clone, Copy)]
pub enum FieldLayout {
    /// Same fields for every window
    Fixed(&'static [FieldSpec]),
    /// Fields depend on the window contents
    Computed(LayoutFn),
}

/// How a descriptor window is decoded
#[derive(Debug, Clone, Copy)]
pub enum DescriptorKind {
    /// Decoded bit-by-bit; only resolves at its exact start address
    Range(FieldLayout),
    /// Decoded as one value; resolves anywhere inside its range
    Blob(BlobRenderFn),
}

/// A catalog entry covering the DPCD addresses `start..=end`
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub label: &'static str,
    pub start: u32,
    pub end: u32,
    pub kind: DescriptorKind,
}

impl Descriptor {
    pub const fn range(label: &'static str, start: u32, end: u32, fields: &'static [FieldSpec]) -> Self {
        Self {
            label,
            start,
            end,
            kind: DescriptorKind::Range(FieldLayout::Fixed(fields)),
        }
    }

    pub const fn computed(label: &'static str, start: u32, end: u32, layout: LayoutFn) -> Self {
        Self {
            label,
            start,
            end,
            kind: DescriptorKind::Range(FieldLayout::Computed(layout)),
        }
    }

    pub const fn blob(label: &'static str, start: u32, end: u32, render: BlobRenderFn) -> Self {
        Self {
            label,
            start,
            end,
            kind: DescriptorKind::Blob(render),
        }
    }

    /// Number of bytes the descriptor consumes
    pub fn window_len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize + 1
    }

    pub fn is_blob(&self) -> bool {
        matches!(self.kind, DescriptorKind::Blob(_))
    }

    /// Acceptance rule used by the registry
    pub fn accepts(&self, address: u32) -> bool {
        match self.kind {
            DescriptorKind::Blob(_) => self.start <= address && address <= self.end,
            DescriptorKind::Range(_) => address == self.start,
        }
    }

    pub fn overlaps(&self, other: &Descriptor) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Field specs that apply to this window (empty for blobs)
    pub fn fields_for(&self, window: &[u8]) -> Cow<'static, [FieldSpec]> {
        match self.kind {
            DescriptorKind::Range(FieldLayout::Fixed(fields)) => Cow::Borrowed(fields),
            DescriptorKind::Range(FieldLayout::Computed(layout)) => Cow::Owned(layout(window)),
            DescriptorKind::Blob(_) => Cow::Borrowed(&[]),
        }
    }

    /// Static sanity checks on the descriptor and its fixed layout
    ///
    /// Computed layouts can only be checked once a window is known, so they are
    /// validated by the range decoder at decode time.
    pub fn validate(&self) -> Vec<DecoderError> {
        let mut problems = Vec::new();

        if self.start > self.end {
            problems.push(DecoderError::InvalidDescriptor {
                label: self.label.to_string(),
                start: self.start,
                end: self.end,
            });
            return problems;
        }

        if let DescriptorKind::Range(FieldLayout::Fixed(fields)) = self.kind {
            for spec in fields {
                if let Err(e) = RangeDecoder::check_spec(self.label, spec, self.window_len()) {
                    problems.push(e);
                }
            }
        }

        problems
    }

    /// Decode one window of this descriptor
    ///
    /// Field-level failures are returned next to the result so the caller can
    /// keep walking.
    pub fn decode(&self, window: &[u8]) -> (DecodedRegister, Vec<DecoderError>) {
        match self.kind {
            DescriptorKind::Range(_) => {
                let fields = self.fields_for(window);
                let (result, errors) =
                    RangeDecoder::decode(self.label, self.start, self.window_len(), window, &fields);
                (DecodedRegister::Range(result), errors)
            }
            DescriptorKind::Blob(render) => {
                let result = BlobDecoder::decode(self.label, self.start, window, render);
                (DecodedRegister::Blob(result), Vec::new())
            }
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
    fn test_acceptance_rules() {
        let range = Descriptor::range("RANGE", 0x10, 0x11, REV_FIELDS);
        assert!(range.accepts(0x10));
        assert!(!range.accepts(0x11));
        assert!(!range.accepts(0x0F));

        let blob = Descriptor::blob("BLOB", 0x20, 0x2F, render::hex_bytes);
        assert!(blob.accepts(0x20));
        assert!(blob.accepts(0x27));
        assert!(blob.accepts(0x2F));
        assert!(!blob.accepts(0x30));
        assert_eq!(blob.window_len(), 16);
    }

    #[test]
    fn test_validate_reports_bad_specs() {
        const BAD: &[FieldSpec] = &[
            FieldSpec::bits("Inverted", 0, 5, 2),
            FieldSpec::bit("Past the window", 3, 0),
        ];
        let desc = Descriptor::range("BAD", 0x100, 0x101, BAD);
        let problems = desc.validate();
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], DecoderError::InvalidFieldSpec { .. }));
        assert!(matches!(problems[1], DecoderError::FieldOffsetOutOfRange { offset: 3, .. }));
    }

    #[test]
    fn test_validate_inverted_range() {
        let desc = Descriptor::blob("BACKWARDS", 0x10, 0x0F, render::hex_bytes);
        assert!(matches!(
            desc.validate().as_slice(),
            [DecoderError::InvalidDescriptor { .. }]
        ));
    }

    #[test]
    fn test_overlaps() {
        let a = Descriptor::blob("A", 0x10, 0x1F, render::hex_bytes);
        let b = Descriptor::blob("B", 0x1F, 0x2F, render::hex_bytes);
        let c = Descriptor::blob("C", 0x30, 0x3F, render::hex_bytes);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_field_width() {
        assert_eq!(FieldSpec::bits("x", 0, 0, 7).width(), 8);
        assert_eq!(FieldSpec::bit("x", 0, 3).width(), 1);
        assert_eq!(FieldSpec::bits("x", 0, 4, 2).width(), 0);
    }
}
