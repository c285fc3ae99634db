//! Descriptor registry
//!
//! Resolves an absolute DPCD address to the catalog entry that decodes it.
//! The catalog is an ordered list; the first entry whose acceptance rule
//! matches wins, so overlapping entries are resolved by declaration order.

use crate::catalog;
use crate::descriptor::Descriptor;
use crate::types::{DecoderError, Result};
use serde::Serialize;
use std::sync::LazyLock;

static STANDARD: LazyLock<DescriptorRegistry> = LazyLock::new(|| {
    DescriptorRegistry::build(catalog::standard_catalog(), false)
        .expect("Invalid built-in DPCD catalog")
});

/// Pair of catalog entries whose address ranges intersect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    /// Index of the entry that wins resolution
    pub first: usize,
    pub second: usize,
    pub first_label: &'static str,
    pub second_label: &'static str,
    pub start: u32,
    pub end: u32,
}

/// Row of the address map printout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub start: u32,
    pub end: u32,
    pub label: &'static str,
    pub kind: &'static str,
}

/// Statistics about a registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub num_descriptors: usize,
    pub num_range: usize,
    pub num_blob: usize,
    pub num_overlaps: usize,
    pub covered_addresses: u64,
}

/// Ordered, read-only descriptor catalog
#[derive(Debug)]
pub struct DescriptorRegistry {
    descriptors: Vec<Descriptor>,
    overlaps: Vec<Overlap>,
}

impl DescriptorRegistry {
    /// Build a registry from an ordered catalog
    ///
    /// Descriptors with `start > end` are rejected. Field spec problems in fixed
    /// layouts are logged as warnings. Overlapping ranges are recorded but not
    /// logged; `Decoder` reports them according to its config. Resolution stays
    /// first-match-wins.
    pub fn new(descriptors: Vec<Descriptor>) -> Result<Self> {
        Self::build(descriptors, false)
    }

    /// Same as [`new`](Self::new), logging overlaps at build time when asked
    pub fn build(descriptors: Vec<Descriptor>, report_overlaps: bool) -> Result<Self> {
        for descriptor in &descriptors {
            for problem in descriptor.validate() {
                match problem {
                    DecoderError::InvalidDescriptor { .. } => return Err(problem),
                    other => log::warn!("catalog: {}", other),
                }
            }
        }

        let overlaps = Self::find_overlaps(&descriptors);
        if report_overlaps {
            for o in &overlaps {
                log::warn!(
                    "catalog: '{}' (#{}) overlaps '{}' (#{}) at 0x{:05x}-0x{:05x}, '{}' wins",
                    o.first_label,
                    o.first,
                    o.second_label,
                    o.second,
                    o.start,
                    o.end,
                    o.first_label
                );
            }
        }

        log::debug!(
            "Built descriptor registry: {} entries, {} overlaps",
            descriptors.len(),
            overlaps.len()
        );

        Ok(Self {
            descriptors,
            overlaps,
        })
    }

    /// Registry over the built-in DPCD catalog, created on first use
    pub fn standard() -> &'static DescriptorRegistry {
        &STANDARD
    }

    /// First descriptor, in catalog order, that accepts `address`
    pub fn resolve(&self, address: u32) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.accepts(address))
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Overlapping pairs, in catalog order
    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    /// Address map summary sorted by start address
    pub fn mapping(&self) -> Vec<MappingEntry> {
        let mut entries: Vec<MappingEntry> = self
            .descriptors
            .iter()
            .map(|d| MappingEntry {
                start: d.start,
                end: d.end,
                label: d.label,
                kind: if d.is_blob() { "blob" } else { "range" },
            })
            .collect();
        entries.sort_by_key(|e| (e.start, e.end));
        entries
    }

    pub fn stats(&self) -> RegistryStats {
        let num_blob = self.descriptors.iter().filter(|d| d.is_blob()).count();
        RegistryStats {
            num_descriptors: self.descriptors.len(),
            num_range: self.descriptors.len() - num_blob,
            num_blob,
            num_overlaps: self.overlaps.len(),
            covered_addresses: self.descriptors.iter().map(|d| d.window_len() as u64).sum(),
        }
    }

    fn find_overlaps(descriptors: &[Descriptor]) -> Vec<Overlap> {
        let mut overlaps = Vec::new();
        for (i, a) in descriptors.iter().enumerate() {
            for (j, b) in descriptors.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    overlaps.push(Overlap {
                        first: i,
                        second: j,
                        first_label: a.label,
                        second_label: b.label,
                        start: a.start.max(b.start),
                        end: a.end.min(b.end),
                    });
                }
            }
        }
        overlaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldSpec;
    use crate::render;

    const ONE_FIELD: &[FieldSpec] = &[FieldSpec::bits("Value", 0, 0, 7)];

    fn registry(descriptors: Vec<Descriptor>) -> DescriptorRegistry {
        DescriptorRegistry::new(descriptors).unwrap()
    }

    #[test]
    fn test_range_requires_exact_start() {
        let reg = registry(vec![Descriptor::range("PAIR", 0x08, 0x09, ONE_FIELD)]);
        assert_eq!(reg.resolve(0x08).map(|d| d.label), Some("PAIR"));
        assert!(reg.resolve(0x09).is_none());
    }

    #[test]
    fn test_blob_resolves_mid_range() {
        let reg = registry(vec![Descriptor::blob("BOX", 0x1000, 0x11FF, render::hex_bytes)]);
        assert_eq!(reg.resolve(0x1000).map(|d| d.label), Some("BOX"));
        assert_eq!(reg.resolve(0x1100).map(|d| d.label), Some("BOX"));
        assert!(reg.resolve(0x1200).is_none());
    }

    #[test]
    fn test_first_match_wins_and_overlap_reported() {
        let reg = registry(vec![
            Descriptor::blob("RESERVED", 0x40C, 0x4FF, render::hex_bytes),
            Descriptor::blob("RESERVED", 0x480, 0x4FF, render::hex_bytes),
            Descriptor::range("SHADOWED", 0x490, 0x490, ONE_FIELD),
        ]);

        assert_eq!(reg.resolve(0x490).map(|d| d.start), Some(0x40C));

        let overlaps = reg.overlaps();
        assert_eq!(overlaps.len(), 3);
        assert_eq!(overlaps[0].first, 0);
        assert_eq!(overlaps[0].second, 1);
        assert_eq!((overlaps[0].start, overlaps[0].end), (0x480, 0x4FF));
        assert_eq!(overlaps[2].second_label, "SHADOWED");
    }

    #[test]
    fn test_inverted_descriptor_rejected() {
        let err = DescriptorRegistry::new(vec![Descriptor::blob("BAD", 0x20, 0x10, render::hex_bytes)])
            .unwrap_err();
        assert!(matches!(err, DecoderError::InvalidDescriptor { start: 0x20, end: 0x10, .. }));
    }

    #[test]
    fn test_mapping_sorted() {
        let reg = registry(vec![
            Descriptor::range("B", 0x10, 0x10, ONE_FIELD),
            Descriptor::blob("A", 0x00, 0x02, render::hex_bytes),
        ]);
        let labels: Vec<&str> = reg.mapping().iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(reg.mapping()[0].kind, "blob");

        let stats = reg.stats();
        assert_eq!(stats.num_descriptors, 2);
        assert_eq!(stats.num_blob, 1);
        assert_eq!(stats.covered_addresses, 4);
    }

    #[test]
    fn test_standard_catalog_has_no_overlaps() {
        let reg = DescriptorRegistry::standard();
        assert!(reg.overlaps().is_empty(), "{:?}", reg.overlaps());
        assert!(reg.stats().num_descriptors > 50);
    }
}
