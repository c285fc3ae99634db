//! Built-in DPCD descriptor catalog
//!
//! Each region module declares its descriptors as a `const` table. The
//! standard catalog is the concatenation of the regions in address order;
//! that order is also the resolution order.

mod esi;
mod extended;
mod hdcp;
mod identification;
mod link;
mod receiver;

use crate::descriptor::Descriptor;

const REGIONS: &[&[Descriptor]] = &[
    receiver::DESCRIPTORS,
    link::DESCRIPTORS,
    identification::DESCRIPTORS,
    esi::DESCRIPTORS,
    extended::DESCRIPTORS,
    hdcp::DESCRIPTORS,
];

/// The ordered list of all built-in descriptors
pub fn standard_catalog() -> Vec<Descriptor> {
    REGIONS.iter().flat_map(|region| region.iter().copied()).collect()
}
