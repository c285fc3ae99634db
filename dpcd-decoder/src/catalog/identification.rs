//! Sink and branch device identification (0x00400 - 0x005FF)

use crate::descriptor::{Descriptor, FieldSpec};
use crate::render::{hex_bytes, ieee_oui, quoted_string};

pub(super) const DESCRIPTORS: &[Descriptor] = &[
    Descriptor::blob("Sink IEEE_OUI", 0x00400, 0x00402, ieee_oui),
    Descriptor::blob("Sink Device Identification String", 0x00403, 0x00408, quoted_string),
    Descriptor::range("Sink Hardware Revision", 0x00409, 0x00409, HARDWARE_REVISION),
    Descriptor::range("Sink Firmware Major Revision", 0x0040A, 0x0040A, FIRMWARE_REVISION),
    Descriptor::range("Sink Firmware Minor Revision", 0x0040B, 0x0040B, FIRMWARE_REVISION),
    Descriptor::blob("RESERVED", 0x0040C, 0x004FF, hex_bytes),
    Descriptor::blob("Branch IEEE_OUI", 0x00500, 0x00502, ieee_oui),
    Descriptor::blob("Branch Device Identification String", 0x00503, 0x00508, quoted_string),
    Descriptor::range("Branch Hardware Revision", 0x00509, 0x00509, HARDWARE_REVISION),
    Descriptor::range("Branch Firmware Major Revision", 0x0050A, 0x0050A, FIRMWARE_REVISION),
    Descriptor::range("Branch Firmware Minor Revision", 0x0050B, 0x0050B, FIRMWARE_REVISION),
];

const HARDWARE_REVISION: &[FieldSpec] = &[
    FieldSpec::bits("Minor Revision", 0, 0, 3),
    FieldSpec::bits("Major Revision", 0, 4, 7),
];

const FIRMWARE_REVISION: &[FieldSpec] = &[FieldSpec::bits("Revision", 0, 0, 7)];
