//! HDCP 1.3 port registers (0x68000 - 0x6803C)

use crate::descriptor::{Descriptor, FieldSpec};
use crate::render::{hex_bytes, ksv_bit_weight};

pub(super) const DESCRIPTORS: &[Descriptor] = &[
    Descriptor::blob("Bksv", 0x68000, 0x68004, ksv_bit_weight),
    Descriptor::blob("R0`", 0x68005, 0x68006, hex_bytes),
    Descriptor::blob("Aksv", 0x68007, 0x6800B, ksv_bit_weight),
    Descriptor::blob("An", 0x6800C, 0x68013, hex_bytes),
    Descriptor::blob("V`H0", 0x68014, 0x68017, hex_bytes),
    Descriptor::blob("V`H1", 0x68018, 0x6801B, hex_bytes),
    Descriptor::blob("V`H2", 0x6801C, 0x6801F, hex_bytes),
    Descriptor::blob("V`H3", 0x68020, 0x68023, hex_bytes),
    Descriptor::blob("V`H4", 0x68024, 0x68027, hex_bytes),
    Descriptor::range("Bcaps", 0x68028, 0x68028, BCAPS),
    Descriptor::range("Bstatus", 0x68029, 0x68029, BSTATUS),
    Descriptor::range("Binfo", 0x6802A, 0x6802B, BINFO),
    Descriptor::blob("KSV FIFO", 0x6802C, 0x6803A, hex_bytes),
    Descriptor::range("Ainfo", 0x6803B, 0x6803B, AINFO),
    Descriptor::range("RESERVED", 0x6803C, 0x6803C, RESERVED),
];

const BCAPS: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 2, 7),
    FieldSpec::bit("REPEATER", 0, 1),
    FieldSpec::bit("HDCP_CAPABLE", 0, 0),
];

const BSTATUS: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 4, 7),
    FieldSpec::bit("REAUTHENTICATION_REQUEST", 0, 3),
    FieldSpec::bit("LINK_INTEGRITY_FAILURE", 0, 2),
    FieldSpec::bit("R0`_AVAILABLE", 0, 1),
    FieldSpec::bit("READY", 0, 0),
];

const BINFO: &[FieldSpec] = &[
    FieldSpec::bit("MAX_DEVS_EXCEEDED", 0, 7),
    FieldSpec::bits("DEVICE_COUNT", 0, 0, 6),
    FieldSpec::bits("Reserved", 1, 4, 7),
    FieldSpec::bit("MAX_CASCADE_EXCEEDED", 1, 3),
    FieldSpec::bits("DEPTH", 1, 0, 2),
];

const AINFO: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 1, 7),
    FieldSpec::bit("REAUTHENTICATION_ENABLE_IRQ_HPD", 0, 0),
];

const RESERVED: &[FieldSpec] = &[FieldSpec::bits("Reserved", 0, 0, 7)];
