//! Sideband message boxes (0x01000 - 0x017FF) and the Event Status Indicator
//! block (0x02002 - 0x0200F)
//!
//! The ESI block mirrors the sink status registers at 0x00200 so that MST
//! sources can service IRQs with a single read.

use super::link::{
    DEVICE_SERVICE_IRQ_VECTOR, LANE0_1_STATUS, LANE2_3_STATUS, LANE_ALIGN_STATUS_UPDATED, SINK_COUNT,
    SINK_STATUS,
};
use crate::descriptor::{Descriptor, FieldSpec};
use crate::render::hex_bytes;

pub(super) const DESCRIPTORS: &[Descriptor] = &[
    Descriptor::blob("DOWN_REQ", 0x01000, 0x011FF, hex_bytes),
    Descriptor::blob("UP_REP", 0x01200, 0x013FF, hex_bytes),
    Descriptor::blob("DOWN_REP", 0x01400, 0x015FF, hex_bytes),
    Descriptor::blob("UP_REQ", 0x01600, 0x017FF, hex_bytes),
    Descriptor::range("SINK_COUNT_ESI", 0x02002, 0x02002, SINK_COUNT),
    Descriptor::range("DEVICE_SERVICE_IRQ_VECTOR_ESI0", 0x02003, 0x02003, DEVICE_SERVICE_IRQ_VECTOR),
    Descriptor::range("DEVICE_SERVICE_IRQ_VECTOR_ESI1", 0x02004, 0x02004, DEVICE_SERVICE_IRQ_VECTOR_ESI1),
    Descriptor::range("LINK_SERVICE_IRQ_VECTOR_ESI0", 0x02005, 0x02005, LINK_SERVICE_IRQ_VECTOR_ESI0),
    Descriptor::range("eDP PSR Registers", 0x02006, 0x0200B, EDP_PSR),
    Descriptor::range("LANE0_1_STATUS_ESI", 0x0200C, 0x0200C, LANE0_1_STATUS),
    Descriptor::range("LANE2_3_STATUS_ESI", 0x0200D, 0x0200D, LANE2_3_STATUS),
    Descriptor::range("LANE_ALIGN_STATUS_UPDATED_ESI", 0x0200E, 0x0200E, LANE_ALIGN_STATUS_UPDATED),
    Descriptor::range("SINK_STATUS_ESI", 0x0200F, 0x0200F, SINK_STATUS),
];

const DEVICE_SERVICE_IRQ_VECTOR_ESI1: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 5, 7),
    FieldSpec::bit("DSC_ERROR_STATUS", 0, 4),
    FieldSpec::bit("PANEL_REPLAY_ERROR_STATUS", 0, 3),
    FieldSpec::bit("CEC_IRQ", 0, 2),
    FieldSpec::bit("LOCK_ACQUISITION_REQUEST", 0, 1),
    FieldSpec::bit("RX_GTC_MSTR_REQ_STATUS_CHANGE", 0, 0),
];

const LINK_SERVICE_IRQ_VECTOR_ESI0: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 5, 7),
    FieldSpec::bit("CONNECTED_OFF_ENTRY_REQUESTED", 0, 4),
    FieldSpec::bit("HDMI_LINK_STATUS_CHANGED", 0, 3),
    FieldSpec::bit("STREAM_STATUS_CHANGED", 0, 2),
    FieldSpec::bit("LINK_STATUS_CHANGED", 0, 1),
    FieldSpec::bit("RX_CAP_CHANGED", 0, 0),
];

// PSR status bytes are defined by the eDP specification and shown raw
const EDP_PSR: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 0, 7),
    FieldSpec::bits("Reserved", 1, 0, 7),
    FieldSpec::bits("Reserved", 2, 0, 7),
    FieldSpec::bits("Reserved", 3, 0, 7),
    FieldSpec::bits("Reserved", 4, 0, 7),
    FieldSpec::bits("Reserved", 5, 0, 7),
];
