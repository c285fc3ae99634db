//! Link configuration (0x00100), sink status (0x00200) and power (0x00600)

use super::receiver::link_rate_gbps;
use crate::descriptor::{Descriptor, FieldSpec};
use crate::render::unrecognized;

pub(super) const DESCRIPTORS: &[Descriptor] = &[
    Descriptor::range("LINK_BW_SET", 0x00100, 0x00100, LINK_BW_SET),
    Descriptor::range("LANE_COUNT_SET", 0x00101, 0x00101, LANE_COUNT_SET),
    Descriptor::range("TRAINING_PATTERN_SET", 0x00102, 0x00102, TRAINING_PATTERN_SET),
    Descriptor::range("SINK_COUNT", 0x00200, 0x00200, SINK_COUNT),
    Descriptor::range("DEVICE_SERVICE_IRQ_VECTOR", 0x00201, 0x00201, DEVICE_SERVICE_IRQ_VECTOR),
    Descriptor::range("LANE0_1_STATUS", 0x00202, 0x00202, LANE0_1_STATUS),
    Descriptor::range("LANE2_3_STATUS", 0x00203, 0x00203, LANE2_3_STATUS),
    Descriptor::range("LANE_ALIGN_STATUS_UPDATED", 0x00204, 0x00204, LANE_ALIGN_STATUS_UPDATED),
    Descriptor::range("SINK_STATUS", 0x00205, 0x00205, SINK_STATUS),
    Descriptor::range("ADJUST_REQUEST_LANE0_1", 0x00206, 0x00206, ADJUST_REQUEST_LANE0_1),
    Descriptor::range("ADJUST_REQUEST_LANE2_3", 0x00207, 0x00207, ADJUST_REQUEST_LANE2_3),
    Descriptor::range("SET_POWER", 0x00600, 0x00600, SET_POWER),
];

const LINK_BW_SET: &[FieldSpec] = &[FieldSpec::bits("Link rate", 0, 0, 7).render(link_rate_gbps)];

const LANE_COUNT_SET: &[FieldSpec] = &[
    FieldSpec::bit("ENHANCED_FRAME_EN", 0, 7),
    FieldSpec::bit("Reserved", 0, 6),
    FieldSpec::bit("POST_LT_ADJ_REQ_GRANTED", 0, 5),
    FieldSpec::bits("Lane count", 0, 0, 4),
];

const TRAINING_PATTERN_SET: &[FieldSpec] = &[
    FieldSpec::bits("SYMBOL_ERROR_COUNT_SEL", 0, 6, 7).render(symbol_error_count_sel),
    FieldSpec::bit("SCRAMBLING_DISABLE", 0, 5),
    FieldSpec::bit("RECOVERED_CLOCK_OUT_EN", 0, 4),
    FieldSpec::bits("TRAINING_PATTERN_SELECT", 0, 0, 3).render(training_pattern),
];

pub(super) const SINK_COUNT: &[FieldSpec] = &[
    FieldSpec::bit("SINK_COUNT_bit7", 0, 7),
    FieldSpec::bit("CP_READY", 0, 6),
    FieldSpec::bits("SINK_COUNT", 0, 0, 5),
];

pub(super) const DEVICE_SERVICE_IRQ_VECTOR: &[FieldSpec] = &[
    FieldSpec::bit("Reserved", 0, 7),
    FieldSpec::bit("SINK_SPECIFIC_IRQ", 0, 6),
    FieldSpec::bit("UP_REQ_MSG_RDY", 0, 5),
    FieldSpec::bit("DOWN_REP_MSG_RDY", 0, 4),
    FieldSpec::bit("MCCS_IRQ", 0, 3),
    FieldSpec::bit("CP_IRQ", 0, 2),
    FieldSpec::bit("AUTOMATED_TEST_REQUEST", 0, 1),
    FieldSpec::bit("REMOTE_CONTROL_COMMAND_PENDING", 0, 0),
];

pub(super) const LANE0_1_STATUS: &[FieldSpec] = &[
    FieldSpec::bit("Reserved", 0, 7),
    FieldSpec::bit("LANE1_SYMBOL_LOCKED", 0, 6),
    FieldSpec::bit("LANE1_CHANNEL_EQ", 0, 5),
    FieldSpec::bit("LANE1_CR_DONE", 0, 4),
    FieldSpec::bit("Reserved", 0, 3),
    FieldSpec::bit("LANE0_SYMBOL_LOCKED", 0, 2),
    FieldSpec::bit("LANE0_CHANNEL_EQ", 0, 1),
    FieldSpec::bit("LANE0_CR_DONE", 0, 0),
];

pub(super) const LANE2_3_STATUS: &[FieldSpec] = &[
    FieldSpec::bit("Reserved", 0, 7),
    FieldSpec::bit("LANE3_SYMBOL_LOCKED", 0, 6),
    FieldSpec::bit("LANE3_CHANNEL_EQ", 0, 5),
    FieldSpec::bit("LANE3_CR_DONE", 0, 4),
    FieldSpec::bit("Reserved", 0, 3),
    FieldSpec::bit("LANE2_SYMBOL_LOCKED", 0, 2),
    FieldSpec::bit("LANE2_CHANNEL_EQ", 0, 1),
    FieldSpec::bit("LANE2_CR_DONE", 0, 0),
];

pub(super) const LANE_ALIGN_STATUS_UPDATED: &[FieldSpec] = &[
    FieldSpec::bit("LINK_STATUS_UPDATED", 0, 7),
    FieldSpec::bit("DOWNSTREAM_PORT_STATUS_CHANGED", 0, 6),
    FieldSpec::bits("Reserved", 0, 2, 5),
    FieldSpec::bit("POST_LT_ADJ_REQ_IN_PROGRESS", 0, 1),
    FieldSpec::bit("INTERLANE_ALIGN_DONE", 0, 0),
];

pub(super) const SINK_STATUS: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 3, 7),
    FieldSpec::bit("STREAM_REGENERATION_STATUS", 0, 2),
    FieldSpec::bit("RECEIVE_PORT_1_STATUS", 0, 1).render(sync_state),
    FieldSpec::bit("RECEIVE_PORT_0_STATUS", 0, 0).render(sync_state),
];

const ADJUST_REQUEST_LANE0_1: &[FieldSpec] = &[
    FieldSpec::bits("PRE-EMPHASIS_LANE1", 0, 6, 7).render(level),
    FieldSpec::bits("VOLTAGE_SWING_LANE1", 0, 4, 5).render(level),
    FieldSpec::bits("PRE-EMPHASIS_LANE0", 0, 2, 3).render(level),
    FieldSpec::bits("VOLTAGE_SWING_LANE0", 0, 0, 1).render(level),
];

const ADJUST_REQUEST_LANE2_3: &[FieldSpec] = &[
    FieldSpec::bits("PRE-EMPHASIS_LANE3", 0, 6, 7).render(level),
    FieldSpec::bits("VOLTAGE_SWING_LANE3", 0, 4, 5).render(level),
    FieldSpec::bits("PRE-EMPHASIS_LANE2", 0, 2, 3).render(level),
    FieldSpec::bits("VOLTAGE_SWING_LANE2", 0, 0, 1).render(level),
];

const SET_POWER: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 3, 7),
    FieldSpec::bits("SET_POWER_STATE", 0, 0, 2).render(power_state),
];

fn sync_state(value: u8) -> String {
    format!("{} sync", if value != 0 { "IN" } else { "OUT" })
}

fn level(value: u8) -> String {
    format!("Level {}", value)
}

fn training_pattern(value: u8) -> String {
    match value {
        0 => "Training not in progress".to_string(),
        1 => "TPS1".to_string(),
        2 => "TPS2".to_string(),
        3 => "TPS3".to_string(),
        7 => "TPS4".to_string(),
        other => unrecognized(other),
    }
}

fn symbol_error_count_sel(value: u8) -> String {
    match value {
        0 => "Disparity and illegal symbol errors".to_string(),
        1 => "Disparity errors".to_string(),
        2 => "Illegal symbol errors".to_string(),
        other => unrecognized(other),
    }
}

fn power_state(value: u8) -> String {
    match value {
        1 => "D0 (normal operation)".to_string(),
        2 => "D3 (power down)".to_string(),
        5 => "D3 with AUX on".to_string(),
        other => unrecognized(other),
    }
}
