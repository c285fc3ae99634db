//! Receiver capability field (0x00000 - 0x000FF)

use crate::descriptor::{Descriptor, FieldSpec};
use crate::field_decoder::RangeDecoder;
use crate::render::unrecognized;

pub(super) const DESCRIPTORS: &[Descriptor] = &[
    Descriptor::range("DPCD_REV", 0x00000, 0x00000, DPCD_REV),
    Descriptor::range("MAX_LINK_RATE", 0x00001, 0x00001, MAX_LINK_RATE),
    Descriptor::range("MAX_LANE_COUNT", 0x00002, 0x00002, MAX_LANE_COUNT),
    Descriptor::range("MAX_DOWNSPREAD", 0x00003, 0x00003, MAX_DOWNSPREAD),
    Descriptor::range("NORP/DP_PWR_VOLTAGE_CAP", 0x00004, 0x00004, NORP),
    Descriptor::range("DOWN_STREAM_PORT_PRESENT", 0x00005, 0x00005, DOWN_STREAM_PORT_PRESENT),
    Descriptor::range("MAIN_LINK_CHANNEL_CODING", 0x00006, 0x00006, MAIN_LINK_CHANNEL_CODING),
    Descriptor::range("DOWN_STREAM_PORT_COUNT", 0x00007, 0x00007, DOWN_STREAM_PORT_COUNT),
    Descriptor::range("RECEIVE_PORT0_CAP", 0x00008, 0x00009, RECEIVE_PORT_CAP),
    Descriptor::range("RECEIVE_PORT1_CAP", 0x0000A, 0x0000B, RECEIVE_PORT_CAP),
    Descriptor::range("I2C Speed Control Capabilities Bit Map", 0x0000C, 0x0000C, I2C_SPEED_CAP),
    Descriptor::range("eDP_CONFIGURATION_CAP", 0x0000D, 0x0000D, EDP_CONFIGURATION_CAP),
    Descriptor::range("TRAINING_AUX_RD_INTERVAL", 0x0000E, 0x0000E, TRAINING_AUX_RD_INTERVAL),
    Descriptor::range("MSTM_CAP", 0x00021, 0x00021, MSTM_CAP),
    Descriptor::computed("Downstream Facing Port 0 Capabilities", 0x00080, 0x00083, detailed_cap_info),
    Descriptor::computed("Downstream Facing Port 1 Capabilities", 0x00084, 0x00087, detailed_cap_info),
    Descriptor::computed("Downstream Facing Port 2 Capabilities", 0x00088, 0x0008B, detailed_cap_info),
    Descriptor::computed("Downstream Facing Port 3 Capabilities", 0x0008C, 0x0008F, detailed_cap_info),
    Descriptor::range("PANEL_REPLAY_CAPABILITY_SUPPORTED", 0x000B0, 0x000B1, PANEL_REPLAY_CAP),
];

const DPCD_REV: &[FieldSpec] = &[
    FieldSpec::bits("Major rev", 0, 4, 7),
    FieldSpec::bits("Minor rev", 0, 0, 3),
];

const MAX_LINK_RATE: &[FieldSpec] = &[FieldSpec::bits("Max link rate", 0, 0, 7).render(link_rate_gbps)];

const MAX_LANE_COUNT: &[FieldSpec] = &[
    FieldSpec::bit("Enhanced frame caps", 0, 7),
    FieldSpec::bit("Supports TPS3 pattern", 0, 6),
    FieldSpec::bit("Supports post-lt adjust", 0, 5),
    FieldSpec::bits("Max lane count", 0, 0, 4),
];

const MAX_DOWNSPREAD: &[FieldSpec] = &[
    FieldSpec::bit("Supports TPS4 pattern", 0, 7),
    FieldSpec::bit("No AUX handshake link training", 0, 6),
    FieldSpec::bits("Reserved", 0, 2, 5),
    FieldSpec::bit("Supports stream regen bit", 0, 1),
    FieldSpec::bit("Max downspread", 0, 0).render(|x| if x != 0 { "<=0.5%" } else { "None" }.to_string()),
];

const NORP: &[FieldSpec] = &[
    FieldSpec::bit("Capable of 18V", 0, 7),
    FieldSpec::bit("Capable of 12V", 0, 6),
    FieldSpec::bit("Capable of 5V", 0, 5),
    FieldSpec::bits("Reserved", 0, 2, 4),
    FieldSpec::bit("CRC 3D supported", 0, 1),
    FieldSpec::bit("Number recv ports", 0, 0),
];

const DOWN_STREAM_PORT_PRESENT: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 5, 7),
    FieldSpec::bit("Detailed capability available", 0, 4),
    FieldSpec::bit("Branch converts format", 0, 3),
    FieldSpec::bits("Downstream facing port type", 0, 1, 2).render(downstream_port_type),
    FieldSpec::bit("Downstream facing port present", 0, 0),
];

const MAIN_LINK_CHANNEL_CODING: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 2, 7),
    FieldSpec::bit("Supports 128b/132b encoding", 0, 1),
    FieldSpec::bit("Supports 8b/10b encoding", 0, 0),
];

const DOWN_STREAM_PORT_COUNT: &[FieldSpec] = &[
    FieldSpec::bit("IEEE unique ID support", 0, 7),
    FieldSpec::bit("Sink requires MSA timing", 0, 6),
    FieldSpec::bits("Reserved", 0, 4, 5),
    FieldSpec::bits("Downstream port count", 0, 0, 3),
];

const RECEIVE_PORT_CAP: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 6, 7),
    FieldSpec::bit("Buffer size per-lane/port", 0, 5)
        .render(|x| if x != 0 { "Per port" } else { "Per lane" }.to_string()),
    FieldSpec::bit("Buffer size units", 0, 4).render(|x| if x != 0 { "Bytes" } else { "Pixels" }.to_string()),
    FieldSpec::bit("HBlank expansion supported", 0, 3),
    FieldSpec::bit("usage", 0, 2)
        .render(|x| if x != 0 { "Secondary stream" } else { "Primary stream" }.to_string()),
    FieldSpec::bit("Local EDID present", 0, 1),
    FieldSpec::bit("Reserved", 0, 0),
    FieldSpec::bits("Buffer Size", 1, 0, 7).render(|x| ((x as u32 + 1) * 32).to_string()),
];

const I2C_SPEED_CAP: &[FieldSpec] = &[FieldSpec::bits("I2C speed support", 0, 0, 7).render(i2c_speed_caps)];

// Layout is defined by the eDP specification, left undecoded
const EDP_CONFIGURATION_CAP: &[FieldSpec] = &[FieldSpec::bits("Reserved for eDP", 0, 0, 7)];

const TRAINING_AUX_RD_INTERVAL: &[FieldSpec] = &[
    FieldSpec::bit("Extended receiver caps available", 0, 7),
    FieldSpec::bits("Training AUX read interval", 0, 0, 6).render(aux_rd_interval),
];

const MSTM_CAP: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 2, 7),
    FieldSpec::bit("SINGLE_STREAM_SIDEBAND_MSG_SUPPORT", 0, 1),
    FieldSpec::bit("MST_CAP", 0, 0),
];

const PANEL_REPLAY_CAP: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 0, 2, 7),
    FieldSpec::bit("Selective Update Support", 0, 1),
    FieldSpec::bit("Replay Support", 0, 0),
    FieldSpec::bits("Reserved", 1, 6, 7),
    FieldSpec::bit("Selective Update Granularity", 1, 5)
        .render(|x| if x != 0 { "Required" } else { "Not Required" }.to_string()),
    FieldSpec::bits("Reserved", 1, 0, 4),
];

/// Link rate code in units of 0.27 Gbps
pub(super) fn link_rate_gbps(code: u8) -> String {
    let centi = code as u32 * 27;
    format!("{}.{:02} Gbps", centi / 100, centi % 100)
}

fn downstream_port_type(value: u8) -> String {
    match value {
        0 => "DisplayPort".to_string(),
        1 => "Analog VGA".to_string(),
        2 => "HDMI/DVI/DP++".to_string(),
        3 => "Others".to_string(),
        other => unrecognized(other),
    }
}

fn i2c_speed_caps(value: u8) -> String {
    if value == 0 {
        return "No physical i2c bus".to_string();
    }

    const SPEEDS: [(u8, &str); 6] = [
        (0x01, "1 Kbps"),
        (0x02, "5 Kbps"),
        (0x04, "10 Kbps"),
        (0x08, "100 Kbps"),
        (0x10, "400 Kbps"),
        (0x20, "1 Mbps"),
    ];

    let mut speeds: Vec<&str> = SPEEDS
        .iter()
        .filter(|(bit, _)| value & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    if value & 0xC0 != 0 {
        speeds.push("RESERVED");
    }
    speeds.join("/")
}

fn aux_rd_interval(value: u8) -> String {
    let channel_eq_us = match value {
        0 => 400,
        1 => 4000,
        2 => 8000,
        3 => 12000,
        4 => 16000,
        other => return unrecognized(other),
    };
    format!("ClockReqDone=100us / ChannelEqDone={}us", channel_eq_us)
}

/// DFPx_TYPE values of a detailed capability entry
const DFP_DISPLAYPORT: u8 = 0;
const DFP_VGA: u8 = 1;
const DFP_DVI: u8 = 2;
const DFP_HDMI: u8 = 3;
const DFP_OTHER: u8 = 4;
const DFP_DP_PLUS_PLUS: u8 = 5;
const DFP_WIRELESS: u8 = 6;

const DFP_HEADER: &[FieldSpec] = &[
    FieldSpec::bits("NON_EDID_DFPX_ATTRIBUTE", 0, 4, 7).render(dfpx_attribute),
    FieldSpec::bit("DFPX_HPD", 0, 3).render(|x| if x != 0 { "HPD Aware" } else { "HPD Unaware" }.to_string()),
    FieldSpec::bits("DFPX_TYPE", 0, 0, 2).render(dfpx_type),
];

const DFP_DP: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 1, 0, 7),
    FieldSpec::bits("Reserved", 2, 0, 7),
    FieldSpec::bits("Reserved", 3, 0, 7),
];

const DFP_VGA_FIELDS: &[FieldSpec] = &[
    FieldSpec::bits("Maximum Pixel Rate", 1, 0, 7).render(|x| format!("{} MP/s", x as u32 * 8)),
    FieldSpec::bits("Reserved", 2, 2, 7),
    FieldSpec::bits("Maximum Bits/component", 2, 0, 1).render(max_bits_per_component),
    FieldSpec::bits("Reserved", 3, 0, 7),
];

const DFP_DVI_FIELDS: &[FieldSpec] = &[
    FieldSpec::bits("Maximum TMDS Char Clock Rate", 1, 0, 7).render(tmds_clock_mhz),
    FieldSpec::bits("Reserved", 2, 2, 7),
    FieldSpec::bits("Maximum Bits/component", 2, 0, 1).render(max_bits_per_component),
    FieldSpec::bits("Reserved", 3, 3, 7),
    FieldSpec::bit("High Color Depth", 3, 2),
    FieldSpec::bit("Dual Link", 3, 1),
    FieldSpec::bit("Reserved", 3, 0),
];

const DFP_HDMI_FIELDS: &[FieldSpec] = &[
    FieldSpec::bits("Maximum TMDS Char Clock Rate", 1, 0, 7).render(tmds_clock_mhz),
    FieldSpec::bits("Reserved", 2, 2, 7),
    FieldSpec::bits("Maximum Bits/component", 2, 0, 1).render(max_bits_per_component),
    FieldSpec::bits("Reserved", 3, 5, 7),
    FieldSpec::bit("CONVERSION_FROM_YCBCR444_TO_YCBCR420_SUPPORT", 3, 4),
    FieldSpec::bit("CONVERSION_FROM_YCBCR444_TO_YCBCR422_SUPPORT", 3, 3),
    FieldSpec::bit("YCBCR420_PASS_THROUGH_SUPPORT", 3, 2),
    FieldSpec::bit("YCBCR422_PASS_THROUGH_SUPPORT", 3, 1),
    FieldSpec::bit("FRAME_SEQ_TO_FRAME_PACK", 3, 0),
];

const DFP_OTHER_FIELDS: &[FieldSpec] = &[
    FieldSpec::bits("UNDEFINED", 1, 0, 7),
    FieldSpec::bits("UNDEFINED", 2, 0, 7),
    FieldSpec::bits("UNDEFINED", 3, 0, 7),
];

const DFP_DP_PLUS_PLUS_FIELDS: &[FieldSpec] = &[
    FieldSpec::bits("Maximum TMDS Char Clock Rate", 1, 0, 7).render(tmds_clock_mhz),
    FieldSpec::bits("Reserved", 2, 2, 7),
    FieldSpec::bits("Maximum Bits/component", 2, 0, 1).render(max_bits_per_component),
    FieldSpec::bits("Reserved", 3, 1, 7),
    FieldSpec::bit("FRAME_SEQ_TO_FRAME_PACK", 3, 0),
];

const DFP_WIRELESS_FIELDS: &[FieldSpec] = &[
    FieldSpec::bits("Reserved", 1, 4, 7),
    FieldSpec::bits("WIRELESS_TECHNOLOGY", 1, 0, 3).render(|x| if x == 0 { "WiGig" } else { "Reserved" }.to_string()),
    FieldSpec::bits("Reserved", 2, 4, 7),
    FieldSpec::bits("WDE_TX_CONCURRENCY_CAP", 2, 2, 3),
    FieldSpec::bits("NUMBER_OF_WDE_TX_ON_DEVICE", 2, 0, 1),
    FieldSpec::bits("Reserved", 3, 0, 7),
];

/// Detailed capability layout of one downstream facing port
///
/// Only byte 0 is guaranteed; the remaining three bytes are decoded when the
/// window carries them, with a layout chosen by DFPX_TYPE.
fn detailed_cap_info(window: &[u8]) -> Vec<FieldSpec> {
    let mut fields = DFP_HEADER.to_vec();
    if window.len() <= 1 {
        return fields;
    }

    let port_type = RangeDecoder::extract_field(window[0], 0, 2);
    let detail = match port_type {
        DFP_DISPLAYPORT => DFP_DP,
        DFP_VGA => DFP_VGA_FIELDS,
        DFP_DVI => DFP_DVI_FIELDS,
        DFP_HDMI => DFP_HDMI_FIELDS,
        DFP_OTHER => DFP_OTHER_FIELDS,
        DFP_DP_PLUS_PLUS => DFP_DP_PLUS_PLUS_FIELDS,
        DFP_WIRELESS => DFP_WIRELESS_FIELDS,
        _ => &[],
    };
    fields.extend_from_slice(detail);
    fields
}

fn dfpx_attribute(value: u8) -> String {
    match value {
        0 => "None".to_string(),
        1 => "720x480i@60".to_string(),
        2 => "720x480i@50".to_string(),
        3 => "1920x1080i@60".to_string(),
        4 => "1920x1080i@50".to_string(),
        5 => "1280x720p@60".to_string(),
        7 => "1280x720p@50".to_string(),
        other => unrecognized(other),
    }
}

fn dfpx_type(value: u8) -> String {
    let name = match value {
        DFP_DISPLAYPORT => "DisplayPort",
        DFP_VGA => "Analog VGA",
        DFP_DVI => "DVI",
        DFP_HDMI => "HDMI",
        DFP_OTHER => "Other (No DisplayID/EDID support)",
        DFP_DP_PLUS_PLUS => "DP++",
        DFP_WIRELESS => "Wireless",
        _ => "Reserved",
    };
    name.to_string()
}

fn max_bits_per_component(value: u8) -> String {
    let bpc = match value {
        0 => "8bpc",
        1 => "10bpc",
        2 => "12bpc",
        _ => "16bpc",
    };
    bpc.to_string()
}

fn tmds_clock_mhz(value: u8) -> String {
    let tenths = value as u32 * 25;
    format!("{}.{} MHz", tenths / 10, tenths % 10)
}
