//! Extended receiver capabilities (0x02200) and CEC tunneling (0x03000)

use crate::descriptor::{Descriptor, FieldSpec};
use crate::render::{supported, unrecognized};

pub(super) const DESCRIPTORS: &[Descriptor] = &[
    Descriptor::range("DP1.3_DPCD_REV", 0x02200, 0x02200, EXTENDED_DPCD_REV),
    Descriptor::range("MAX_LINK_RATE", 0x02201, 0x02201, EXTENDED_MAX_LINK_RATE),
    Descriptor::range("MAX_LANE_COUNT", 0x02202, 0x02202, EXTENDED_MAX_LANE_COUNT),
    Descriptor::range("MAX_DOWNSPREAD", 0x02203, 0x02203, EXTENDED_MAX_DOWNSPREAD),
    Descriptor::range("CEC_TUNNELING_CAPABILITY", 0x03000, 0x03000, CEC_TUNNELING_CAPABILITY),
];

const EXTENDED_DPCD_REV: &[FieldSpec] = &[
    FieldSpec::bits("Minor Revision Number", 0, 0, 3),
    FieldSpec::bits("Major Revision Number", 0, 4, 7),
];

const EXTENDED_MAX_LINK_RATE: &[FieldSpec] =
    &[FieldSpec::bits("Maximum link rate of Main-Link lanes", 0, 0, 7).render(lane_rate)];

const EXTENDED_MAX_LANE_COUNT: &[FieldSpec] = &[
    FieldSpec::bits("Maximum number of lanes", 0, 0, 4).render(lane_count),
    FieldSpec::bit("Post-Link Training Adjust Request", 0, 5).render(supported),
    FieldSpec::bit("Link Training Pattern Sequence 3 (TPS3)", 0, 6).render(supported),
    FieldSpec::bit("Enhanced Framing symbol sequence for BS and SR", 0, 7).render(supported),
];

const EXTENDED_MAX_DOWNSPREAD: &[FieldSpec] = &[
    FieldSpec::bit("MAX_DOWNSPREAD", 0, 0)
        .render(|x| if x != 0 { "Up to 0.5% down-spread" } else { "No down spread" }.to_string()),
    FieldSpec::bits("RESERVED", 0, 1, 5),
    FieldSpec::bit("NO_AUX_TRANSACTION_LINK_TRAINING", 0, 6).render(no_aux_link_training),
    FieldSpec::bit("TPS4_SUPPORTED", 0, 7).render(supported),
];

const CEC_TUNNELING_CAPABILITY: &[FieldSpec] = &[
    FieldSpec::bit("CEC_TUNNELING_CAPABLE", 0, 0),
    FieldSpec::bit("CEC_SNOOPING_CAPABLE", 0, 1),
    FieldSpec::bit("CEC_MULTIPLE_LA_CAPABLE", 0, 2),
    FieldSpec::bits("Reserved", 0, 3, 7),
];

fn lane_rate(value: u8) -> String {
    match value {
        0x06 => "1.62Gbps/lane".to_string(),
        0x0A => "2.7Gbps/lane".to_string(),
        0x14 => "5.4Gbps/lane".to_string(),
        0x1E => "8.1Gbps/lane".to_string(),
        other => unrecognized(other),
    }
}

fn no_aux_link_training(value: u8) -> String {
    let text = if value != 0 {
        "Does not require AUX transactions when the link configuration is already known"
    } else {
        "Requires AUX transactions to synchronize to a DPTX"
    };
    text.to_string()
}

fn lane_count(value: u8) -> String {
    match value {
        1 => "One lane (Lane 0 only)".to_string(),
        2 => "Two lanes (Lanes 0 and 1 only)".to_string(),
        4 => "Four lanes (Lanes 0, 1, 2, and 3)".to_string(),
        other => unrecognized(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_renders() {
        assert_eq!(lane_rate(0x1E), "8.1Gbps/lane");
        assert_eq!(lane_rate(0x15), "Unrecognized value 0x15");
        assert_eq!(lane_count(4), "Four lanes (Lanes 0, 1, 2, and 3)");
        assert_eq!(lane_count(3), "Unrecognized value 0x3");
    }
}
