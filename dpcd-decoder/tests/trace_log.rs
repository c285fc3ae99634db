// Integration tests for trace log extraction and decoding

use dpcd_decoder::{AuxOperation, Decoder, DecoderConfig, Result, TraceLogExtractor, TransactionReport};
use std::io::{BufRead, BufReader, Cursor, Read};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const BOOT_LOG: &str = "\
[    1.204512] i915 0000:00:02.0: [drm] GT0: GuC firmware loaded
[    1.310021] [drm:drm_dp_dpcd_read] AUX A/DDI A/PHY A: 0x00000 AUX_CH -> (ret=  15) 12 14 c4 81 01 01 01 80 02 00 00 00 0f 09 80
[    1.310450] [drm:drm_dp_dpcd_read] AUX A/DDI A/PHY A: 0x02202 AUX_CH -> (ret=   1) 0a
[    1.311002] [drm:drm_dp_dpcd_write] AUX A/DDI A/PHY A: 0x00100 AUX_CH <- (ret=   1) 14
[    1.311300] [drm:drm_dp_dpcd_read] AUX A/DDI A/PHY A: 0x00202 AUX_CH -> (ret=   6) 77 00 01 00 00 00
";

#[test]
fn test_single_line_then_blank_stops() {
    init_logging();
    let log = "[drm:drm_dp_dpcd_read] eDP-1: 0x02202 AUX_READ -> (ret=   1) 0a\n\n\
               [drm:drm_dp_dpcd_read] eDP-1: 0x00000 AUX_READ -> (ret=   1) 12\n";

    let txs: Vec<_> = TraceLogExtractor::new(Cursor::new(log))
        .collect::<Result<Vec<_>>>()
        .unwrap();

    assert_eq!(txs.len(), 1);
    let tx = &txs[0];
    assert_eq!(tx.operation, AuxOperation::Read);
    assert_eq!(tx.port, "eDP-1");
    assert_eq!(tx.address, 0x2202);
    assert_eq!(tx.retcode, 1);
    assert_eq!(tx.payload, vec![0x0a]);
}

#[test]
fn test_boot_log_reports() {
    init_logging();
    let decoder = Decoder::new();
    let reports: Vec<TransactionReport> = decoder
        .decode_log(Cursor::new(BOOT_LOG))
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(reports.len(), 4);
    assert!(reports
        .iter()
        .all(|r| r.transaction.port == "AUX A/DDI A/PHY A"));

    // Full receiver caps read
    let caps = &reports[0];
    assert_eq!(caps.transaction.timestamp.as_deref(), Some("1.310021"));
    assert_eq!(caps.transaction.end_address(), 0x0E);
    assert_eq!(caps.session.unparsed_count(), 0);
    assert_eq!(
        caps.session.field("MAX_LINK_RATE", "Max link rate").unwrap().rendered_text,
        "5.40 Gbps"
    );

    // Extended MAX_LANE_COUNT read is decoded at its own address
    let lanes = &reports[1];
    assert_eq!(lanes.session.results().len(), 1);
    assert_eq!(lanes.session.results()[0].address(), 0x2202);

    // Link training write
    let bw = &reports[2];
    assert_eq!(bw.transaction.operation, AuxOperation::Write);
    assert_eq!(
        bw.session.field("LINK_BW_SET", "Link rate").unwrap().rendered_text,
        "5.40 Gbps"
    );

    // Lane status block
    let status = &reports[3];
    let labels: Vec<&str> = status.session.results().iter().map(|r| r.register_label()).collect();
    assert_eq!(
        labels,
        vec![
            "LANE0_1_STATUS",
            "LANE2_3_STATUS",
            "LANE_ALIGN_STATUS_UPDATED",
            "SINK_STATUS",
            "ADJUST_REQUEST_LANE0_1",
            "ADJUST_REQUEST_LANE2_3",
        ]
    );
    assert_eq!(status.session.field("LANE0_1_STATUS", "LANE0_CR_DONE").unwrap().raw_value, 1);
    assert_eq!(
        status.session.field("SINK_STATUS", "RECEIVE_PORT_0_STATUS").unwrap().rendered_text,
        "OUT sync"
    );
}

#[test]
fn test_filters_from_config() {
    init_logging();
    let decoder = Decoder::with_config(DecoderConfig::new().with_operation_filter(AuxOperation::Write));
    let reports: Vec<TransactionReport> = decoder
        .decode_log(Cursor::new(BOOT_LOG))
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].transaction.address, 0x100);
}

/// Reader that fails after its data is exhausted
struct FailingReader {
    data: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(std::io::Error::new(std::io::ErrorKind::Other, "device went away")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_read_error_is_reported_once() {
    init_logging();
    let reader: Box<dyn BufRead> = Box::new(BufReader::new(FailingReader {
        data: Cursor::new(b"[drm:drm_dp_dpcd_read] DP-1: 0x00000 AUX_CH -> (ret=   1) 12\n".to_vec()),
    }));

    let mut extractor = TraceLogExtractor::new(reader);
    assert!(extractor.next().unwrap().is_ok());
    assert!(extractor.next().unwrap().is_err());
    assert!(extractor.next().is_none());
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
    init_logging();
    let mut log = Vec::new();
    log.extend_from_slice(b"[    3.000100] [drm:drm_dp_dpcd_read] eDP-1: 0x00000 AUX_CH -> (ret=   1) 12\n");
    log.extend_from_slice(b"[    3.100000] usb 1-1: Product: \xff\xfeWidget\n");
    log.extend_from_slice(b"[    3.200300] [drm:drm_dp_dpcd_read] eDP-1: 0x02202 AUX_CH -> (ret=   1) 0a\n");

    let txs: Vec<_> = TraceLogExtractor::new(Cursor::new(log.clone()))
        .collect::<Result<_>>()
        .unwrap();
    let addresses: Vec<u32> = txs.iter().map(|tx| tx.address).collect();
    assert_eq!(addresses, vec![0x0000, 0x2202]);

    let reports: Vec<TransactionReport> = Decoder::new()
        .decode_log(Cursor::new(log))
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].session.results()[0].register_label(), "DPCD_REV");
    assert_eq!(reports[1].session.results()[0].register_label(), "MAX_LANE_COUNT");
}
