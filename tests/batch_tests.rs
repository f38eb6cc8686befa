//! End-to-end batch tests.
//!
//! Each test builds a JSON payload, runs it through the dispatcher against a
//! memory transport and checks both the op journal and the exact bytes.

use pretty_assertions::assert_eq;
use serde_json::json;

use thermal_dispatch::{
    dispatch::{Dispatcher, Instruction, Payload, SUCCESS_MESSAGE},
    error::PrinterError,
    ir::{EscPosEncoder, Op},
    protocol::codec::CharacterSet,
    protocol::text::Alignment,
    transport::MemoryTransport,
};

const INIT: [u8; 2] = [0x1B, 0x40];
const UTF8: [u8; 3] = [0x1C, 0x43, 0xFF];
const TRAILER: [u8; 6] = [0x1B, 0x33, 30, 0x0A, 0x0A, 0x0A];

fn dispatcher() -> Dispatcher<EscPosEncoder> {
    Dispatcher::new(EscPosEncoder::default())
}

fn framed(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(INIT);
    out.extend(UTF8);
    out.extend(body);
    out.extend(TRAILER);
    out
}

fn payload(value: serde_json::Value) -> Vec<Instruction> {
    Payload::parse(&value.to_string()).unwrap()
}

// ============================================================================
// FAULT ISOLATION
// ============================================================================

#[test]
fn test_unknown_method_does_not_fail_batch() {
    let instructions = payload(json!({
        "payload": [
            {"method": "print", "params": ["Hello"]},
            {"method": "unknownOp", "params": []}
        ]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();

    assert_eq!(report.message(), SUCCESS_MESSAGE);
    assert!(report.outcomes[0].is_ok());
    assert!(matches!(
        report.outcomes[1].error,
        Some(PrinterError::UnknownMethod(ref name)) if name == "unknownOp"
    ));
    assert_eq!(
        report.program.ops,
        vec![
            Op::Init,
            Op::SetCodeSystem(CharacterSet::Utf8),
            Op::Print {
                text: "Hello".into(),
                charset: CharacterSet::Utf8
            },
            Op::LineSpacing(30),
            Op::NextLine(3),
        ]
    );
    assert_eq!(transport.bytes(), framed(b"Hello"));
}

#[test]
fn test_connect_failure_attempts_nothing() {
    let instructions = payload(json!({
        "payload": [{"method": "println", "params": ["never"]}]
    }));
    let mut transport = MemoryTransport::new().refuse_connection();
    let failure = dispatcher()
        .run_batch(&mut transport, &instructions)
        .unwrap_err();

    assert!(matches!(failure.error, PrinterError::Connection(_)));
    assert_eq!(failure.instruction, None);
    assert!(failure.report.outcomes.is_empty());
    assert!(failure.report.program.is_empty());
    assert!(transport.sent().is_empty());
}

#[test]
fn test_qr_with_missing_param_emits_nothing() {
    let instructions = payload(json!({
        "payload": [{"method": "qr", "params": ["data", 4]}]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();

    assert!(matches!(
        report.outcomes[0].error,
        Some(PrinterError::InvalidArgument(_))
    ));
    assert_eq!(transport.bytes(), framed(&[]));
}

#[test]
fn test_transport_failure_stops_remaining_instructions() {
    let instructions = payload(json!({
        "payload": [
            {"method": "bold", "params": [true]},
            {"method": "println", "params": ["lost"]},
            {"method": "println", "params": ["never tried"]}
        ]
    }));
    // init, code system and bold get through
    let mut transport = MemoryTransport::new().fail_after(3);
    let failure = dispatcher()
        .run_batch(&mut transport, &instructions)
        .unwrap_err();

    assert!(matches!(failure.error, PrinterError::Transport(_)));
    assert_eq!(failure.instruction, Some(1));
    assert_eq!(failure.report.outcomes.len(), 1);
    assert_eq!(failure.report.program.tail(1), &[Op::SetBold(true)]);
}

// ============================================================================
// TEXT
// ============================================================================

#[test]
fn test_empty_print_and_println() {
    let instructions = payload(json!({
        "payload": [
            {"method": "print", "params": [""]},
            {"method": "print", "params": [null]},
            {"method": "println", "params": [""]}
        ]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();

    assert!(report.is_clean());
    let prints = report
        .program
        .iter()
        .filter(|op| matches!(op, Op::Print { .. }))
        .count();
    assert_eq!(prints, 0);
    assert_eq!(transport.bytes(), framed(&[0x0A]));
}

#[test]
fn test_charset_switch_changes_text_bytes() {
    let instructions = payload(json!({
        "payload": [{"method": "println", "params": ["你好"]}]
    }));
    let dispatcher = Dispatcher::with_config(
        EscPosEncoder::default(),
        thermal_dispatch::printer::BatchConfig {
            character_set: CharacterSet::Gb18030,
            ..Default::default()
        },
    );
    let mut transport = MemoryTransport::new();
    dispatcher.run_batch(&mut transport, &instructions).unwrap();

    let mut expected = Vec::new();
    expected.extend(INIT);
    expected.extend([0x1C, 0x43, 0x00]);
    expected.extend([0xC4, 0xE3, 0xBA, 0xC3, 0x0A]);
    expected.extend(TRAILER);
    assert_eq!(transport.bytes(), expected);
}

// ============================================================================
// STYLES
// ============================================================================

#[test]
fn test_receipt_header_bytes() {
    let instructions = payload(json!({
        "payload": [
            {"method": "align", "params": ["center"]},
            {"method": "fontSize", "params": [2, 2]},
            {"method": "bold", "params": [null]},
            {"method": "println", "params": ["CAFE"]},
            {"method": "bold", "params": [null]},
            {"method": "underline", "params": ["thin"]},
            {"method": "fontSize", "params": [0, 99]},
            {"method": "align", "params": ["LEFT"]},
            {"method": "darkness", "params": [260]},
            {"method": "newLine", "params": [2]}
        ]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();
    assert!(report.is_clean());

    let mut body = Vec::new();
    body.extend([0x1B, 0x61, 0x01]); // center
    body.extend([0x1D, 0x21, 0x11]); // 2x2
    body.extend([0x1B, 0x45, 0x01]); // bold toggled on
    body.extend(b"CAFE\n");
    body.extend([0x1B, 0x45, 0x00]); // bold toggled off
    body.extend([0x1B, 0x2D, 0x01]); // thin underline
    body.extend([0x1D, 0x21, 0x0F]); // clamped to 1x16
    body.extend([0x1B, 0x61, 0x00]); // left
    body.extend([0x1D, 0x28, 0x45, 0x04, 0x00, 0x05, 0x05, 0x01, 0x04]);
    body.extend([0x0A, 0x0A]);
    assert_eq!(transport.bytes(), framed(&body));
}

#[test]
fn test_bad_tokens_are_rejected_individually() {
    let instructions = payload(json!({
        "payload": [
            {"method": "underline", "params": [" Thin"]},
            {"method": "underline", "params": ["bold"]},
            {"method": "align", "params": ["Center"]},
            {"method": "align", "params": ["middle"]}
        ]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();

    let rejected: Vec<usize> = report.failures().map(|o| o.index).collect();
    assert_eq!(rejected, vec![0, 1, 3]);
    assert!(
        report
            .program
            .iter()
            .any(|op| *op == Op::SetAlign(Alignment::Center))
    );
}

// ============================================================================
// BARCODES
// ============================================================================

#[test]
fn test_barcode_bytes() {
    let instructions = payload(json!({
        "payload": [{"method": "barcode", "params": ["12345678", 4, 80, 2, 2]}]
    }));
    let mut transport = MemoryTransport::new();
    dispatcher().run_batch(&mut transport, &instructions).unwrap();

    let mut body = vec![
        0x1D, 0x48, 0x02, // text below
        0x1D, 0x77, 0x02, // module width
        0x1D, 0x68, 0x50, // height 80
        0x1D, 0x6B, 0x45, 0x08, // CODE39, 8 bytes
    ];
    body.extend(b"12345678");
    assert_eq!(transport.bytes(), framed(&body));
}

#[test]
fn test_qr_bytes() {
    let instructions = payload(json!({
        "payload": [{"method": "qr", "params": ["AB", 4, 1]}]
    }));
    let mut transport = MemoryTransport::new();
    dispatcher().run_batch(&mut transport, &instructions).unwrap();

    let body = vec![
        0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x04, // module size
        0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x31, // error level M
        0x1D, 0x28, 0x6B, 0x05, 0x00, 0x31, 0x50, 0x30, b'A', b'B', // store
        0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30, // print
        0x0A,
    ];
    assert_eq!(transport.bytes(), framed(&body));
}

// ============================================================================
// BITMAPS
// ============================================================================

#[test]
fn test_bitmap_from_base64_png() {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    let mut png = Vec::new();
    GrayImage::from_pixel(8, 2, Luma([0]))
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();

    let instructions = payload(json!({
        "payload": [{"method": "bitmap", "params": [STANDARD.encode(&png)]}]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();
    assert!(report.is_clean());

    let body = vec![0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x02, 0x00, 0xFF, 0xFF];
    assert_eq!(transport.bytes(), framed(&body));
}

#[test]
fn test_corrupt_bitmap_is_rejected() {
    let instructions = payload(json!({
        "payload": [
            {"method": "bitmap", "params": [[137, 80, 78, 71]]},
            {"method": "println", "params": ["after"]}
        ]
    }));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();

    assert!(matches!(
        report.outcomes[0].error,
        Some(PrinterError::InvalidArgument(_))
    ));
    assert!(report.outcomes[1].is_ok());
    assert_eq!(transport.bytes(), framed(b"after\n"));
}

// ============================================================================
// PAYLOAD BOUNDARY
// ============================================================================

#[test]
fn test_nothing_to_do() {
    let err = Payload::parse(r#"{"payload": null}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid payload: Nothing to do");
}

#[test]
fn test_instruction_without_params_is_invalid() {
    let instructions = payload(json!({"payload": [{"method": "newLine"}]}));
    let mut transport = MemoryTransport::new();
    let report = dispatcher().run_batch(&mut transport, &instructions).unwrap();
    assert!(matches!(
        report.outcomes[0].error,
        Some(PrinterError::InvalidArgument(_))
    ));
    assert_eq!(transport.bytes(), framed(&[]));
}
