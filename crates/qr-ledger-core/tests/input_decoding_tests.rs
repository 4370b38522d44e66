//! Tests transaction input decoding into display text.

use qr_ledger_core::{CoreError, decode_input_text};

#[test]
fn input_decoding_tests_decode_prefixed_hex_to_text() {
    let text = decode_input_text("0x68656c6c6f20776f726c64").expect("payload should decode");
    assert_eq!(text, "hello world");
}

#[test]
fn input_decoding_tests_accept_unprefixed_and_empty_payloads() {
    assert_eq!(decode_input_text("6869").expect("payload should decode"), "hi");
    assert_eq!(decode_input_text("0x").expect("empty payload should decode"), "");
}

#[test]
fn input_decoding_tests_keep_control_bytes_as_is() {
    let text = decode_input_text("0x00410a").expect("payload should decode");
    assert_eq!(text, "\u{0}A\n");
}

#[test]
fn input_decoding_tests_reject_malformed_hex() {
    assert!(matches!(
        decode_input_text("0xzz"),
        Err(CoreError::InvalidInputPayload(_))
    ));
    assert!(matches!(
        decode_input_text("0xabc"),
        Err(CoreError::InvalidInputPayload(_))
    ));
}
