//! Tests transaction record deserialization from node JSON.

use qr_ledger_core::TransactionRecord;

#[test]
fn transaction_record_tests_read_camel_case_fields() {
    let raw = r#"{
        "hash":"0xabc123",
        "from":"0x1111111111111111111111111111111111111111",
        "to":null,
        "blockNumber":"0x10",
        "input":"0x6869",
        "nonce":"0x1"
    }"#;

    let record: TransactionRecord = serde_json::from_str(raw).expect("record should parse");
    assert_eq!(record.hash.as_deref(), Some("0xabc123"));
    assert_eq!(record.to, None);
    assert_eq!(record.block_number.as_deref(), Some("0x10"));
    assert_eq!(record.input_text().expect("input should decode"), "hi");
}

#[test]
fn transaction_record_tests_require_input_field() {
    let raw = r#"{"hash":"0xabc123"}"#;
    assert!(serde_json::from_str::<TransactionRecord>(raw).is_err());
}
