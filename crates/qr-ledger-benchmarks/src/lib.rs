//! Deterministic inputs for latency smoke tests.

/// Hex-encodes `len` bytes of printable text as a transaction input payload.
pub fn synthetic_input(len: usize) -> String {
    let text: Vec<u8> = (0..len).map(|index| b' ' + (index % 95) as u8).collect();
    format!("0x{}", hex::encode(text))
}
