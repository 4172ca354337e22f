//! Helpers shared by the integration tests.
#![allow(dead_code)]

pub mod sweep;

/// Decode hex, ignoring any whitespace so long vectors can be split over lines.
pub fn unhex(s: &str) -> Vec<u8> {
    let clean: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(clean).unwrap_or_else(|e| panic!("bad hex in vector: {e}"))
}

/// Decode hex into a fixed size array.
pub fn unhex_array<const N: usize>(s: &str) -> [u8; N] {
    let bytes = unhex(s);
    bytes.as_slice().try_into()
        .unwrap_or_else(|_| panic!("expected {N} bytes, vector has {}", bytes.len()))
}

/// Deterministic filler so failures reproduce without a seed.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(7)).collect()
}
