#![no_main]

use libfuzzer_sys::fuzz_target;
use wolf_core::base64;

fuzz_target!(|data: &[u8]| {
    let mut decoded = [0u8; 8192];

    // arbitrary input must never panic, and a reported length must be honoured
    if let Ok(needed) = base64::decoded_len(data) {
        if needed <= decoded.len() {
            assert_eq!(base64::decode(data, &mut decoded), Ok(needed));
        }
    }

    if data.len() > 4096 { return }
    let mut encoded = [0u8; 8192];
    let len = base64::encode(data, Some(&mut encoded)).unwrap();

    assert_eq!(base64::decode(&encoded[..len], &mut decoded), Ok(data.len()));
    assert_eq!(&decoded[..data.len()], data);
});
