#![no_main]

use libfuzzer_sys::fuzz_target;
use wolf_core::ct::{hex_decode, hex_encode};

fuzz_target!(|data: &[u8]| {
    let mut outbuf = [0u8; 8192];
    if data.len() > 4096 { return }

    let _res = core::hint::black_box(hex_decode(data, outbuf.as_mut_slice()));
    let len = hex_encode(data, outbuf.as_mut_slice()).unwrap();

    let mut decoded_buf = [0u8; 4096];
    hex_decode(&outbuf[..len], decoded_buf.as_mut_slice()).unwrap();

    assert_eq!(&decoded_buf[..data.len()], data);
});
