#![no_main]

use libfuzzer_sys::fuzz_target;
use wolf_core::aead::chacha20_poly1305::{encrypt, ChaCha20Poly1305, Decrypt, Encrypt};
use wolf_core::mac::poly1305::Key;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 { return }
    let key = Key::new([7u8; 32]);
    let cut = data.first().map_or(0, |b| usize::from(*b)).min(data.len());

    let mut one_shot = [0u8; 4096];
    let expected = encrypt(key.as_ref(), [42u8; 12], data, &mut one_shot, "fuzz").unwrap();

    let mut buf = data.to_vec();
    let (head, tail) = buf.split_at_mut(cut);
    let tag = ChaCha20Poly1305::new::<Encrypt>(key.as_ref(), [42u8; 12])
        .set_aad("fuzz").unwrap()
        .update_in_place(head).unwrap()
        .update_in_place(tail).unwrap()
        .finalize();

    assert_eq!(&buf[..], &one_shot[..data.len()]);
    assert_eq!(tag, expected);

    assert!(ChaCha20Poly1305::new::<Decrypt>(key.as_ref(), [42u8; 12])
        .set_aad("fuzz").unwrap()
        .update_in_place(&mut buf).unwrap()
        .verify(&tag)
        .is_ok());
    assert_eq!(buf, data);
});
