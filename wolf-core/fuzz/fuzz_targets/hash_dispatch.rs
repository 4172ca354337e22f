#![no_main]

use libfuzzer_sys::fuzz_target;
use wolf_core::hash::{hash, Hash, HashType, MAX_DIGEST_SIZE};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else { return };
    let ty = HashType::ALL[usize::from(selector) % HashType::ALL.len()];

    let Ok(mut h) = Hash::new(ty) else { return };
    let cut = usize::from(selector).min(rest.len());
    let (head, tail) = rest.split_at(cut);

    h.update(ty, head).unwrap();
    h.update(ty, tail).unwrap();

    let mut streamed = [0u8; MAX_DIGEST_SIZE];
    let len = h.finalize_into(ty, &mut streamed).unwrap();

    let mut one_shot = [0u8; MAX_DIGEST_SIZE];
    assert_eq!(hash(ty, rest, &mut one_shot), Ok(len));
    assert_eq!(streamed[..len], one_shot[..len]);
});
