use crate::hash::engine::{BlockBuffer, Engine, LenOrder, load_be32, store_be32};
use zeroize::Zeroize;

const IV: [u32; 5] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476, 0xc3d2_e1f0];

#[derive(Clone)]
pub(crate) struct Sha1Core {
    state: [u32; 5],
    buffer: BlockBuffer<64>
}

fn compress(state: &mut [u32; 5], block: &[u8]) {
    let mut w = [0u32; 80];
    load_be32(block, &mut w[..16]);
    for i in 16..80 {
        w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for (i, word) in w.iter().enumerate() {
        let (f, k) = match i / 20 {
            0 => ((b & c) | (!b & d), 0x5a82_7999),
            1 => (b ^ c ^ d, 0x6ed9_eba1),
            2 => ((b & c) | (b & d) | (c & d), 0x8f1b_bcdc),
            _ => (b ^ c ^ d, 0xca62_c1d6)
        };

        let temp = a.rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(*word);

        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e]) {
        *s = s.wrapping_add(v);
    }

    w.zeroize();
}

impl Engine for Sha1Core {
    const BLOCK: usize = 64;
    const DIGEST: usize = 20;

    fn init() -> Self {
        Self { state: IV, buffer: BlockBuffer::new() }
    }

    fn absorb(&mut self, data: &[u8]) {
        self.buffer.update(data, |block| compress(&mut self.state, block));
    }

    fn squeeze(mut self, out: &mut [u8]) {
        self.buffer.pad(8, LenOrder::Big, |block| compress(&mut self.state, block));
        store_be32(&self.state, &mut out[..Self::DIGEST]);
        self.wipe();
    }

    fn wipe(&mut self) {
        self.state.zeroize();
        self.buffer.wipe();
    }
}

make_api! {
    sec_warning: [
        "",
        "The SHA-1 algorithm is included in this library for legacy reasons only. It is \
        cryptographically broken and should not be used for any security-critical applications, \
        especially digital signatures or certificate validation.",
        "",
        "Use this algorithm only if absolutely necessary for backwards compatibility with legacy \
        systems. For all other purposes, please use more secure alternatives such as the SHA-2, \
        SHA-3, and Blake2 family hash functions."
    ],
    anecdote: "-1",
    name: Sha,
    engine: Sha1Core,
    ds: 20,
    bs: 64
}

#[cfg(test)]
mod vectors {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn fips_180_abc() {
        let mut hasher = Sha::new();
        assert!(hasher.try_update(b"abc").is_ok());
        assert_eq!(
            hasher.try_finalize().unwrap(),
            hex!("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
    }

    #[test]
    fn fips_180_two_block() {
        let mut hasher = Sha::new();
        assert!(hasher
            .try_update(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq")
            .is_ok());
        assert_eq!(
            hasher.try_finalize().unwrap(),
            hex!("84983e441c3bd26ebaae4aa1f95129e5e54670f1")
        );
    }
}
