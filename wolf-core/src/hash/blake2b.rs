//! BLAKE2b (RFC 7693), with configurable digest length and optional key.
use zeroize::Zeroize;
use crate::hash::engine::{load_le64, store_le64};

const IV: [u64; 8] = [
    0x6a09_e667_f3bc_c908, 0xbb67_ae85_84ca_a73b, 0x3c6e_f372_fe94_f82b, 0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1, 0x9b05_688c_2b3e_6c1f, 0x1f83_d9ab_fb41_bd6b, 0x5be0_cd19_137e_2179
];

const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0]
];

const BLOCK: usize = 128;

/// Raw BLAKE2b state. Unlike the Merkle–Damgård digests the final block must be compressed
/// with the finalization flag, so a full block is held back until more input arrives.
#[derive(Clone)]
pub(crate) struct Blake2bCore {
    h: [u64; 8],
    t: u128,
    buf: [u8; BLOCK],
    pos: usize,
    out_len: usize
}

#[inline(always)]
#[allow(clippy::many_single_char_names)]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

impl Blake2bCore {
    pub const BLOCK: usize = BLOCK;

    /// `out_len` must be in `1..=64` and `key` at most 64 bytes, callers check this.
    pub fn with_params(out_len: usize, key: &[u8]) -> Self {
        let mut h = IV;
        h[0] ^= 0x0101_0000 ^ ((key.len() as u64) << 8) ^ out_len as u64;

        let mut this = Self { h, t: 0, buf: [0u8; BLOCK], pos: 0, out_len };

        if !key.is_empty() {
            this.buf[..key.len()].copy_from_slice(key);
            this.pos = BLOCK;
        }

        this
    }

    fn compress(&mut self, last: bool) {
        let mut m = [0u64; 16];
        load_le64(&self.buf, &mut m);

        let mut v = [0u64; 16];
        v[..8].copy_from_slice(&self.h);
        v[8..].copy_from_slice(&IV);
        v[12] ^= self.t as u64;
        v[13] ^= (self.t >> 64) as u64;
        if last { v[14] = !v[14]; }

        for round in 0..12 {
            let s = &SIGMA[round % 10];
            g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
            g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
            g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
            g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
            g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
            g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
            g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
            g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
        }

        for (i, h) in self.h.iter_mut().enumerate() {
            *h ^= v[i] ^ v[i + 8];
        }

        m.zeroize();
        v.zeroize();
    }

    pub fn absorb(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.pos == BLOCK {
                self.t = self.t.wrapping_add(BLOCK as u128);
                self.compress(false);
                self.pos = 0;
            }

            let take = (BLOCK - self.pos).min(data.len());
            self.buf[self.pos..self.pos + take].copy_from_slice(&data[..take]);
            self.pos += take;
            data = &data[take..];
        }
    }

    /// Writes `out.len()` bytes of the digest, `out` is at most `out_len` bytes.
    pub fn squeeze(mut self, out: &mut [u8]) {
        debug_assert!(out.len() <= self.out_len);
        self.t = self.t.wrapping_add(self.pos as u128);
        self.buf[self.pos..].fill(0);
        self.compress(true);
        store_le64(&self.h, out);
        self.wipe();
    }

    pub fn wipe(&mut self) {
        self.h.zeroize();
        self.buf.zeroize();
        self.t = 0;
        self.pos = 0;
    }
}

blake_api! {
    name: Blake2b,
    core: Blake2bCore,
    max: 64
}
