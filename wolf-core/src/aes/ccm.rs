//! The CCM construction (RFC 3610, NIST SP 800-38C), CBC-MAC then CTR under one key.
//!
//! Argument validation (nonce, tag and payload lengths) belongs to
//! [`AesCcm`](crate::aead::AesCcm), this module assumes valid parameters.
use zeroize::Zeroize;
use crate::aes::{Aes, Key, BLOCK_SIZE};

/// Running CBC-MAC, bytes are xored into the state and a block is encrypted once full.
struct CbcMac<'a> {
    aes: &'a Aes,
    x: [u8; BLOCK_SIZE],
    filled: usize
}

impl<'a> CbcMac<'a> {
    fn new(aes: &'a Aes, b0: &[u8; BLOCK_SIZE]) -> Self {
        let mut x = *b0;
        aes.encrypt_block(&mut x);
        Self { aes, x, filled: 0 }
    }

    fn update(&mut self, data: &[u8]) {
        for byte in data {
            self.x[self.filled] ^= *byte;
            self.filled += 1;
            if self.filled == BLOCK_SIZE {
                self.aes.encrypt_block(&mut self.x);
                self.filled = 0;
            }
        }
    }

    /// Close the current block with zero padding.
    fn pad(&mut self) {
        if self.filled != 0 {
            self.aes.encrypt_block(&mut self.x);
            self.filled = 0;
        }
    }
}

impl<'a> Drop for CbcMac<'a> {
    fn drop(&mut self) {
        self.x.zeroize();
    }
}

pub(crate) struct Ccm {
    aes: Aes
}

impl Ccm {
    pub(crate) fn new(key: &Key) -> Self {
        Self { aes: Aes::new(key) }
    }

    /// Counter block `A_i`: flags `L - 1`, the nonce, then `i` in the trailing `L` bytes.
    fn counter_block(nonce: &[u8], i: u64) -> [u8; BLOCK_SIZE] {
        let l = 15 - nonce.len();
        let mut a = [0u8; BLOCK_SIZE];
        a[0] = (l - 1) as u8;
        a[1..=nonce.len()].copy_from_slice(nonce);
        let be = i.to_be_bytes();
        let take = l.min(8);
        a[BLOCK_SIZE - take..].copy_from_slice(&be[8 - take..]);
        a
    }

    fn mac(&self, nonce: &[u8], aad: &[u8], payload: &[u8], tag_len: usize) -> [u8; BLOCK_SIZE] {
        let l = 15 - nonce.len();

        let mut b0 = [0u8; BLOCK_SIZE];
        b0[0] = (u8::from(!aad.is_empty()) << 6) | ((((tag_len - 2) / 2) as u8) << 3) | (l - 1) as u8;
        b0[1..=nonce.len()].copy_from_slice(nonce);
        let q = (payload.len() as u64).to_be_bytes();
        let take = l.min(8);
        b0[BLOCK_SIZE - take..].copy_from_slice(&q[8 - take..]);

        let mut mac = CbcMac::new(&self.aes, &b0);

        if !aad.is_empty() {
            let a = aad.len() as u64;
            if a < 0xFF00 {
                mac.update(&(a as u16).to_be_bytes());
            } else if a <= u64::from(u32::MAX) {
                mac.update(&[0xFF, 0xFE]);
                mac.update(&(a as u32).to_be_bytes());
            } else {
                mac.update(&[0xFF, 0xFF]);
                mac.update(&a.to_be_bytes());
            }
            mac.update(aad);
            mac.pad();
        }

        mac.update(payload);
        mac.pad();

        mac.x
    }

    /// Apply the CTR keystream from counter 1 and mask `tag` with `S_0`.
    fn ctr(&self, nonce: &[u8], buf: &mut [u8], tag: &mut [u8; BLOCK_SIZE]) {
        let mut s = Self::counter_block(nonce, 0);
        self.aes.encrypt_block(&mut s);
        for (t, k) in tag.iter_mut().zip(s.iter()) {
            *t ^= *k;
        }

        for (i, chunk) in buf.chunks_mut(BLOCK_SIZE).enumerate() {
            s = Self::counter_block(nonce, i as u64 + 1);
            self.aes.encrypt_block(&mut s);
            for (b, k) in chunk.iter_mut().zip(s.iter()) {
                *b ^= *k;
            }
        }
        s.zeroize();
    }

    /// Encrypt `buf` in place. The first `tag_len` bytes of the result are the tag.
    pub(crate) fn seal(&self, nonce: &[u8], aad: &[u8], buf: &mut [u8], tag_len: usize) -> [u8; BLOCK_SIZE] {
        let mut tag = self.mac(nonce, aad, buf, tag_len);
        self.ctr(nonce, buf, &mut tag);
        tag
    }

    /// Decrypt `buf` in place and return the tag expected for it.
    pub(crate) fn open(&self, nonce: &[u8], aad: &[u8], buf: &mut [u8], tag_len: usize) -> [u8; BLOCK_SIZE] {
        let mut s0 = [0u8; BLOCK_SIZE];
        self.ctr(nonce, buf, &mut s0);
        let mut tag = self.mac(nonce, aad, buf, tag_len);
        for (t, s) in tag.iter_mut().zip(s0.iter()) {
            *t ^= *s;
        }
        s0.zeroize();
        tag
    }
}
