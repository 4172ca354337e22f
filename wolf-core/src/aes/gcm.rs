//! The GCM construction (NIST SP 800-38D) shared by [`AesGcm`], [`AesGcmStream`] and [`Gmac`].
//!
//! [`AesGcm`]: crate::aead::AesGcm
//! [`AesGcmStream`]: crate::aead::AesGcmStream
//! [`Gmac`]: crate::mac::gmac::Gmac
use zeroize::Zeroize;
use crate::aes::{Aes, Key, BLOCK_SIZE};

const R: u128 = 0xe1 << 120;

/// Multiply in GF(2^128) with the bit reflected GCM convention.
///
/// Runs a fixed 128 iterations with masks in place of branches.
#[inline]
fn gf_mul(x: u128, y: u128) -> u128 {
    let mut z = 0u128;
    let mut v = y;
    for i in 0..128 {
        let bit = (x >> (127 - i)) & 1;
        z ^= v & 0u128.wrapping_sub(bit);
        let lsb = v & 1;
        v = (v >> 1) ^ (R & 0u128.wrapping_sub(lsb));
    }
    z
}

/// GHASH accumulator.
///
/// Input arrives in arbitrary pieces through [`update`](Self::update), a partial block is held
/// back until [`pad`](Self::pad) closes the segment with zeros.
pub(crate) struct GHash {
    h: u128,
    y: u128,
    pending: [u8; BLOCK_SIZE],
    pending_len: usize
}

impl GHash {
    pub(crate) fn new(h: &[u8; BLOCK_SIZE]) -> Self {
        Self { h: u128::from_be_bytes(*h), y: 0, pending: [0u8; BLOCK_SIZE], pending_len: 0 }
    }

    #[inline]
    fn block(&mut self, block: &[u8]) {
        let mut b = [0u8; BLOCK_SIZE];
        b[..block.len()].copy_from_slice(block);
        self.y = gf_mul(self.y ^ u128::from_be_bytes(b), self.h);
        b.zeroize();
    }

    /// Absorb `data`, continuing the current segment.
    pub(crate) fn update(&mut self, mut data: &[u8]) {
        if self.pending_len != 0 {
            let take = (BLOCK_SIZE - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];

            if self.pending_len < BLOCK_SIZE {
                return;
            }
            let full = self.pending;
            self.block(&full);
            self.pending_len = 0;
        }

        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            self.block(chunk);
        }
        let rest = chunks.remainder();
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    /// Close the current segment, zero padding it to a block boundary.
    pub(crate) fn pad(&mut self) {
        if self.pending_len != 0 {
            let mut part = self.pending;
            self.block(&part[..self.pending_len]);
            self.pending_len = 0;
            part.zeroize();
        }
    }

    /// Absorb `data` as a complete segment.
    pub(crate) fn update_padded(&mut self, data: &[u8]) {
        self.update(data);
        self.pad();
    }

    /// Absorb the bit lengths of the AAD and the ciphertext, both given in bytes.
    pub(crate) fn lengths(&mut self, aad_len: u64, ct_len: u64) {
        let mut block = [0u8; BLOCK_SIZE];
        block[..8].copy_from_slice(&(aad_len * 8).to_be_bytes());
        block[8..].copy_from_slice(&(ct_len * 8).to_be_bytes());
        self.block(&block);
    }

    pub(crate) fn finish(&self) -> [u8; BLOCK_SIZE] {
        self.y.to_be_bytes()
    }
}

impl Drop for GHash {
    fn drop(&mut self) {
        self.h.zeroize();
        self.y.zeroize();
        self.pending.zeroize();
    }
}

#[inline]
fn inc32(block: &mut [u8; BLOCK_SIZE]) {
    let ctr = u32::from_be_bytes([block[12], block[13], block[14], block[15]]).wrapping_add(1);
    block[12..].copy_from_slice(&ctr.to_be_bytes());
}

/// A keyed GCM instance, the block cipher plus the hash subkey `H = E(0^128)`.
pub(crate) struct Gcm {
    aes: Aes,
    h: [u8; BLOCK_SIZE]
}

impl Gcm {
    pub(crate) fn new(key: &Key) -> Self {
        let aes = Aes::new(key);
        let mut h = [0u8; BLOCK_SIZE];
        aes.encrypt_block(&mut h);
        Self { aes, h }
    }

    /// The pre-counter block, `iv` must not be empty.
    fn j0(&self, iv: &[u8]) -> [u8; BLOCK_SIZE] {
        let mut j0 = [0u8; BLOCK_SIZE];
        if iv.len() == 12 {
            j0[..12].copy_from_slice(iv);
            j0[15] = 1;
        } else {
            let mut gh = GHash::new(&self.h);
            gh.update_padded(iv);
            gh.lengths(0, iv.len() as u64);
            j0 = gh.finish();
        }
        j0
    }

    /// Apply the keystream starting at `inc32(j0)`.
    fn gctr(&self, j0: &[u8; BLOCK_SIZE], buf: &mut [u8]) {
        let mut ctr = *j0;
        let mut ks = [0u8; BLOCK_SIZE];
        for chunk in buf.chunks_mut(BLOCK_SIZE) {
            inc32(&mut ctr);
            ks = ctr;
            self.aes.encrypt_block(&mut ks);
            for (b, k) in chunk.iter_mut().zip(ks.iter()) {
                *b ^= *k;
            }
        }
        ks.zeroize();
        ctr.zeroize();
    }

    fn tag(&self, j0: &[u8; BLOCK_SIZE], aad: &[u8], ct: &[u8]) -> [u8; BLOCK_SIZE] {
        let mut gh = GHash::new(&self.h);
        gh.update_padded(aad);
        gh.update_padded(ct);
        gh.lengths(aad.len() as u64, ct.len() as u64);
        self.mask_tag(j0, &gh)
    }

    /// `E(j0) ^ S`, the final step of tag generation.
    fn mask_tag(&self, j0: &[u8; BLOCK_SIZE], gh: &GHash) -> [u8; BLOCK_SIZE] {
        let mut tag = *j0;
        self.aes.encrypt_block(&mut tag);
        for (t, s) in tag.iter_mut().zip(gh.finish().iter()) {
            *t ^= *s;
        }
        tag
    }

    /// Encrypt `buf` in place and return the full length tag.
    pub(crate) fn seal(&self, iv: &[u8], aad: &[u8], buf: &mut [u8]) -> [u8; BLOCK_SIZE] {
        let mut j0 = self.j0(iv);
        self.gctr(&j0, buf);
        let tag = self.tag(&j0, aad, buf);
        j0.zeroize();
        tag
    }

    /// Decrypt `buf` in place and return the full length tag expected for it. The caller
    /// compares and discards the plaintext on mismatch.
    pub(crate) fn open(&self, iv: &[u8], aad: &[u8], buf: &mut [u8]) -> [u8; BLOCK_SIZE] {
        let mut j0 = self.j0(iv);
        let tag = self.tag(&j0, aad, buf);
        self.gctr(&j0, buf);
        j0.zeroize();
        tag
    }
}

impl Drop for Gcm {
    fn drop(&mut self) {
        self.h.zeroize();
    }
}

/// Incremental GCM over one IV.
///
/// AAD is absorbed until the first byte of data, after which further AAD is refused by the
/// caller. The keystream position carries across calls so data may be split anywhere.
pub(crate) struct GcmStream {
    gcm: Gcm,
    j0: [u8; BLOCK_SIZE],
    ctr: [u8; BLOCK_SIZE],
    ks: [u8; BLOCK_SIZE],
    ks_pos: usize,
    ghash: GHash,
    aad_len: u64,
    data_len: u64,
    aad_closed: bool
}

impl GcmStream {
    /// `iv` must not be empty.
    pub(crate) fn new(key: &Key, iv: &[u8]) -> Self {
        let gcm = Gcm::new(key);
        let j0 = gcm.j0(iv);
        let ghash = GHash::new(&gcm.h);
        Self {
            gcm,
            j0,
            ctr: j0,
            ks: [0u8; BLOCK_SIZE],
            ks_pos: BLOCK_SIZE,
            ghash,
            aad_len: 0,
            data_len: 0,
            aad_closed: false
        }
    }

    #[inline]
    pub(crate) const fn aad_len(&self) -> u64 {
        self.aad_len
    }

    #[inline]
    pub(crate) const fn data_len(&self) -> u64 {
        self.data_len
    }

    pub(crate) fn aad(&mut self, aad: &[u8]) {
        debug_assert!(!self.aad_closed);
        self.ghash.update(aad);
        self.aad_len += aad.len() as u64;
    }

    #[inline]
    fn close_aad(&mut self) {
        if !self.aad_closed {
            self.ghash.pad();
            self.aad_closed = true;
        }
    }

    fn apply(&mut self, buf: &mut [u8]) {
        for b in buf {
            if self.ks_pos == BLOCK_SIZE {
                inc32(&mut self.ctr);
                self.ks = self.ctr;
                self.gcm.aes.encrypt_block(&mut self.ks);
                self.ks_pos = 0;
            }
            *b ^= self.ks[self.ks_pos];
            self.ks_pos += 1;
        }
    }

    pub(crate) fn encrypt(&mut self, buf: &mut [u8]) {
        self.close_aad();
        self.apply(buf);
        self.ghash.update(buf);
        self.data_len += buf.len() as u64;
    }

    pub(crate) fn decrypt(&mut self, buf: &mut [u8]) {
        self.close_aad();
        self.ghash.update(buf);
        self.apply(buf);
        self.data_len += buf.len() as u64;
    }

    /// The full length tag over everything absorbed, the stream must not be used afterwards.
    pub(crate) fn finish(&mut self) -> [u8; BLOCK_SIZE] {
        self.close_aad();
        self.ghash.pad();
        self.ghash.lengths(self.aad_len, self.data_len);
        self.gcm.mask_tag(&self.j0, &self.ghash)
    }
}

impl Drop for GcmStream {
    fn drop(&mut self) {
        self.j0.zeroize();
        self.ctr.zeroize();
        self.ks.zeroize();
    }
}
