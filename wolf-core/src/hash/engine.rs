//! Compression function plumbing shared by the digest implementations.
use zeroize::Zeroize;

/// A raw digest state machine.
///
/// The public hashers generated by `make_api!` wrap an `Engine`, adding length checks, the reset
/// on finalize behavior, and wiping on drop.
pub(crate) trait Engine: Clone {
    /// Internal block size in bytes.
    const BLOCK: usize;
    /// Digest size in bytes.
    const DIGEST: usize;

    /// The freshly initialized state.
    fn init() -> Self;

    /// Absorb `data`, processing whole blocks immediately.
    fn absorb(&mut self, data: &[u8]);

    /// Pad and write the digest into `out[..Self::DIGEST]`.
    ///
    /// `out` must be at least `Self::DIGEST` bytes.
    fn squeeze(self, out: &mut [u8]);

    /// Clear any buffered input and intermediate state.
    fn wipe(&mut self);
}

/// Partial block buffer for Merkle–Damgård constructions.
#[derive(Clone)]
pub(crate) struct BlockBuffer<const B: usize> {
    buf: [u8; B],
    pos: usize,
    total: u128
}

/// Byte order of the trailing message length.
#[derive(Copy, Clone)]
pub(crate) enum LenOrder {
    Big,
    Little
}

impl<const B: usize> BlockBuffer<B> {
    pub const fn new() -> Self {
        Self { buf: [0u8; B], pos: 0, total: 0 }
    }

    /// Feed `data`, calling `compress` for every completed block. Blocks passed to `compress`
    /// are always exactly `B` bytes.
    pub fn update(&mut self, mut data: &[u8], mut compress: impl FnMut(&[u8])) {
        self.total = self.total.wrapping_add(data.len() as u128);

        if self.pos != 0 {
            let take = (B - self.pos).min(data.len());
            self.buf[self.pos..self.pos + take].copy_from_slice(&data[..take]);
            self.pos += take;
            data = &data[take..];

            if self.pos < B { return }
            compress(&self.buf);
            self.pos = 0;
        }

        let mut blocks = data.chunks_exact(B);
        for block in &mut blocks {
            compress(block);
        }

        let rem = blocks.remainder();
        self.buf[..rem.len()].copy_from_slice(rem);
        self.pos = rem.len();
    }

    /// Apply the `0x80 || 0* || bit-length` padding. `len_bytes` is the width of the length
    /// field, 8 for 64 byte blocks and 16 for 128 byte blocks.
    pub fn pad(&mut self, len_bytes: usize, order: LenOrder, mut compress: impl FnMut(&[u8])) {
        let bits = self.total.wrapping_shl(3);

        self.buf[self.pos] = 0x80;
        self.pos += 1;

        if self.pos > B - len_bytes {
            self.buf[self.pos..].fill(0);
            compress(&self.buf);
            self.pos = 0;
        }

        self.buf[self.pos..B - len_bytes].fill(0);

        let len_field = &mut self.buf[B - len_bytes..];
        match (order, len_bytes) {
            (LenOrder::Big, 16) => len_field.copy_from_slice(&bits.to_be_bytes()),
            (LenOrder::Big, _) => len_field.copy_from_slice(&(bits as u64).to_be_bytes()),
            (LenOrder::Little, _) => len_field.copy_from_slice(&(bits as u64).to_le_bytes())
        }

        compress(&self.buf);
        self.pos = 0;
    }

    pub fn wipe(&mut self) {
        self.buf.zeroize();
        self.pos = 0;
        self.total = 0;
    }
}

#[inline]
pub(crate) fn load_be32(src: &[u8], dst: &mut [u32]) {
    for (word, chunk) in dst.iter_mut().zip(src.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

#[inline]
pub(crate) fn load_le32(src: &[u8], dst: &mut [u32]) {
    for (word, chunk) in dst.iter_mut().zip(src.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

#[inline]
pub(crate) fn load_be64(src: &[u8], dst: &mut [u64]) {
    for (word, chunk) in dst.iter_mut().zip(src.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *word = u64::from_be_bytes(bytes);
    }
}

#[inline]
pub(crate) fn load_le64(src: &[u8], dst: &mut [u64]) {
    for (word, chunk) in dst.iter_mut().zip(src.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *word = u64::from_le_bytes(bytes);
    }
}

/// Writes as many big-endian words as fit in `out`, truncating the final word if needed.
#[inline]
pub(crate) fn store_be32(src: &[u32], out: &mut [u8]) {
    for (word, chunk) in src.iter().zip(out.chunks_mut(4)) {
        chunk.copy_from_slice(&word.to_be_bytes()[..chunk.len()]);
    }
}

#[inline]
pub(crate) fn store_le32(src: &[u32], out: &mut [u8]) {
    for (word, chunk) in src.iter().zip(out.chunks_mut(4)) {
        chunk.copy_from_slice(&word.to_le_bytes()[..chunk.len()]);
    }
}

#[inline]
pub(crate) fn store_be64(src: &[u64], out: &mut [u8]) {
    for (word, chunk) in src.iter().zip(out.chunks_mut(8)) {
        chunk.copy_from_slice(&word.to_be_bytes()[..chunk.len()]);
    }
}

#[inline]
pub(crate) fn store_le64(src: &[u64], out: &mut [u8]) {
    for (word, chunk) in src.iter().zip(out.chunks_mut(8)) {
        chunk.copy_from_slice(&word.to_le_bytes()[..chunk.len()]);
    }
}
