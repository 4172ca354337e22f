//! 32 bit limb Poly1305 accumulator (26 bit limbs, 64 bit products).
use zeroize::Zeroize;

const MASK26: u32 = 0x03ff_ffff;
const HIBIT: u32 = 1 << 24;

#[inline(always)]
fn le32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

#[derive(Clone)]
pub(crate) struct Engine {
    r: [u32; 5],
    h: [u32; 5],
    pad: [u32; 4],
    buf: [u8; 16],
    leftover: usize
}

impl Engine {
    pub(crate) fn new(key: &[u8; 32]) -> Self {
        Self {
            r: [
                le32(&key[0..]) & 0x03ff_ffff,
                (le32(&key[3..]) >> 2) & 0x03ff_ff03,
                (le32(&key[6..]) >> 4) & 0x03ff_c0ff,
                (le32(&key[9..]) >> 6) & 0x03f0_3fff,
                (le32(&key[12..]) >> 8) & 0x000f_ffff
            ],
            h: [0; 5],
            pad: [le32(&key[16..]), le32(&key[20..]), le32(&key[24..]), le32(&key[28..])],
            buf: [0u8; 16],
            leftover: 0
        }
    }

    /// `m.len()` must be a multiple of 16.
    fn blocks(&mut self, m: &[u8], hibit: u32) {
        let [r0, r1, r2, r3, r4] = self.r;
        let (s1, s2, s3, s4) = (r1 * 5, r2 * 5, r3 * 5, r4 * 5);
        let [mut h0, mut h1, mut h2, mut h3, mut h4] = self.h;

        for block in m.chunks_exact(16) {
            h0 += le32(&block[0..]) & MASK26;
            h1 += (le32(&block[3..]) >> 2) & MASK26;
            h2 += (le32(&block[6..]) >> 4) & MASK26;
            h3 += (le32(&block[9..]) >> 6) & MASK26;
            h4 += (le32(&block[12..]) >> 8) | hibit;

            let m = |a: u32, b: u32| u64::from(a) * u64::from(b);

            let d0 = m(h0, r0) + m(h1, s4) + m(h2, s3) + m(h3, s2) + m(h4, s1);
            let mut d1 = m(h0, r1) + m(h1, r0) + m(h2, s4) + m(h3, s3) + m(h4, s2);
            let mut d2 = m(h0, r2) + m(h1, r1) + m(h2, r0) + m(h3, s4) + m(h4, s3);
            let mut d3 = m(h0, r3) + m(h1, r2) + m(h2, r1) + m(h3, r0) + m(h4, s4);
            let mut d4 = m(h0, r4) + m(h1, r3) + m(h2, r2) + m(h3, r1) + m(h4, r0);

            let mut c = (d0 >> 26) as u32;
            h0 = d0 as u32 & MASK26;
            d1 += u64::from(c);
            c = (d1 >> 26) as u32;
            h1 = d1 as u32 & MASK26;
            d2 += u64::from(c);
            c = (d2 >> 26) as u32;
            h2 = d2 as u32 & MASK26;
            d3 += u64::from(c);
            c = (d3 >> 26) as u32;
            h3 = d3 as u32 & MASK26;
            d4 += u64::from(c);
            c = (d4 >> 26) as u32;
            h4 = d4 as u32 & MASK26;
            h0 += c * 5;
            c = h0 >> 26;
            h0 &= MASK26;
            h1 += c;
        }

        self.h = [h0, h1, h2, h3, h4];
    }

    pub(crate) fn update(&mut self, mut m: &[u8]) {
        if self.leftover != 0 {
            let want = (16 - self.leftover).min(m.len());
            self.buf[self.leftover..self.leftover + want].copy_from_slice(&m[..want]);
            self.leftover += want;
            m = &m[want..];
            if self.leftover < 16 {
                return;
            }
            let block = self.buf;
            self.blocks(&block, HIBIT);
            self.leftover = 0;
        }

        let full = m.len() & !15;
        if full != 0 {
            self.blocks(&m[..full], HIBIT);
            m = &m[full..];
        }

        self.buf[..m.len()].copy_from_slice(m);
        self.leftover = m.len();
    }

    /// Zero pad the message as if `len` bytes had been written since the last boundary.
    pub(crate) fn pad(&mut self, len: u64) {
        let rem = (len % 16) as usize;
        if rem != 0 {
            self.update(&[0u8; 16][rem..]);
        }
    }

    /// Absorb the little-endian AAD and message lengths of the AEAD construction.
    pub(crate) fn encode_sizes(&mut self, aad_len: u64, msg_len: u64) {
        let mut block = [0u8; 16];
        block[..8].copy_from_slice(&aad_len.to_le_bytes());
        block[8..].copy_from_slice(&msg_len.to_le_bytes());
        self.update(&block);
    }

    pub(crate) fn finalize(mut self, tag: &mut [u8; 16]) {
        if self.leftover != 0 {
            let mut block = [0u8; 16];
            block[..self.leftover].copy_from_slice(&self.buf[..self.leftover]);
            block[self.leftover] = 1;
            self.blocks(&block, 0);
            block.zeroize();
        }

        let [mut h0, mut h1, mut h2, mut h3, mut h4] = self.h;

        let mut c = h1 >> 26;
        h1 &= MASK26;
        h2 += c;
        c = h2 >> 26;
        h2 &= MASK26;
        h3 += c;
        c = h3 >> 26;
        h3 &= MASK26;
        h4 += c;
        c = h4 >> 26;
        h4 &= MASK26;
        h0 += c * 5;
        c = h0 >> 26;
        h0 &= MASK26;
        h1 += c;

        // g = h + -p
        let mut g0 = h0.wrapping_add(5);
        c = g0 >> 26;
        g0 &= MASK26;
        let mut g1 = h1.wrapping_add(c);
        c = g1 >> 26;
        g1 &= MASK26;
        let mut g2 = h2.wrapping_add(c);
        c = g2 >> 26;
        g2 &= MASK26;
        let mut g3 = h3.wrapping_add(c);
        c = g3 >> 26;
        g3 &= MASK26;
        let mut g4 = h4.wrapping_add(c).wrapping_sub(1 << 26);

        // select h if h < p, or h + -p if h >= p
        let mut mask = (g4 >> 31).wrapping_sub(1);
        g0 &= mask;
        g1 &= mask;
        g2 &= mask;
        g3 &= mask;
        g4 &= mask;
        mask = !mask;
        h0 = (h0 & mask) | g0;
        h1 = (h1 & mask) | g1;
        h2 = (h2 & mask) | g2;
        h3 = (h3 & mask) | g3;
        h4 = (h4 & mask) | g4;

        let w0 = h0 | (h1 << 26);
        let w1 = (h1 >> 6) | (h2 << 20);
        let w2 = (h2 >> 12) | (h3 << 14);
        let w3 = (h3 >> 18) | (h4 << 8);

        let mut f = u64::from(w0) + u64::from(self.pad[0]);
        tag[0..4].copy_from_slice(&(f as u32).to_le_bytes());
        f = u64::from(w1) + u64::from(self.pad[1]) + (f >> 32);
        tag[4..8].copy_from_slice(&(f as u32).to_le_bytes());
        f = u64::from(w2) + u64::from(self.pad[2]) + (f >> 32);
        tag[8..12].copy_from_slice(&(f as u32).to_le_bytes());
        f = u64::from(w3) + u64::from(self.pad[3]) + (f >> 32);
        tag[12..16].copy_from_slice(&(f as u32).to_le_bytes());

        self.wipe();
    }

    pub(crate) fn wipe(&mut self) {
        self.r.zeroize();
        self.h.zeroize();
        self.pad.zeroize();
        self.buf.zeroize();
        self.leftover = 0;
    }
}

impl Drop for Engine {
    #[inline]
    fn drop(&mut self) {
        self.wipe();
    }
}
