//! The ChaCha block function and a keystream buffer over it.
use zeroize::Zeroize;

const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];
const TAU: [u32; 4] = [0x6170_7865, 0x3120_646e, 0x7962_2d36, 0x6b20_6574];

pub(crate) const BLOCK_LEN: usize = 64;

#[inline(always)]
fn quarter(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[a] = x[a].wrapping_add(x[b]); x[d] = (x[d] ^ x[a]).rotate_left(16);
    x[c] = x[c].wrapping_add(x[d]); x[b] = (x[b] ^ x[c]).rotate_left(12);
    x[a] = x[a].wrapping_add(x[b]); x[d] = (x[d] ^ x[a]).rotate_left(8);
    x[c] = x[c].wrapping_add(x[d]); x[b] = (x[b] ^ x[c]).rotate_left(7);
}

#[inline]
fn le32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// ChaCha20 with a 32 bit block counter and 96 bit nonce (RFC 8439).
///
/// A 16 byte key uses the `expand 16-byte k` constants with the key repeated.
#[derive(Clone)]
pub(crate) struct Core {
    state: [u32; 16],
    stream: [u8; BLOCK_LEN],
    left: usize
}

impl Core {
    /// `key` must be 16 or 32 bytes.
    pub(crate) fn new(key: &[u8]) -> Self {
        debug_assert!(key.len() == 16 || key.len() == 32);
        let mut state = [0u32; 16];
        state[..4].copy_from_slice(if key.len() == 32 { &SIGMA } else { &TAU });

        for (i, word) in state[4..12].iter_mut().enumerate() {
            let off = (i * 4) % key.len();
            *word = le32(&key[off..off + 4]);
        }

        Self { state, stream: [0u8; BLOCK_LEN], left: 0 }
    }

    /// Load the nonce and initial block counter, discarding any buffered keystream.
    pub(crate) fn set_iv(&mut self, iv: &[u8; 12], counter: u32) {
        self.state[12] = counter;
        self.state[13] = le32(&iv[0..]);
        self.state[14] = le32(&iv[4..]);
        self.state[15] = le32(&iv[8..]);
        self.stream.zeroize();
        self.left = 0;
    }

    /// Produce the next keystream block and advance the counter.
    pub(crate) fn block(&mut self, out: &mut [u8; BLOCK_LEN]) {
        let mut x = self.state;
        for _ in 0..10 {
            quarter(&mut x, 0, 4, 8, 12);
            quarter(&mut x, 1, 5, 9, 13);
            quarter(&mut x, 2, 6, 10, 14);
            quarter(&mut x, 3, 7, 11, 15);
            quarter(&mut x, 0, 5, 10, 15);
            quarter(&mut x, 1, 6, 11, 12);
            quarter(&mut x, 2, 7, 8, 13);
            quarter(&mut x, 3, 4, 9, 14);
        }

        for ((o, w), s) in out.chunks_exact_mut(4).zip(x.iter()).zip(self.state.iter()) {
            o.copy_from_slice(&w.wrapping_add(*s).to_le_bytes());
        }

        self.state[12] = self.state[12].wrapping_add(1);
        x.zeroize();
    }

    /// Xor the keystream into `buf`, continuing from any partially used block.
    pub(crate) fn apply(&mut self, mut buf: &mut [u8]) {
        if self.left != 0 {
            let take = self.left.min(buf.len());
            let start = BLOCK_LEN - self.left;
            for (b, k) in buf[..take].iter_mut().zip(&self.stream[start..start + take]) {
                *b ^= *k;
            }
            self.left -= take;
            buf = &mut buf[take..];
        }

        while !buf.is_empty() {
            let mut stream = [0u8; BLOCK_LEN];
            self.block(&mut stream);
            self.stream = stream;
            stream.zeroize();

            let take = buf.len().min(BLOCK_LEN);
            for (b, k) in buf[..take].iter_mut().zip(self.stream.iter()) {
                *b ^= *k;
            }
            self.left = BLOCK_LEN - take;
            buf = &mut buf[take..];
        }
    }

    /// Xor the keystream over `input` into the leading bytes of `output`.
    ///
    /// `output` must be at least as long as `input`.
    #[inline]
    pub(crate) fn apply_b2b(&mut self, input: &[u8], output: &mut [u8]) {
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.apply(out);
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        self.state.zeroize();
        self.stream.zeroize();
    }
}
