//! The Keccak-f\[1600\] permutation and sponge used by SHA-3 and SHAKE.
use zeroize::Zeroize;

const RC: [u64; 24] = [
    0x0000_0000_0000_0001, 0x0000_0000_0000_8082, 0x8000_0000_0000_808a, 0x8000_0000_8000_8000,
    0x0000_0000_0000_808b, 0x0000_0000_8000_0001, 0x8000_0000_8000_8081, 0x8000_0000_0000_8009,
    0x0000_0000_0000_008a, 0x0000_0000_0000_0088, 0x0000_0000_8000_8009, 0x0000_0000_8000_000a,
    0x0000_0000_8000_808b, 0x8000_0000_0000_008b, 0x8000_0000_0000_8089, 0x8000_0000_0000_8003,
    0x8000_0000_0000_8002, 0x8000_0000_0000_0080, 0x0000_0000_0000_800a, 0x8000_0000_8000_000a,
    0x8000_0000_8000_8081, 0x8000_0000_0000_8080, 0x0000_0000_8000_0001, 0x8000_0000_8000_8008
];

const ROTC: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44
];

const PILN: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1
];

/// Domain separation byte for SHA3-*.
pub(crate) const SHA3_PAD: u8 = 0x06;
/// Domain separation byte for SHAKE*.
pub(crate) const SHAKE_PAD: u8 = 0x1f;

pub(crate) fn keccak_f(st: &mut [u64; 25]) {
    let mut bc = [0u64; 5];

    for rc in RC {
        // theta
        for (i, c) in bc.iter_mut().enumerate() {
            *c = st[i] ^ st[i + 5] ^ st[i + 10] ^ st[i + 15] ^ st[i + 20];
        }
        for i in 0..5 {
            let t = bc[(i + 4) % 5] ^ bc[(i + 1) % 5].rotate_left(1);
            for j in (0..25).step_by(5) {
                st[j + i] ^= t;
            }
        }

        // rho pi
        let mut t = st[1];
        for (rot, j) in ROTC.iter().zip(PILN) {
            let next = st[j];
            st[j] = t.rotate_left(*rot);
            t = next;
        }

        // chi
        for j in (0..25).step_by(5) {
            bc.copy_from_slice(&st[j..j + 5]);
            for i in 0..5 {
                st[j + i] ^= !bc[(i + 1) % 5] & bc[(i + 2) % 5];
            }
        }

        // iota
        st[0] ^= rc;
    }
}

/// A Keccak sponge with a rate of `RATE` bytes.
#[derive(Clone)]
pub(crate) struct Sponge<const RATE: usize> {
    state: [u64; 25],
    pos: usize,
    squeezing: bool
}

impl<const RATE: usize> Sponge<RATE> {
    pub const fn new() -> Self {
        Self { state: [0u64; 25], pos: 0, squeezing: false }
    }

    #[inline]
    fn xor_byte(&mut self, idx: usize, byte: u8) {
        self.state[idx >> 3] ^= u64::from(byte) << ((idx & 7) << 3);
    }

    #[inline]
    fn byte(&self, idx: usize) -> u8 {
        (self.state[idx >> 3] >> ((idx & 7) << 3)) as u8
    }

    pub fn absorb(&mut self, mut data: &[u8]) {
        debug_assert!(!self.squeezing);

        // fast path, whole lanes while aligned
        while !data.is_empty() {
            if self.pos & 7 == 0 && data.len() >= 8 && self.pos + 8 <= RATE {
                let mut lane = [0u8; 8];
                lane.copy_from_slice(&data[..8]);
                self.state[self.pos >> 3] ^= u64::from_le_bytes(lane);
                self.pos += 8;
                data = &data[8..];
            } else {
                self.xor_byte(self.pos, data[0]);
                self.pos += 1;
                data = &data[1..];
            }

            if self.pos == RATE {
                keccak_f(&mut self.state);
                self.pos = 0;
            }
        }
    }

    /// Apply the domain separation byte and the final bit of the pad10*1 rule.
    pub fn pad(&mut self, domain: u8) {
        self.xor_byte(self.pos, domain);
        self.xor_byte(RATE - 1, 0x80);
        keccak_f(&mut self.state);
        self.pos = 0;
        self.squeezing = true;
    }

    /// Read output bytes, may be called repeatedly after [`pad`](Self::pad).
    pub fn squeeze(&mut self, out: &mut [u8]) {
        debug_assert!(self.squeezing);

        for byte in out {
            if self.pos == RATE {
                keccak_f(&mut self.state);
                self.pos = 0;
            }
            *byte = self.byte(self.pos);
            self.pos += 1;
        }
    }

    pub fn wipe(&mut self) {
        self.state.zeroize();
        self.pos = 0;
        self.squeezing = false;
    }
}

/// SHA3 with a `DS` byte digest, the rate is `200 - 2 * DS`.
#[derive(Clone)]
pub(crate) struct Sha3Core<const DS: usize, const RATE: usize> {
    sponge: Sponge<RATE>
}

impl<const DS: usize, const RATE: usize> crate::hash::engine::Engine for Sha3Core<DS, RATE> {
    const BLOCK: usize = RATE;
    const DIGEST: usize = DS;

    fn init() -> Self {
        Self { sponge: Sponge::new() }
    }

    fn absorb(&mut self, data: &[u8]) {
        self.sponge.absorb(data);
    }

    fn squeeze(mut self, out: &mut [u8]) {
        self.sponge.pad(SHA3_PAD);
        self.sponge.squeeze(&mut out[..DS]);
        self.sponge.wipe();
    }

    fn wipe(&mut self) {
        self.sponge.wipe();
    }
}
