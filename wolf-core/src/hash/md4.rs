use crate::hash::engine::{BlockBuffer, Engine, LenOrder, load_le32, store_le32};
use crate::hash::md5::MD_IV;
use zeroize::Zeroize;

const ROUND_2_ORDER: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];
const ROUND_3_ORDER: [usize; 16] = [0, 8, 4, 12, 2, 10, 6, 14, 1, 9, 5, 13, 3, 11, 7, 15];

// (a, b, c, d) rotate right one position every step.
const LANES: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 0, 1, 2], [2, 3, 0, 1], [1, 2, 3, 0]];

#[derive(Clone)]
pub(crate) struct Md4Core {
    state: [u32; 4],
    buffer: BlockBuffer<64>
}

#[inline(always)]
fn step(v: &mut [u32; 4], j: usize, mix: u32, word: u32, shift: u32) {
    let [a, ..] = LANES[j & 3];
    v[a] = v[a].wrapping_add(mix).wrapping_add(word).rotate_left(shift);
}

fn compress(state: &mut [u32; 4], block: &[u8]) {
    let mut x = [0u32; 16];
    load_le32(block, &mut x);

    let mut v = *state;

    for j in 0..16 {
        let [_, b, c, d] = LANES[j & 3];
        let f = (v[b] & v[c]) | (!v[b] & v[d]);
        step(&mut v, j, f, x[j], [3, 7, 11, 19][j & 3]);
    }

    for j in 0..16 {
        let [_, b, c, d] = LANES[j & 3];
        let g = (v[b] & v[c]) | (v[b] & v[d]) | (v[c] & v[d]);
        step(
            &mut v, j, g,
            x[ROUND_2_ORDER[j]].wrapping_add(0x5a82_7999),
            [3, 5, 9, 13][j & 3]
        );
    }

    for j in 0..16 {
        let [_, b, c, d] = LANES[j & 3];
        let h = v[b] ^ v[c] ^ v[d];
        step(
            &mut v, j, h,
            x[ROUND_3_ORDER[j]].wrapping_add(0x6ed9_eba1),
            [3, 9, 11, 15][j & 3]
        );
    }

    for (s, w) in state.iter_mut().zip(v) {
        *s = s.wrapping_add(w);
    }

    x.zeroize();
}

impl Engine for Md4Core {
    const BLOCK: usize = 64;
    const DIGEST: usize = 16;

    fn init() -> Self {
        Self { state: MD_IV, buffer: BlockBuffer::new() }
    }

    fn absorb(&mut self, data: &[u8]) {
        self.buffer.update(data, |block| compress(&mut self.state, block));
    }

    fn squeeze(mut self, out: &mut [u8]) {
        self.buffer.pad(8, LenOrder::Little, |block| compress(&mut self.state, block));
        store_le32(&self.state, &mut out[..Self::DIGEST]);
        self.wipe();
    }

    fn wipe(&mut self) {
        self.state.zeroize();
        self.buffer.wipe();
    }
}

make_api! {
    sec_warning: [
        "MD4 has been considered **fully compromised** since 1995, with original \
        weaknesses published in 1991, as of 2007 an attack can generate collisions in \
        less than two MD4 hash operations."
    ],
    name: Md4,
    engine: Md4Core,
    ds: 16,
    bs: 64
}
