use crate::hash::engine::{BlockBuffer, Engine, LenOrder, load_le32, store_le32};
use zeroize::Zeroize;

const SHIFTS: [u32; 16] = [7, 12, 17, 22, 5, 9, 14, 20, 4, 11, 16, 23, 6, 10, 15, 21];

const K: [u32; 64] = [
    0xd76a_a478, 0xe8c7_b756, 0x2420_70db, 0xc1bd_ceee, 0xf57c_0faf, 0x4787_c62a, 0xa830_4613,
    0xfd46_9501, 0x6980_98d8, 0x8b44_f7af, 0xffff_5bb1, 0x895c_d7be, 0x6b90_1122, 0xfd98_7193,
    0xa679_438e, 0x49b4_0821, 0xf61e_2562, 0xc040_b340, 0x265e_5a51, 0xe9b6_c7aa, 0xd62f_105d,
    0x0244_1453, 0xd8a1_e681, 0xe7d3_fbc8, 0x21e1_cde6, 0xc337_07d6, 0xf4d5_0d87, 0x455a_14ed,
    0xa9e3_e905, 0xfcef_a3f8, 0x676f_02d9, 0x8d2a_4c8a, 0xfffa_3942, 0x8771_f681, 0x6d9d_6122,
    0xfde5_380c, 0xa4be_ea44, 0x4bde_cfa9, 0xf6bb_4b60, 0xbebf_bc70, 0x289b_7ec6, 0xeaa1_27fa,
    0xd4ef_3085, 0x0488_1d05, 0xd9d4_d039, 0xe6db_99e5, 0x1fa2_7cf8, 0xc4ac_5665, 0xf429_2244,
    0x432a_ff97, 0xab94_23a7, 0xfc93_a039, 0x655b_59c3, 0x8f0c_cc92, 0xffef_f47d, 0x8584_5dd1,
    0x6fa8_7e4f, 0xfe2c_e6e0, 0xa301_4314, 0x4e08_11a1, 0xf753_7e82, 0xbd3a_f235, 0x2ad7_d2bb,
    0xeb86_d391
];

pub(crate) const MD_IV: [u32; 4] = [0x6745_2301, 0xefcd_ab89, 0x98ba_dcfe, 0x1032_5476];

#[derive(Clone)]
pub(crate) struct Md5Core {
    state: [u32; 4],
    buffer: BlockBuffer<64>
}

fn compress(state: &mut [u32; 4], block: &[u8]) {
    let mut m = [0u32; 16];
    load_le32(block, &mut m);

    let [mut a, mut b, mut c, mut d] = *state;

    for i in 0..64 {
        let (f, g) = match i >> 4 {
            0 => ((b & c) | (!b & d), i),
            1 => ((d & b) | (!d & c), (5 * i + 1) & 15),
            2 => (b ^ c ^ d, (3 * i + 5) & 15),
            _ => (c ^ (b | !d), (7 * i) & 15)
        };

        let f = f.wrapping_add(a).wrapping_add(K[i]).wrapping_add(m[g]);
        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(f.rotate_left(SHIFTS[((i >> 4) << 2) | (i & 3)]));
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);

    m.zeroize();
}

impl Engine for Md5Core {
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
        "MD5 should be [considered cryptographically broken and unsuitable for further use](https://www.kb.cert.org/vuls/id/836068). \
        Collision attacks against MD5 are both practical and trivial, and theoretical \
        attacks against MD5 have been found."
    ],
    name: Md5,
    engine: Md5Core,
    ds: 16,
    bs: 64
}

#[cfg(test)]
mod vectors {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn rfc1321_suite() {
        let cases: [(&[u8], [u8; 16]); 4] = [
            (b"", hex!("d41d8cd98f00b204e9800998ecf8427e")),
            (b"a", hex!("0cc175b9c0f1b6a831c399e269772661")),
            (b"abc", hex!("900150983cd24fb0d6963f7d28e17f72")),
            (b"message digest", hex!("f96b697d7cb7938d525a2f31aaf161d0")),
        ];

        for (input, expected) in cases {
            let mut hasher = Md5::new();
            assert!(hasher.try_update(input).is_ok());
            assert_eq!(hasher.try_finalize().unwrap(), expected);
        }
    }
}
