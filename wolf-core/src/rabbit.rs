//! The Rabbit stream cipher (RFC 4503).
use zeroize::Zeroize;
use crate::buf::Iv8;
use crate::Error;

/// The Rabbit key size in bytes.
pub const KEY_SIZE: usize = 16;

const BLOCK_LEN: usize = 16;

const A: [u32; 8] = [
    0x4d34_d34d, 0xd34d_34d3, 0x34d3_4d34, 0x4d34_d34d,
    0xd34d_34d3, 0x34d3_4d34, 0x4d34_d34d, 0xd34d_34d3
];

#[inline]
const fn g(u: u32, v: u32) -> u32 {
    let s = u.wrapping_add(v) as u64;
    let sq = s * s;
    ((sq >> 32) ^ sq) as u32
}

#[derive(Clone, Default)]
struct Core {
    x: [u32; 8],
    c: [u32; 8],
    carry: u32
}

impl Core {
    fn next_state(&mut self) {
        for (c, a) in self.c.iter_mut().zip(A) {
            let (sum, o1) = c.overflowing_add(a);
            let (sum, o2) = sum.overflowing_add(self.carry);
            *c = sum;
            self.carry = u32::from(o1 | o2);
        }

        let mut gs = [0u32; 8];
        for ((g_out, x), c) in gs.iter_mut().zip(self.x).zip(self.c) {
            *g_out = g(x, c);
        }

        for i in 0..8 {
            let (a, b) = (gs[(i + 7) & 7], gs[(i + 6) & 7]);
            self.x[i] = if i & 1 == 0 {
                gs[i].wrapping_add(a.rotate_left(16)).wrapping_add(b.rotate_left(16))
            } else {
                gs[i].wrapping_add(a.rotate_left(8)).wrapping_add(b)
            };
        }

        gs.zeroize();
    }

    fn keyed(key: &[u8; KEY_SIZE]) -> Self {
        let mut k = [0u32; 4];
        for (w, chunk) in k.iter_mut().zip(key.chunks_exact(4)) {
            *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let [k0, k1, k2, k3] = k;

        let mut core = Self {
            x: [
                k0, (k3 << 16) | (k2 >> 16), k1, (k0 << 16) | (k3 >> 16),
                k2, (k1 << 16) | (k0 >> 16), k3, (k2 << 16) | (k1 >> 16)
            ],
            c: [
                k2.rotate_left(16), (k0 & 0xffff_0000) | (k1 & 0xffff),
                k3.rotate_left(16), (k1 & 0xffff_0000) | (k2 & 0xffff),
                k0.rotate_left(16), (k2 & 0xffff_0000) | (k3 & 0xffff),
                k1.rotate_left(16), (k3 & 0xffff_0000) | (k0 & 0xffff)
            ],
            carry: 0
        };
        k.zeroize();

        for _ in 0..4 {
            core.next_state();
        }
        for i in 0..8 {
            core.c[i] ^= core.x[(i + 4) & 7];
        }
        core
    }

    fn with_iv(master: &Self, iv: &[u8]) -> Self {
        let i0 = u32::from_le_bytes([iv[0], iv[1], iv[2], iv[3]]);
        let i2 = u32::from_le_bytes([iv[4], iv[5], iv[6], iv[7]]);
        let i1 = (i0 >> 16) | (i2 & 0xffff_0000);
        let i3 = (i2 << 16) | (i0 & 0x0000_ffff);
        let ivs = [i0, i1, i2, i3];

        let mut core = master.clone();
        for (i, c) in core.c.iter_mut().enumerate() {
            *c ^= ivs[i & 3];
        }
        for _ in 0..4 {
            core.next_state();
        }
        core
    }

    fn block(&mut self, out: &mut [u8; BLOCK_LEN]) {
        self.next_state();
        let x = &self.x;
        let words = [
            x[0] ^ (x[5] >> 16) ^ (x[3] << 16),
            x[2] ^ (x[7] >> 16) ^ (x[5] << 16),
            x[4] ^ (x[1] >> 16) ^ (x[7] << 16),
            x[6] ^ (x[3] >> 16) ^ (x[1] << 16)
        ];
        for (dst, w) in out.chunks_exact_mut(4).zip(words) {
            dst.copy_from_slice(&w.to_le_bytes());
        }
    }
}

impl Zeroize for Core {
    fn zeroize(&mut self) {
        self.x.zeroize();
        self.c.zeroize();
        self.carry.zeroize();
    }
}

/// Rabbit keystream generator (`wc_RabbitSetKey`, `wc_RabbitProcess`).
///
/// Keystream left over from a partial block is kept, so splitting a message across calls to
/// [`process`](Self::process) yields the same output as a single call.
///
/// # Example
///
/// ```
/// use wolf_core::{rabbit::Rabbit, buf::Iv8};
///
/// let key = [0x11u8; 16];
/// let mut buf = *b"attack at dawn";
///
/// Rabbit::new(&key, Some(&Iv8::new([2u8; 8]))).process_in_place(&mut buf);
/// Rabbit::new(&key, Some(&Iv8::new([2u8; 8]))).process_in_place(&mut buf);
/// assert_eq!(&buf, b"attack at dawn");
/// ```
pub struct Rabbit {
    master: Core,
    work: Core,
    stream: [u8; BLOCK_LEN],
    left: usize
}

opaque_dbg! { Rabbit }

impl Rabbit {
    /// Key a new instance, optionally with an IV.
    pub fn new(key: &[u8; KEY_SIZE], iv: Option<&Iv8>) -> Self {
        let master = Core::keyed(key);
        let work = iv.map_or_else(|| master.clone(), |iv| Core::with_iv(&master, iv.slice()));
        Self { master, work, stream: [0; BLOCK_LEN], left: 0 }
    }

    /// Key a new instance from slices.
    ///
    /// # Errors
    ///
    /// - [`Error::KeySize`] unless `key` is 16 bytes.
    /// - [`Error::BadFuncArg`] if `iv` is present and not 8 bytes.
    pub fn new_from_slice(key: &[u8], iv: Option<&[u8]>) -> Result<Self, Error> {
        let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| Error::KeySize)?;
        let iv = match iv {
            Some(raw) => Some(Iv8::try_from(raw).map_err(|_| Error::BadFuncArg)?),
            None => None
        };
        Ok(Self::new(key, iv.as_ref()))
    }

    /// Restart the keystream from the keyed state with a new IV.
    pub fn set_iv(&mut self, iv: &Iv8) {
        self.work.zeroize();
        self.work = Core::with_iv(&self.master, iv.slice());
        self.stream.zeroize();
        self.left = 0;
    }

    /// XOR the keystream into `buf`.
    pub fn process_in_place(&mut self, mut buf: &mut [u8]) {
        if self.left != 0 {
            let take = self.left.min(buf.len());
            let start = BLOCK_LEN - self.left;
            for (b, k) in buf[..take].iter_mut().zip(&self.stream[start..start + take]) {
                *b ^= *k;
            }
            self.left -= take;
            buf = &mut core::mem::take(&mut buf)[take..];
        }

        let mut chunks = buf.chunks_exact_mut(BLOCK_LEN);
        for chunk in &mut chunks {
            self.work.block(&mut self.stream);
            for (b, k) in chunk.iter_mut().zip(self.stream.iter()) {
                *b ^= *k;
            }
        }

        let rem = chunks.into_remainder();
        if !rem.is_empty() {
            self.work.block(&mut self.stream);
            for (b, k) in rem.iter_mut().zip(self.stream.iter()) {
                *b ^= *k;
            }
            self.left = BLOCK_LEN - rem.len();
        }
    }

    /// XOR the keystream with `input`, writing to `output`.
    ///
    /// # Errors
    ///
    /// [`Error::Buffer`] if `output` is shorter than `input`. No keystream is consumed.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if output.len() < input.len() {
            return Err(Error::buffer(input.len(), output.len()));
        }
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.process_in_place(out);
        Ok(())
    }
}

impl Drop for Rabbit {
    fn drop(&mut self) {
        self.master.zeroize();
        self.work.zeroize();
        self.stream.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn keystream(key: &[u8; 16], iv: Option<&Iv8>, len: usize) -> std::vec::Vec<u8> {
        let mut out = std::vec![0u8; len];
        Rabbit::new(key, iv).process_in_place(&mut out);
        out
    }

    #[test]
    fn rfc4503_no_iv() {
        assert_eq!(
            keystream(&[0; 16], None, 48),
            hex!(
                "02f74a1c26456bf5ecd6a536f05457b1a78ac689476c697b390c9cc515d8e888"
                "96d6731688d168da51d40c70c3a116f4"
            )
        );
        assert_eq!(
            keystream(&hex!("acc351dcf162fc3bfe363d2e29132891"), None, 48),
            hex!(
                "9c51e28784c37fe9a127f63ec8f32d3d19fc5485aa53bf96885b40f461cd76f5"
                "5e4c4d20203be58a5043dbfb737454e5"
            )
        );
    }

    #[test]
    fn rfc4503_with_iv() {
        assert_eq!(
            keystream(&[0; 16], Some(&Iv8::new([0; 8])), 8),
            hex!("edb70567375dcd7c")
        );
        assert_eq!(
            keystream(
                &hex!("acc351dcf162fc3bfe363d2e29132891"),
                Some(&Iv8::new(hex!("597e26c175f573c3"))),
                32
            ),
            hex!("bc1a23d75bec5ce98d3ef9d763f15cbb477ad89e7c61aaaaa09e3f3ff664947c")
        );
    }

    #[test]
    fn set_iv_restarts_from_master() {
        let key = hex!("acc351dcf162fc3bfe363d2e29132891");
        let iv = Iv8::new(hex!("597e26c175f573c3"));

        let mut rabbit = Rabbit::new(&key, None);
        let mut junk = [0u8; 21];
        rabbit.process_in_place(&mut junk);

        rabbit.set_iv(&iv);
        let mut out = [0u8; 32];
        rabbit.process_in_place(&mut out);
        assert_eq!(out.as_slice(), keystream(&key, Some(&iv), 32));
    }

    #[test]
    fn split_processing_matches_whole() {
        let whole = keystream(&[7; 16], None, 64);
        let mut rabbit = Rabbit::new(&[7; 16], None);
        let mut parts = [0u8; 64];
        for piece in parts.chunks_mut(7) {
            rabbit.process_in_place(piece);
        }
        assert_eq!(parts.as_slice(), whole);
    }

    #[test]
    fn argument_errors() {
        assert!(matches!(Rabbit::new_from_slice(&[0; 15], None), Err(Error::KeySize)));
        assert!(matches!(Rabbit::new_from_slice(&[0; 16], Some(&[0; 7])), Err(Error::BadFuncArg)));

        let mut rabbit = Rabbit::new(&[0; 16], None);
        let mut out = [0u8; 3];
        assert_eq!(rabbit.process(&[0; 4], &mut out), Err(Error::buffer(4, 3)));
    }
}
