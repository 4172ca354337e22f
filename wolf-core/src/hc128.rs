//! The HC-128 stream cipher (eSTREAM portfolio).
use zeroize::Zeroize;
use crate::buf::Iv;
use crate::Error;

/// The HC-128 key size in bytes.
pub const KEY_SIZE: usize = 16;
/// The HC-128 IV size in bytes.
pub const IV_SIZE: usize = 16;

const TABLE: usize = 512;
const MASK: usize = TABLE - 1;

#[inline]
const fn f1(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
const fn f2(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline]
const fn g1(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_right(10) ^ z.rotate_right(23)).wrapping_add(y.rotate_right(8))
}

#[inline]
const fn g2(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_left(10) ^ z.rotate_left(23)).wrapping_add(y.rotate_left(8))
}

/// `h1` reads from `Q` and `h2` from `P`, hence the table is a parameter.
#[inline]
const fn h(table: &[u32; TABLE], x: u32) -> u32 {
    table[(x & 0xff) as usize].wrapping_add(table[256 + ((x >> 16) & 0xff) as usize])
}

#[inline]
const fn at(j: usize, back: usize) -> usize {
    (j + TABLE - back) & MASK
}

/// HC-128 keystream generator (`wc_Hc128_SetKey`, `wc_Hc128_Process`).
///
/// # Example
///
/// ```
/// use wolf_core::{hc128::Hc128, buf::Iv};
///
/// let key = [0u8; 16];
/// let mut out = [0u8; 4];
/// Hc128::new(&key, &Iv::new([0; 16])).process(&[0; 4], &mut out).unwrap();
/// assert_eq!(out, [0x82, 0x00, 0x15, 0x73]);
/// ```
pub struct Hc128 {
    p: [u32; TABLE],
    q: [u32; TABLE],
    counter: usize,
    word: [u8; 4],
    left: usize
}

opaque_dbg! { Hc128 }

impl Hc128 {
    /// Key a new instance.
    pub fn new(key: &[u8; KEY_SIZE], iv: &Iv) -> Self {
        let mut w = [0u32; 1280];
        for (i, chunk) in key.chunks_exact(4).enumerate() {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            w[i] = word;
            w[i + 4] = word;
        }
        for (i, chunk) in iv.slice().chunks_exact(4).enumerate() {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            w[i + 8] = word;
            w[i + 12] = word;
        }
        for i in 16..w.len() {
            w[i] = f2(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(f1(w[i - 15]))
                .wrapping_add(w[i - 16])
                .wrapping_add(i as u32);
        }

        let mut this = Self { p: [0; TABLE], q: [0; TABLE], counter: 0, word: [0; 4], left: 0 };
        this.p.copy_from_slice(&w[256..768]);
        this.q.copy_from_slice(&w[768..1280]);
        w.zeroize();

        for j in 0..TABLE {
            let p = &mut this.p;
            p[j] = p[j].wrapping_add(g1(p[at(j, 3)], p[at(j, 10)], p[at(j, 511)]))
                ^ h(&this.q, p[at(j, 12)]);
        }
        for j in 0..TABLE {
            let q = &mut this.q;
            q[j] = q[j].wrapping_add(g2(q[at(j, 3)], q[at(j, 10)], q[at(j, 511)]))
                ^ h(&this.p, q[at(j, 12)]);
        }

        this
    }

    /// Key a new instance from slices.
    ///
    /// # Errors
    ///
    /// - [`Error::KeySize`] unless `key` is 16 bytes.
    /// - [`Error::BadFuncArg`] unless `iv` is 16 bytes.
    pub fn new_from_slice(key: &[u8], iv: &[u8]) -> Result<Self, Error> {
        let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| Error::KeySize)?;
        let iv = Iv::try_from(iv).map_err(|_| Error::BadFuncArg)?;
        Ok(Self::new(key, &iv))
    }

    fn next_word(&mut self) -> u32 {
        let j = self.counter & MASK;
        let out = if self.counter < TABLE {
            let p = &mut self.p;
            p[j] = p[j].wrapping_add(g1(p[at(j, 3)], p[at(j, 10)], p[at(j, 511)]));
            h(&self.q, p[at(j, 12)]) ^ p[j]
        } else {
            let q = &mut self.q;
            q[j] = q[j].wrapping_add(g2(q[at(j, 3)], q[at(j, 10)], q[at(j, 511)]));
            h(&self.p, q[at(j, 12)]) ^ q[j]
        };
        self.counter = (self.counter + 1) & (2 * TABLE - 1);
        out
    }

    /// XOR the keystream into `buf`.
    pub fn process_in_place(&mut self, buf: &mut [u8]) {
        for b in buf {
            if self.left == 0 {
                self.word = self.next_word().to_le_bytes();
                self.left = 4;
            }
            *b ^= self.word[4 - self.left];
            self.left -= 1;
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

impl Drop for Hc128 {
    fn drop(&mut self) {
        self.p.zeroize();
        self.q.zeroize();
        self.word.zeroize();
    }
}


#[cfg(all(test, not(miri)))]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn bijective(
            key in any::<[u8; 16]>(),
            iv in any::<[u8; 16]>(),
            msg in proptest::collection::vec(any::<u8>(), 0..300)
        ) {
            let mut buf = msg.clone();
            Hc128::new(&key, &Iv::new(iv)).process_in_place(&mut buf);
            Hc128::new(&key, &Iv::new(iv)).process_in_place(&mut buf);
            prop_assert_eq!(buf, msg);
        }
    }
}
