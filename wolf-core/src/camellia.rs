//! Camellia (RFC 3713) with 128, 192 and 256 bit keys, in CBC mode with single block ECB access.
use zeroize::Zeroize;
use crate::aes::Direction;
use crate::buf::Iv;
use crate::Error;

/// The Camellia block size in bytes.
pub const BLOCK_SIZE: usize = 16;

const SBOX1: [u8; 256] = [
    0x70, 0x82, 0x2c, 0xec, 0xb3, 0x27, 0xc0, 0xe5, 0xe4, 0x85, 0x57, 0x35, 0xea, 0x0c, 0xae, 0x41,
    0x23, 0xef, 0x6b, 0x93, 0x45, 0x19, 0xa5, 0x21, 0xed, 0x0e, 0x4f, 0x4e, 0x1d, 0x65, 0x92, 0xbd,
    0x86, 0xb8, 0xaf, 0x8f, 0x7c, 0xeb, 0x1f, 0xce, 0x3e, 0x30, 0xdc, 0x5f, 0x5e, 0xc5, 0x0b, 0x1a,
    0xa6, 0xe1, 0x39, 0xca, 0xd5, 0x47, 0x5d, 0x3d, 0xd9, 0x01, 0x5a, 0xd6, 0x51, 0x56, 0x6c, 0x4d,
    0x8b, 0x0d, 0x9a, 0x66, 0xfb, 0xcc, 0xb0, 0x2d, 0x74, 0x12, 0x2b, 0x20, 0xf0, 0xb1, 0x84, 0x99,
    0xdf, 0x4c, 0xcb, 0xc2, 0x34, 0x7e, 0x76, 0x05, 0x6d, 0xb7, 0xa9, 0x31, 0xd1, 0x17, 0x04, 0xd7,
    0x14, 0x58, 0x3a, 0x61, 0xde, 0x1b, 0x11, 0x1c, 0x32, 0x0f, 0x9c, 0x16, 0x53, 0x18, 0xf2, 0x22,
    0xfe, 0x44, 0xcf, 0xb2, 0xc3, 0xb5, 0x7a, 0x91, 0x24, 0x08, 0xe8, 0xa8, 0x60, 0xfc, 0x69, 0x50,
    0xaa, 0xd0, 0xa0, 0x7d, 0xa1, 0x89, 0x62, 0x97, 0x54, 0x5b, 0x1e, 0x95, 0xe0, 0xff, 0x64, 0xd2,
    0x10, 0xc4, 0x00, 0x48, 0xa3, 0xf7, 0x75, 0xdb, 0x8a, 0x03, 0xe6, 0xda, 0x09, 0x3f, 0xdd, 0x94,
    0x87, 0x5c, 0x83, 0x02, 0xcd, 0x4a, 0x90, 0x33, 0x73, 0x67, 0xf6, 0xf3, 0x9d, 0x7f, 0xbf, 0xe2,
    0x52, 0x9b, 0xd8, 0x26, 0xc8, 0x37, 0xc6, 0x3b, 0x81, 0x96, 0x6f, 0x4b, 0x13, 0xbe, 0x63, 0x2e,
    0xe9, 0x79, 0xa7, 0x8c, 0x9f, 0x6e, 0xbc, 0x8e, 0x29, 0xf5, 0xf9, 0xb6, 0x2f, 0xfd, 0xb4, 0x59,
    0x78, 0x98, 0x06, 0x6a, 0xe7, 0x46, 0x71, 0xba, 0xd4, 0x25, 0xab, 0x42, 0x88, 0xa2, 0x8d, 0xfa,
    0x72, 0x07, 0xb9, 0x55, 0xf8, 0xee, 0xac, 0x0a, 0x36, 0x49, 0x2a, 0x68, 0x3c, 0x38, 0xf1, 0xa4,
    0x40, 0x28, 0xd3, 0x7b, 0xbb, 0xc9, 0x43, 0xc1, 0x15, 0xe3, 0xad, 0xf4, 0x77, 0xc7, 0x80, 0x9e
];

const fn derive(rot: u32, shift_input: bool) -> [u8; 256] {
    let mut out = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        out[i] = if shift_input {
            SBOX1[(i as u8).rotate_left(1) as usize]
        } else {
            SBOX1[i].rotate_left(rot)
        };
        i += 1;
    }
    out
}

const SBOX2: [u8; 256] = derive(1, false);
const SBOX3: [u8; 256] = derive(7, false);
const SBOX4: [u8; 256] = derive(0, true);

const SIGMA: [u64; 6] = [
    0xa09e_667f_3bcc_908b,
    0xb67a_e858_4caa_73b2,
    0xc6ef_372f_e94f_82be,
    0x54ff_53a5_f1d3_6f1c,
    0x10e5_27fa_de68_2d1d,
    0xb056_88c2_b3e6_c1fd
];

fn f(input: u64, key: u64) -> u64 {
    let x = (input ^ key).to_be_bytes();
    let t = [
        SBOX1[x[0] as usize], SBOX2[x[1] as usize], SBOX3[x[2] as usize], SBOX4[x[3] as usize],
        SBOX2[x[4] as usize], SBOX3[x[5] as usize], SBOX4[x[6] as usize], SBOX1[x[7] as usize]
    ];

    u64::from_be_bytes([
        t[0] ^ t[2] ^ t[3] ^ t[5] ^ t[6] ^ t[7],
        t[0] ^ t[1] ^ t[3] ^ t[4] ^ t[6] ^ t[7],
        t[0] ^ t[1] ^ t[2] ^ t[4] ^ t[5] ^ t[7],
        t[1] ^ t[2] ^ t[3] ^ t[4] ^ t[5] ^ t[6],
        t[0] ^ t[1] ^ t[5] ^ t[6] ^ t[7],
        t[1] ^ t[2] ^ t[4] ^ t[6] ^ t[7],
        t[2] ^ t[3] ^ t[4] ^ t[5] ^ t[7],
        t[0] ^ t[3] ^ t[4] ^ t[5] ^ t[6]
    ])
}

#[inline]
const fn split(v: u64) -> (u32, u32) {
    ((v >> 32) as u32, v as u32)
}

#[inline]
const fn join(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

fn fl(x: u64, k: u64) -> u64 {
    let ((mut x1, mut x2), (k1, k2)) = (split(x), split(k));
    x2 ^= (x1 & k1).rotate_left(1);
    x1 ^= x2 | k2;
    join(x1, x2)
}

fn fl_inv(y: u64, k: u64) -> u64 {
    let ((mut y1, mut y2), (k1, k2)) = (split(y), split(k));
    y1 ^= y2 | k2;
    y2 ^= (y1 & k1).rotate_left(1);
    join(y1, y2)
}

#[inline]
const fn halves(v: u128, rot: u32) -> [u64; 2] {
    let r = v.rotate_left(rot);
    [(r >> 64) as u64, r as u64]
}

/// Expanded Camellia key. The 128 bit variant runs 18 rounds, the larger keys 24.
#[derive(Clone)]
struct Schedule {
    kw: [u64; 4],
    k: [u64; 24],
    ke: [u64; 6],
    pairs: usize
}

impl Schedule {
    fn new(key: &[u8]) -> Result<Self, Error> {
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(Error::KeySize);
        }

        let (head, rest) = key.split_at(16);
        let kl = u128::from_be_bytes(head.try_into().map_err(|_| Error::KeySize)?);
        let kr = match rest.len() {
            0 => 0,
            8 => {
                let r = u64::from_be_bytes(rest.try_into().map_err(|_| Error::KeySize)?);
                (u128::from(r) << 64) | u128::from(!r)
            },
            _ => u128::from_be_bytes(rest.try_into().map_err(|_| Error::KeySize)?)
        };

        let mut d1 = ((kl ^ kr) >> 64) as u64;
        let mut d2 = (kl ^ kr) as u64;
        d2 ^= f(d1, SIGMA[0]);
        d1 ^= f(d2, SIGMA[1]);
        d1 ^= (kl >> 64) as u64;
        d2 ^= kl as u64;
        d2 ^= f(d1, SIGMA[2]);
        d1 ^= f(d2, SIGMA[3]);
        let ka = (u128::from(d1) << 64) | u128::from(d2);

        let mut out = Self { kw: [0; 4], k: [0; 24], ke: [0; 6], pairs: 9 };

        if key.len() == 16 {
            let [w0, w1] = halves(kl, 0);
            let [w2, w3] = halves(ka, 111);
            out.kw = [w0, w1, w2, w3];

            let parts = [
                halves(ka, 0), halves(kl, 15), halves(ka, 15), halves(kl, 45),
                [halves(ka, 45)[0], halves(kl, 60)[1]],
                halves(ka, 60), halves(kl, 94), halves(ka, 94), halves(kl, 111)
            ];
            for (dst, src) in out.k.chunks_exact_mut(2).zip(parts) {
                dst.copy_from_slice(&src);
            }

            for (dst, src) in out.ke.chunks_exact_mut(2).zip([halves(ka, 30), halves(kl, 77)]) {
                dst.copy_from_slice(&src);
            }
        } else {
            let mut d1 = ((ka ^ kr) >> 64) as u64;
            let mut d2 = (ka ^ kr) as u64;
            d2 ^= f(d1, SIGMA[4]);
            d1 ^= f(d2, SIGMA[5]);
            let kb = (u128::from(d1) << 64) | u128::from(d2);

            let [w0, w1] = halves(kl, 0);
            let [w2, w3] = halves(kb, 111);
            out.kw = [w0, w1, w2, w3];
            out.pairs = 12;

            let parts = [
                halves(kb, 0), halves(kr, 15), halves(ka, 15), halves(kb, 30),
                halves(kl, 45), halves(ka, 45), halves(kr, 60), halves(kb, 60),
                halves(kl, 77), halves(kr, 94), halves(ka, 94), halves(kl, 111)
            ];
            for (dst, src) in out.k.chunks_exact_mut(2).zip(parts) {
                dst.copy_from_slice(&src);
            }

            let parts = [halves(kr, 30), halves(kl, 60), halves(ka, 77)];
            for (dst, src) in out.ke.chunks_exact_mut(2).zip(parts) {
                dst.copy_from_slice(&src);
            }
        }

        Ok(out)
    }

    fn encrypt(&self, block: &mut [u8; BLOCK_SIZE]) {
        let v = u128::from_be_bytes(*block);
        let mut d1 = ((v >> 64) as u64) ^ self.kw[0];
        let mut d2 = (v as u64) ^ self.kw[1];

        for i in 0..self.pairs {
            if i != 0 && i % 3 == 0 {
                let j = i / 3 - 1;
                d1 = fl(d1, self.ke[2 * j]);
                d2 = fl_inv(d2, self.ke[2 * j + 1]);
            }
            d2 ^= f(d1, self.k[2 * i]);
            d1 ^= f(d2, self.k[2 * i + 1]);
        }

        d2 ^= self.kw[2];
        d1 ^= self.kw[3];
        *block = ((u128::from(d2) << 64) | u128::from(d1)).to_be_bytes();
    }

    fn decrypt(&self, block: &mut [u8; BLOCK_SIZE]) {
        let v = u128::from_be_bytes(*block);
        let mut d1 = ((v >> 64) as u64) ^ self.kw[2];
        let mut d2 = (v as u64) ^ self.kw[3];

        for i in (0..self.pairs).rev() {
            d2 ^= f(d1, self.k[2 * i + 1]);
            d1 ^= f(d2, self.k[2 * i]);
            if i != 0 && i % 3 == 0 {
                let j = i / 3 - 1;
                d1 = fl(d1, self.ke[2 * j + 1]);
                d2 = fl_inv(d2, self.ke[2 * j]);
            }
        }

        d2 ^= self.kw[0];
        d1 ^= self.kw[1];
        *block = ((u128::from(d2) << 64) | u128::from(d1)).to_be_bytes();
    }
}

impl Drop for Schedule {
    fn drop(&mut self) {
        self.kw.zeroize();
        self.k.zeroize();
        self.ke.zeroize();
    }
}

/// Camellia in CBC mode (`wc_CamelliaSetKey`, `wc_CamelliaCbcEncrypt` /
/// `wc_CamelliaCbcDecrypt`).
///
/// # Example
///
/// ```
/// use wolf_core::{camellia::Camellia, aes::Direction, buf::Iv};
///
/// let key = [0x42u8; 32];
/// let iv = Iv::new([7u8; 16]);
///
/// let mut cipher = [0u8; 32];
/// Camellia::new(&key, &iv, Direction::Encrypt).unwrap()
///     .encrypt(b"thirty two bytes of plain text!!", &mut cipher).unwrap();
///
/// let mut plain = [0u8; 32];
/// Camellia::new(&key, &iv, Direction::Decrypt).unwrap()
///     .decrypt(&cipher, &mut plain).unwrap();
/// assert_eq!(&plain, b"thirty two bytes of plain text!!");
/// ```
pub struct Camellia {
    schedule: Schedule,
    reg: [u8; BLOCK_SIZE],
    dir: Direction
}

opaque_dbg! { Camellia }

impl Camellia {
    /// Key a new instance for `dir`.
    ///
    /// # Errors
    ///
    /// [`Error::KeySize`] unless `key` is 16, 24 or 32 bytes.
    pub fn new(key: &[u8], iv: &Iv, dir: Direction) -> Result<Self, Error> {
        let schedule = Schedule::new(key)?;
        let mut reg = [0u8; BLOCK_SIZE];
        reg.copy_from_slice(iv.slice());
        Ok(Self { schedule, reg, dir })
    }

    /// Replace the chaining value (`wc_CamelliaSetIV`).
    pub fn set_iv(&mut self, iv: &Iv) {
        self.reg.copy_from_slice(iv.slice());
    }

    /// The direction this instance was keyed for.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.dir
    }

    /// Encrypt a single block with no chaining (`wc_CamelliaEncryptDirect`).
    #[inline]
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.schedule.encrypt(block);
    }

    /// Decrypt a single block with no chaining (`wc_CamelliaDecryptDirect`).
    #[inline]
    pub fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.schedule.decrypt(block);
    }

    fn check(&self, dir: Direction, in_len: usize, out_len: usize) -> Result<(), Error> {
        if self.dir != dir {
            return Err(Error::BadState);
        }
        if in_len % BLOCK_SIZE != 0 {
            return Err(Error::BadFuncArg);
        }
        if out_len < in_len {
            return Err(Error::buffer(in_len, out_len));
        }
        Ok(())
    }

    fn cbc_encrypt(&mut self, buf: &mut [u8]) {
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            for (r, b) in self.reg.iter_mut().zip(block.iter()) {
                *r ^= *b;
            }
            self.schedule.encrypt(&mut self.reg);
            block.copy_from_slice(&self.reg);
        }
    }

    fn cbc_decrypt(&mut self, buf: &mut [u8]) {
        let mut cur = [0u8; BLOCK_SIZE];
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            cur.copy_from_slice(block);
            let mut plain = cur;
            self.schedule.decrypt(&mut plain);
            for ((b, p), r) in block.iter_mut().zip(plain.iter()).zip(self.reg.iter()) {
                *b = *p ^ *r;
            }
            self.reg = cur;
            plain.zeroize();
        }
    }

    /// Encrypt `input` into `output`.
    ///
    /// # Errors
    ///
    /// - [`Error::BadState`] if keyed for decryption.
    /// - [`Error::BadFuncArg`] if `input` is not a multiple of 16 bytes.
    /// - [`Error::Buffer`] if `output` is too short.
    pub fn encrypt(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.check(Direction::Encrypt, input.len(), output.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.cbc_encrypt(out);
        Ok(())
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt), minus the buffer check.
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.check(Direction::Encrypt, buf.len(), buf.len())?;
        self.cbc_encrypt(buf);
        Ok(())
    }

    /// Decrypt `input` into `output`.
    ///
    /// # Errors
    ///
    /// - [`Error::BadState`] if keyed for encryption.
    /// - [`Error::BadFuncArg`] if `input` is not a multiple of 16 bytes.
    /// - [`Error::Buffer`] if `output` is too short.
    pub fn decrypt(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.check(Direction::Decrypt, input.len(), output.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.cbc_decrypt(out);
        Ok(())
    }

    /// Decrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt), minus the buffer check.
    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.check(Direction::Decrypt, buf.len(), buf.len())?;
        self.cbc_decrypt(buf);
        Ok(())
    }
}

impl Drop for Camellia {
    fn drop(&mut self) {
        self.reg.zeroize();
    }
}
