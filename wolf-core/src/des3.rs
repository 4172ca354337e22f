//! Triple DES (EDE3) in CBC mode, with single block ECB access.
//!
//! 3DES is retained for interoperability with legacy protocols only. Its 64 bit block limits a
//! key to far less data than AES, prefer [`aes`](crate::aes) for anything new.
use zeroize::Zeroize;
use crate::aes::Direction;
use crate::buf::Iv8;
use crate::Error;

/// The 3DES block size in bytes.
pub const BLOCK_SIZE: usize = 8;
/// The 3DES key size in bytes, three independent DES keys.
pub const KEY_SIZE: usize = 24;

const IP: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2, 60, 52, 44, 36, 28, 20, 12, 4,
    62, 54, 46, 38, 30, 22, 14, 6, 64, 56, 48, 40, 32, 24, 16, 8,
    57, 49, 41, 33, 25, 17, 9, 1, 59, 51, 43, 35, 27, 19, 11, 3,
    61, 53, 45, 37, 29, 21, 13, 5, 63, 55, 47, 39, 31, 23, 15, 7
];

const FP: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32, 39, 7, 47, 15, 55, 23, 63, 31,
    38, 6, 46, 14, 54, 22, 62, 30, 37, 5, 45, 13, 53, 21, 61, 29,
    36, 4, 44, 12, 52, 20, 60, 28, 35, 3, 43, 11, 51, 19, 59, 27,
    34, 2, 42, 10, 50, 18, 58, 26, 33, 1, 41, 9, 49, 17, 57, 25
];

const EXPAND: [u8; 48] = [
    32, 1, 2, 3, 4, 5, 4, 5, 6, 7, 8, 9, 8, 9, 10, 11,
    12, 13, 12, 13, 14, 15, 16, 17, 16, 17, 18, 19, 20, 21, 20, 21,
    22, 23, 24, 25, 24, 25, 26, 27, 28, 29, 28, 29, 30, 31, 32, 1
];

const PBOX: [u8; 32] = [
    16, 7, 20, 21, 29, 12, 28, 17, 1, 15, 23, 26, 5, 18, 31, 10,
    2, 8, 24, 14, 32, 27, 3, 9, 19, 13, 30, 6, 22, 11, 4, 25
];

const PC1: [u8; 56] = [
    57, 49, 41, 33, 25, 17, 9, 1, 58, 50, 42, 34, 26, 18,
    10, 2, 59, 51, 43, 35, 27, 19, 11, 3, 60, 52, 44, 36,
    63, 55, 47, 39, 31, 23, 15, 7, 62, 54, 46, 38, 30, 22,
    14, 6, 61, 53, 45, 37, 29, 21, 13, 5, 28, 20, 12, 4
];

const PC2: [u8; 48] = [
    14, 17, 11, 24, 1, 5, 3, 28, 15, 6, 21, 10,
    23, 19, 12, 4, 26, 8, 16, 7, 27, 20, 13, 2,
    41, 52, 31, 37, 47, 55, 30, 40, 51, 45, 33, 48,
    44, 49, 39, 56, 34, 53, 46, 42, 50, 36, 29, 32
];

const SHIFTS: [u32; 16] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

const SBOX: [[u8; 64]; 8] = [
    [
        14, 4, 13, 1, 2, 15, 11, 8, 3, 10, 6, 12, 5, 9, 0, 7,
        0, 15, 7, 4, 14, 2, 13, 1, 10, 6, 12, 11, 9, 5, 3, 8,
        4, 1, 14, 8, 13, 6, 2, 11, 15, 12, 9, 7, 3, 10, 5, 0,
        15, 12, 8, 2, 4, 9, 1, 7, 5, 11, 3, 14, 10, 0, 6, 13
    ],
    [
        15, 1, 8, 14, 6, 11, 3, 4, 9, 7, 2, 13, 12, 0, 5, 10,
        3, 13, 4, 7, 15, 2, 8, 14, 12, 0, 1, 10, 6, 9, 11, 5,
        0, 14, 7, 11, 10, 4, 13, 1, 5, 8, 12, 6, 9, 3, 2, 15,
        13, 8, 10, 1, 3, 15, 4, 2, 11, 6, 7, 12, 0, 5, 14, 9
    ],
    [
        10, 0, 9, 14, 6, 3, 15, 5, 1, 13, 12, 7, 11, 4, 2, 8,
        13, 7, 0, 9, 3, 4, 6, 10, 2, 8, 5, 14, 12, 11, 15, 1,
        13, 6, 4, 9, 8, 15, 3, 0, 11, 1, 2, 12, 5, 10, 14, 7,
        1, 10, 13, 0, 6, 9, 8, 7, 4, 15, 14, 3, 11, 5, 2, 12
    ],
    [
        7, 13, 14, 3, 0, 6, 9, 10, 1, 2, 8, 5, 11, 12, 4, 15,
        13, 8, 11, 5, 6, 15, 0, 3, 4, 7, 2, 12, 1, 10, 14, 9,
        10, 6, 9, 0, 12, 11, 7, 13, 15, 1, 3, 14, 5, 2, 8, 4,
        3, 15, 0, 6, 10, 1, 13, 8, 9, 4, 5, 11, 12, 7, 2, 14
    ],
    [
        2, 12, 4, 1, 7, 10, 11, 6, 8, 5, 3, 15, 13, 0, 14, 9,
        14, 11, 2, 12, 4, 7, 13, 1, 5, 0, 15, 10, 3, 9, 8, 6,
        4, 2, 1, 11, 10, 13, 7, 8, 15, 9, 12, 5, 6, 3, 0, 14,
        11, 8, 12, 7, 1, 14, 2, 13, 6, 15, 0, 9, 10, 4, 5, 3
    ],
    [
        12, 1, 10, 15, 9, 2, 6, 8, 0, 13, 3, 4, 14, 7, 5, 11,
        10, 15, 4, 2, 7, 12, 9, 5, 6, 1, 13, 14, 0, 11, 3, 8,
        9, 14, 15, 5, 2, 8, 12, 3, 7, 0, 4, 10, 1, 13, 11, 6,
        4, 3, 2, 12, 9, 5, 15, 10, 11, 14, 1, 7, 6, 0, 8, 13
    ],
    [
        4, 11, 2, 14, 15, 0, 8, 13, 3, 12, 9, 7, 5, 10, 6, 1,
        13, 0, 11, 7, 4, 9, 1, 10, 14, 3, 5, 12, 2, 15, 8, 6,
        1, 4, 11, 13, 12, 3, 7, 14, 10, 15, 6, 8, 0, 5, 9, 2,
        6, 11, 13, 8, 1, 4, 10, 7, 9, 5, 0, 15, 14, 2, 3, 12
    ],
    [
        13, 2, 8, 4, 6, 15, 11, 1, 10, 9, 3, 14, 5, 0, 12, 7,
        1, 15, 13, 8, 10, 3, 7, 4, 12, 5, 6, 11, 0, 14, 9, 2,
        7, 11, 4, 1, 9, 12, 14, 2, 0, 6, 10, 13, 15, 3, 5, 8,
        2, 1, 14, 7, 4, 10, 8, 13, 15, 12, 9, 0, 3, 5, 6, 11
    ]
];

/// Permute the low `in_bits` bits of `v`, positions are 1 based from the most significant.
#[inline]
fn permute(v: u64, table: &[u8], in_bits: u32) -> u64 {
    table.iter().fold(0u64, |acc, &pos| (acc << 1) | ((v >> (in_bits - u32::from(pos))) & 1))
}

fn key_schedule(key: &[u8; 8]) -> [u64; 16] {
    let k = permute(u64::from_be_bytes(*key), &PC1, 64);
    let (mut c, mut d) = (k >> 28, k & 0x0fff_ffff);
    let mut subkeys = [0u64; 16];

    for (sk, shift) in subkeys.iter_mut().zip(SHIFTS) {
        c = ((c << shift) | (c >> (28 - shift))) & 0x0fff_ffff;
        d = ((d << shift) | (d >> (28 - shift))) & 0x0fff_ffff;
        *sk = permute((c << 28) | d, &PC2, 56);
    }

    subkeys
}

fn feistel(r: u32, subkey: u64) -> u32 {
    let x = permute(u64::from(r), &EXPAND, 32) ^ subkey;
    let mut out = 0u64;
    for (i, sbox) in SBOX.iter().enumerate() {
        let six = ((x >> (42 - 6 * i)) & 0x3f) as usize;
        let row = ((six >> 4) & 2) | (six & 1);
        let col = (six >> 1) & 0xf;
        out = (out << 4) | u64::from(sbox[row * 16 + col]);
    }
    permute(out, &PBOX, 32) as u32
}

fn des_block(block: u64, subkeys: &[u64; 16], decrypt: bool) -> u64 {
    let v = permute(block, &IP, 64);
    let (mut l, mut r) = ((v >> 32) as u32, v as u32);

    for round in 0..16 {
        let sk = if decrypt { subkeys[15 - round] } else { subkeys[round] };
        let next = l ^ feistel(r, sk);
        l = r;
        r = next;
    }

    permute((u64::from(r) << 32) | u64::from(l), &FP, 64)
}

/// Raw 3DES-EDE3 block cipher.
#[derive(Clone)]
struct Ede3 {
    subkeys: [[u64; 16]; 3]
}

impl Ede3 {
    fn new(key: &[u8; KEY_SIZE]) -> Self {
        let mut parts = [[0u8; 8]; 3];
        for (p, k) in parts.iter_mut().zip(key.chunks_exact(8)) {
            p.copy_from_slice(k);
        }
        let subkeys = [key_schedule(&parts[0]), key_schedule(&parts[1]), key_schedule(&parts[2])];
        parts.zeroize();
        Self { subkeys }
    }

    fn encrypt(&self, block: &mut [u8; BLOCK_SIZE]) {
        let mut v = u64::from_be_bytes(*block);
        v = des_block(v, &self.subkeys[0], false);
        v = des_block(v, &self.subkeys[1], true);
        v = des_block(v, &self.subkeys[2], false);
        *block = v.to_be_bytes();
    }

    fn decrypt(&self, block: &mut [u8; BLOCK_SIZE]) {
        let mut v = u64::from_be_bytes(*block);
        v = des_block(v, &self.subkeys[2], true);
        v = des_block(v, &self.subkeys[1], false);
        v = des_block(v, &self.subkeys[0], true);
        *block = v.to_be_bytes();
    }
}

impl Drop for Ede3 {
    fn drop(&mut self) {
        self.subkeys.zeroize();
    }
}

/// Triple DES, EDE3 keying (`wc_Des3_SetKey`, `wc_Des3_CbcEncrypt` / `wc_Des3_CbcDecrypt`).
///
/// # Example
///
/// ```
/// use wolf_core::{des3::Des3, aes::Direction, buf::Iv8};
///
/// let key = [0x42u8; 24];
/// let iv = Iv8::new([7u8; 8]);
///
/// let mut cipher = [0u8; 16];
/// Des3::new(&key, &iv, Direction::Encrypt).encrypt(b"sixteen byte msg", &mut cipher).unwrap();
///
/// let mut plain = [0u8; 16];
/// Des3::new(&key, &iv, Direction::Decrypt).decrypt(&cipher, &mut plain).unwrap();
/// assert_eq!(&plain, b"sixteen byte msg");
/// ```
pub struct Des3 {
    ede: Ede3,
    reg: [u8; BLOCK_SIZE],
    dir: Direction
}

opaque_dbg! { Des3 }

impl Des3 {
    /// Key a new instance for `dir`.
    pub fn new(key: &[u8; KEY_SIZE], iv: &Iv8, dir: Direction) -> Self {
        let mut reg = [0u8; BLOCK_SIZE];
        reg.copy_from_slice(iv.slice());
        Self { ede: Ede3::new(key), reg, dir }
    }

    /// Key a new instance from a slice.
    ///
    /// # Errors
    ///
    /// [`Error::KeySize`] unless `key` is 24 bytes.
    pub fn new_from_slice(key: &[u8], iv: &Iv8, dir: Direction) -> Result<Self, Error> {
        let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| Error::KeySize)?;
        Ok(Self::new(key, iv, dir))
    }

    /// Replace the chaining value (`wc_Des3_SetIV`).
    pub fn set_iv(&mut self, iv: &Iv8) {
        self.reg.copy_from_slice(iv.slice());
    }

    /// The direction this instance was keyed for.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.dir
    }

    /// Encrypt a single block with no chaining (`wc_Des3_EcbEncrypt`).
    #[inline]
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.ede.encrypt(block);
    }

    /// Decrypt a single block with no chaining.
    #[inline]
    pub fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.ede.decrypt(block);
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
            self.ede.encrypt(&mut self.reg);
            block.copy_from_slice(&self.reg);
        }
    }

    fn cbc_decrypt(&mut self, buf: &mut [u8]) {
        let mut cur = [0u8; BLOCK_SIZE];
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            cur.copy_from_slice(block);
            let mut plain = cur;
            self.ede.decrypt(&mut plain);
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
    /// - [`Error::BadFuncArg`] if `input` is not a multiple of 8 bytes.
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
    /// - [`Error::BadFuncArg`] if `input` is not a multiple of 8 bytes.
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

impl Drop for Des3 {
    fn drop(&mut self) {
        self.reg.zeroize();
    }
}
