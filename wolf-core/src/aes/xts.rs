//! AES-XTS (IEEE P1619), the storage encryption mode.
//!
//! A data unit of at least one block is encrypted under a 16 byte tweak, usually the sector
//! number. Lengths which are not a multiple of the block size use ciphertext stealing, so the
//! output is always exactly as long as the input.
use zeroize::Zeroize;
use crate::aes::{Aes, Direction, XtsKey, BLOCK_SIZE};
use crate::buf::Tweak;
use crate::Error;

/// Multiply the tweak by the primitive element of GF(2^128), little-endian.
#[inline]
fn mul_alpha(t: &mut [u8; BLOCK_SIZE]) {
    let mut carry = 0u8;
    for b in t.iter_mut() {
        let next = *b >> 7;
        *b = (*b << 1) | carry;
        carry = next;
    }
    t[0] ^= 0x87 & 0u8.wrapping_sub(carry);
}

#[inline]
fn xor_block(block: &mut [u8], t: &[u8; BLOCK_SIZE]) {
    for (b, t) in block.iter_mut().zip(t.iter()) {
        *b ^= *t;
    }
}

#[inline]
fn xex(aes: &Aes, t: &[u8; BLOCK_SIZE], block: &mut [u8], dir: Direction) {
    xor_block(block, t);
    match dir {
        Direction::Encrypt => aes.encrypt_slice(block),
        Direction::Decrypt => aes.decrypt_slice(block)
    }
    xor_block(block, t);
}

/// Process whole blocks, advancing the tweak per block.
fn blocks(aes: &Aes, t: &mut [u8; BLOCK_SIZE], buf: &mut [u8], dir: Direction) {
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        xex(aes, t, block, dir);
        mul_alpha(t);
    }
}

/// Process the final data, `buf.len() >= BLOCK_SIZE`, stealing ciphertext for a partial block.
fn last(aes: &Aes, t: &mut [u8; BLOCK_SIZE], buf: &mut [u8], dir: Direction) {
    let rem = buf.len() % BLOCK_SIZE;
    if rem == 0 {
        blocks(aes, t, buf, dir);
        return;
    }

    let head = buf.len() - rem - BLOCK_SIZE;
    let (init, rest) = buf.split_at_mut(head);
    blocks(aes, t, init, dir);

    let (full, tail) = rest.split_at_mut(BLOCK_SIZE);
    let mut stolen = [0u8; BLOCK_SIZE];

    match dir {
        Direction::Encrypt => {
            xex(aes, t, full, dir);
            mul_alpha(t);

            stolen[..rem].copy_from_slice(tail);
            stolen[rem..].copy_from_slice(&full[rem..]);
            tail.copy_from_slice(&full[..rem]);

            xex(aes, t, &mut stolen, dir);
        }
        Direction::Decrypt => {
            // the last full ciphertext block was produced under the following tweak
            let mut next = *t;
            mul_alpha(&mut next);
            xex(aes, &next, full, dir);

            stolen[..rem].copy_from_slice(tail);
            stolen[rem..].copy_from_slice(&full[rem..]);
            tail.copy_from_slice(&full[..rem]);

            xex(aes, t, &mut stolen, dir);
            next.zeroize();
        }
    }

    full.copy_from_slice(&stolen);
    stolen.zeroize();
}

#[inline]
const fn check(in_len: usize, out_len: usize) -> Result<(), Error> {
    if in_len < BLOCK_SIZE {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

/// AES-XTS over complete data units (`wc_AesXtsEncrypt` / `wc_AesXtsDecrypt`).
///
/// # Example
///
/// ```
/// use wolf_core::aes::{XtsKey, xts::AesXts};
///
/// let xts = AesXts::new(&XtsKey::Aes128([3u8; 32]));
///
/// let sector = [0x42u8; 37];
/// let mut cipher = [0u8; 37];
/// xts.encrypt_sector(9, &sector, &mut cipher).unwrap();
///
/// let mut plain = [0u8; 37];
/// xts.decrypt_sector(9, &cipher, &mut plain).unwrap();
/// assert_eq!(plain, sector);
/// ```
pub struct AesXts {
    data: Aes,
    tweak: Aes
}

opaque_dbg! { AesXts }

impl AesXts {
    /// Key the data and tweak ciphers from the two halves of `key`.
    pub fn new(key: &XtsKey) -> Self {
        let (k1, k2) = key.halves();
        // each half of an XtsKey is 16 or 32 bytes
        let (data, tweak) = match key {
            XtsKey::Aes128(_) => (
                Aes::new(&crate::aes::Key::Aes128(to_array(k1))),
                Aes::new(&crate::aes::Key::Aes128(to_array(k2)))
            ),
            XtsKey::Aes256(_) => (
                Aes::new(&crate::aes::Key::Aes256(to_array(k1))),
                Aes::new(&crate::aes::Key::Aes256(to_array(k2)))
            )
        };
        Self { data, tweak }
    }

    fn initial_tweak(&self, tweak: &Tweak) -> [u8; BLOCK_SIZE] {
        let mut t = [0u8; BLOCK_SIZE];
        t.copy_from_slice(tweak.slice());
        self.tweak.encrypt_block(&mut t);
        t
    }

    fn run(&self, tweak: &Tweak, input: &[u8], output: &mut [u8], dir: Direction) -> Result<(), Error> {
        check(input.len(), output.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);

        let mut t = self.initial_tweak(tweak);
        last(&self.data, &mut t, out, dir);
        t.zeroize();
        Ok(())
    }

    /// Encrypt one data unit.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `input` is shorter than one block.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt(&self, tweak: &Tweak, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.run(tweak, input, output, Direction::Encrypt)
    }

    /// Decrypt one data unit.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, tweak: &Tweak, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.run(tweak, input, output, Direction::Decrypt)
    }

    /// [`encrypt`](Self::encrypt) with the tweak derived from a sector number
    /// (`wc_AesXtsEncryptSector`).
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt).
    pub fn encrypt_sector(&self, sector: u128, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.encrypt(&Tweak::from_sector(sector), input, output)
    }

    /// [`decrypt`](Self::decrypt) with the tweak derived from a sector number
    /// (`wc_AesXtsDecryptSector`).
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt).
    pub fn decrypt_sector(&self, sector: u128, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        self.decrypt(&Tweak::from_sector(sector), input, output)
    }
}

#[inline]
fn to_array<const N: usize>(s: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(s);
    out
}

/// Incremental XTS over one data unit (`wc_AesXtsEncryptInit` / `Update` / `Final`).
///
/// Updates take whole blocks. The final call takes the remaining data, which must hold at
/// least one full block if it is not empty, so that a partial block can steal from it.
pub struct XtsStream {
    data: Aes,
    t: [u8; BLOCK_SIZE],
    dir: Direction
}

opaque_dbg! { XtsStream }

impl XtsStream {
    /// Begin processing the data unit identified by `tweak`.
    pub fn new(key: &XtsKey, tweak: &Tweak, dir: Direction) -> Self {
        let xts = AesXts::new(key);
        let t = xts.initial_tweak(tweak);
        let AesXts { data, .. } = xts;
        Self { data, t, dir }
    }

    /// Process a block aligned piece of the data unit.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `input` is not a multiple of the block size.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if input.len() % BLOCK_SIZE != 0 {
            return Err(Error::BadFuncArg);
        }
        if output.len() < input.len() {
            return Err(Error::buffer(input.len(), output.len()));
        }
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        blocks(&self.data, &mut self.t, out, self.dir);
        Ok(())
    }

    /// Process the remainder of the data unit, applying ciphertext stealing if needed.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `input` is non-empty and shorter than one block.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn finalize(mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if input.is_empty() {
            return Ok(());
        }
        check(input.len(), output.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        last(&self.data, &mut self.t, out, self.dir);
        Ok(())
    }
}

impl Drop for XtsStream {
    fn drop(&mut self) {
        self.t.zeroize();
    }
}
