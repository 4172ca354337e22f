//! The ARC4 stream cipher.
//!
//! ARC4 is broken, its keystream is biased from the first byte on. It is here only to read
//! legacy data, never use it to protect anything new.
use zeroize::Zeroize;
use crate::Error;

/// The largest accepted key, in bytes.
pub const MAX_KEY_SIZE: usize = 256;

/// ARC4 keystream generator (`wc_Arc4SetKey`, `wc_Arc4Process`).
///
/// # Example
///
/// ```
/// use wolf_core::arc4::Arc4;
///
/// let mut out = [0u8; 9];
/// Arc4::new(b"Key").unwrap().process(b"Plaintext", &mut out).unwrap();
/// assert_eq!(out, [0xbb, 0xf3, 0x16, 0xe8, 0xd9, 0x40, 0xaf, 0x0a, 0xd3]);
/// ```
pub struct Arc4 {
    s: [u8; 256],
    i: u8,
    j: u8
}

opaque_dbg! { Arc4 }

impl Arc4 {
    /// Key a new instance.
    ///
    /// # Errors
    ///
    /// [`Error::KeySize`] if `key` is empty or longer than [`MAX_KEY_SIZE`].
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let mut this = Self { s: [0; 256], i: 0, j: 0 };
        this.set_key(key)?;
        Ok(this)
    }

    /// Re-key, discarding the current keystream position.
    ///
    /// # Errors
    ///
    /// [`Error::KeySize`] if `key` is empty or longer than [`MAX_KEY_SIZE`]. The instance is left
    /// untouched in this case.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), Error> {
        if key.is_empty() || key.len() > MAX_KEY_SIZE {
            return Err(Error::KeySize);
        }

        for (i, s) in self.s.iter_mut().enumerate() {
            *s = i as u8;
        }

        let mut j = 0u8;
        for (i, k) in (0..256).zip(key.iter().cycle()) {
            j = j.wrapping_add(self.s[i]).wrapping_add(*k);
            self.s.swap(i, j as usize);
        }

        self.i = 0;
        self.j = 0;
        Ok(())
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        self.s[self.s[self.i as usize].wrapping_add(self.s[self.j as usize]) as usize]
    }

    /// XOR the keystream into `buf`. Encryption and decryption are the same operation.
    pub fn process_in_place(&mut self, buf: &mut [u8]) {
        for b in buf {
            *b ^= self.next_byte();
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

        for (o, i) in output.iter_mut().zip(input) {
            *o = *i ^ self.next_byte();
        }
        Ok(())
    }
}

impl Drop for Arc4 {
    fn drop(&mut self) {
        self.s.zeroize();
        self.i.zeroize();
        self.j.zeroize();
    }
}
