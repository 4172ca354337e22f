//! AES in CBC mode.
//!
//! The instance is keyed for one [`Direction`]. The chaining value is carried between calls, so
//! a long message may be processed in any number of block aligned pieces.
use zeroize::Zeroize;
use crate::aes::{Aes, Direction, Key, BLOCK_SIZE};
use crate::buf::Iv;
use crate::Error;

/// AES-CBC (`wc_AesSetKey` + `wc_AesCbcEncrypt` / `wc_AesCbcDecrypt`).
///
/// # Example
///
/// ```
/// use wolf_core::aes::{Key, Direction, cbc::AesCbc};
/// use wolf_core::buf::Iv;
///
/// let key = Key::Aes128(*b"0123456789abcdef");
/// let iv = Iv::new(*b"1234567890abcdef");
///
/// let mut enc = AesCbc::new(&key, &iv, Direction::Encrypt);
/// let mut cipher = [0u8; 16];
/// enc.encrypt(b"now is the time ", &mut cipher).unwrap();
///
/// let mut dec = AesCbc::new(&key, &iv, Direction::Decrypt);
/// let mut plain = [0u8; 16];
/// dec.decrypt(&cipher, &mut plain).unwrap();
/// assert_eq!(&plain, b"now is the time ");
/// ```
pub struct AesCbc {
    aes: Aes,
    reg: [u8; BLOCK_SIZE],
    dir: Direction
}

opaque_dbg! { AesCbc }

impl AesCbc {
    /// Key a new instance for `dir`.
    pub fn new(key: &Key, iv: &Iv, dir: Direction) -> Self {
        let mut reg = [0u8; BLOCK_SIZE];
        reg.copy_from_slice(iv.slice());
        Self { aes: Aes::new(key), reg, dir }
    }

    /// Replace the key, IV and direction.
    pub fn set_key(&mut self, key: &Key, iv: &Iv, dir: Direction) {
        *self = Self::new(key, iv, dir);
    }

    /// Replace the chaining value, keeping the key.
    pub fn set_iv(&mut self, iv: &Iv) {
        self.reg.copy_from_slice(iv.slice());
    }

    /// The direction this instance was keyed for.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.dir
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

    fn encrypt_blocks(&mut self, buf: &mut [u8]) {
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            for (r, b) in self.reg.iter_mut().zip(block.iter()) {
                *r ^= *b;
            }
            self.aes.encrypt_block(&mut self.reg);
            block.copy_from_slice(&self.reg);
        }
    }

    fn decrypt_blocks(&mut self, buf: &mut [u8]) {
        let mut next = [0u8; BLOCK_SIZE];
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            next.copy_from_slice(block);
            self.aes.decrypt_slice(block);
            for (b, r) in block.iter_mut().zip(self.reg.iter()) {
                *b ^= *r;
            }
            self.reg = next;
        }
        next.zeroize();
    }

    /// Encrypt `input` into `output`, which must be at least as long.
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
        self.encrypt_blocks(out);
        Ok(())
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt), minus the buffer check.
    pub fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.check(Direction::Encrypt, buf.len(), buf.len())?;
        self.encrypt_blocks(buf);
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
        self.decrypt_blocks(out);
        Ok(())
    }

    /// Decrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt), minus the buffer check.
    pub fn decrypt_in_place(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.check(Direction::Decrypt, buf.len(), buf.len())?;
        self.decrypt_blocks(buf);
        Ok(())
    }
}

impl Drop for AesCbc {
    fn drop(&mut self) {
        self.reg.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const KEY: [u8; 16] = *b"0123456789abcdef";
    const IV: [u8; 16] = *b"1234567890abcdef";

    #[test]
    fn now_is_the_time() {
        let mut msg = [0u8; 32];
        msg[..24].copy_from_slice(b"now is the time for all ");

        let mut cbc = AesCbc::new(&Key::Aes128(KEY), &Iv::new(IV), Direction::Encrypt);
        let mut cipher = [0u8; 32];
        cbc.encrypt(&msg, &mut cipher).unwrap();

        assert_eq!(
            cipher,
            hex!("959492575f4281532ccc9d4677a233cb deef07e553f7884c3c2b9edafab6b599")
        );

        let mut dec = AesCbc::new(&Key::Aes128(KEY), &Iv::new(IV), Direction::Decrypt);
        dec.decrypt_in_place(&mut cipher).unwrap();
        assert_eq!(cipher, msg);
    }

    #[test]
    fn chaining_carries_across_calls() {
        let key = Key::Aes256([4u8; 32]);
        let iv = Iv::new([8u8; 16]);
        let msg = [0x5au8; 64];

        let mut whole = [0u8; 64];
        AesCbc::new(&key, &iv, Direction::Encrypt).encrypt(&msg, &mut whole).unwrap();

        let mut split = msg;
        let mut cbc = AesCbc::new(&key, &iv, Direction::Encrypt);
        let (a, b) = split.split_at_mut(16);
        cbc.encrypt_in_place(a).unwrap();
        cbc.encrypt_in_place(b).unwrap();

        assert_eq!(whole, split);
    }

    #[test]
    fn argument_errors() {
        let mut cbc = AesCbc::new(&Key::Aes128(KEY), &Iv::new(IV), Direction::Encrypt);
        let mut out = [0u8; 32];

        assert_eq!(cbc.encrypt(&[0u8; 15], &mut out), Err(Error::BadFuncArg));
        assert_eq!(cbc.encrypt(&[0u8; 32], &mut out[..16]), Err(Error::buffer(32, 16)));
        assert_eq!(cbc.decrypt(&[0u8; 16], &mut out), Err(Error::BadState));

        cbc.set_key(&Key::Aes128(KEY), &Iv::new(IV), Direction::Decrypt);
        assert_eq!(cbc.direction(), Direction::Decrypt);
        assert!(cbc.decrypt(&[0u8; 16], &mut out).is_ok());
    }

    #[test]
    fn set_iv_restarts_chain() {
        let key = Key::Aes128(KEY);
        let iv = Iv::new(IV);
        let mut cbc = AesCbc::new(&key, &iv, Direction::Encrypt);

        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        cbc.encrypt(&[1u8; 16], &mut a).unwrap();
        cbc.set_iv(&iv);
        cbc.encrypt(&[1u8; 16], &mut b).unwrap();
        assert_eq!(a, b);
    }
}
