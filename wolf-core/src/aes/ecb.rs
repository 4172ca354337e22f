//! AES in ECB mode, also serving as the direct single block interface.
//!
//! ECB leaks equality of plaintext blocks, it exists for interoperability and for building
//! other modes.
use crate::aes::{Aes, Key, BLOCK_SIZE};
use crate::Error;

/// AES-ECB over whole blocks.
pub struct AesEcb {
    aes: Aes
}

opaque_dbg! { AesEcb }

impl AesEcb {
    /// Key a new ECB instance, usable in both directions.
    pub fn new(key: &Key) -> Self {
        Self { aes: Aes::new(key) }
    }

    #[inline]
    fn check(input: &[u8], output: &[u8]) -> Result<(), Error> {
        if input.len() % BLOCK_SIZE != 0 {
            return Err(Error::BadFuncArg);
        }
        if output.len() < input.len() {
            return Err(Error::buffer(input.len(), output.len()));
        }
        Ok(())
    }

    /// Encrypt `input` into `output`.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `input` is not a multiple of the block size.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt(&self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        Self::check(input, output)?;
        for (i, o) in input.chunks_exact(BLOCK_SIZE).zip(output.chunks_exact_mut(BLOCK_SIZE)) {
            o.copy_from_slice(i);
            self.aes.encrypt_slice(o);
        }
        Ok(())
    }

    /// Decrypt `input` into `output`. See [`encrypt`](Self::encrypt) for errors.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        Self::check(input, output)?;
        for (i, o) in input.chunks_exact(BLOCK_SIZE).zip(output.chunks_exact_mut(BLOCK_SIZE)) {
            o.copy_from_slice(i);
            self.aes.decrypt_slice(o);
        }
        Ok(())
    }

    /// Encrypt a single block into `out` (`wc_AesEncryptDirect`).
    #[inline]
    pub fn encrypt_direct(&self, block: &[u8; BLOCK_SIZE], out: &mut [u8; BLOCK_SIZE]) {
        self.aes.encrypt_block_b2b(block, out);
    }

    /// Decrypt a single block into `out` (`wc_AesDecryptDirect`).
    #[inline]
    pub fn decrypt_direct(&self, block: &[u8; BLOCK_SIZE], out: &mut [u8; BLOCK_SIZE]) {
        self.aes.decrypt_block_b2b(block, out);
    }
}
