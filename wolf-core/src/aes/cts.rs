//! AES-CBC with ciphertext stealing, the CS3 variant (RFC 3962, NIST SP 800-38A addendum).
//!
//! The output is exactly as long as the input, which must hold at least one block. The last two
//! ciphertext blocks are always swapped, so a block aligned message differs from plain CBC in
//! its final 32 bytes. A single block is plain CBC.
use zeroize::Zeroize;
use crate::aes::{Aes, Key, BLOCK_SIZE};
use crate::buf::Iv;
use crate::Error;

#[inline]
fn xor_block(block: &mut [u8], other: &[u8]) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= *o;
    }
}

#[inline]
const fn check(in_len: usize, out_len: usize) -> Result<(), Error> {
    if in_len < BLOCK_SIZE || in_len > (u32::MAX as usize) {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

/// Offset of the second to last block and the length of the final, possibly partial, block.
#[inline]
const fn split_point(len: usize) -> (usize, usize) {
    let tail = match len % BLOCK_SIZE {
        0 => BLOCK_SIZE,
        r => r
    };
    (len - tail - BLOCK_SIZE, tail)
}

fn encrypt_cs3(aes: &Aes, iv: &[u8; BLOCK_SIZE], buf: &mut [u8]) {
    let mut chain = *iv;
    if buf.len() == BLOCK_SIZE {
        xor_block(buf, &chain);
        aes.encrypt_slice(buf);
        chain.zeroize();
        return;
    }

    let (head, d) = split_point(buf.len());
    let (init, rest) = buf.split_at_mut(head);
    for block in init.chunks_exact_mut(BLOCK_SIZE) {
        xor_block(block, &chain);
        aes.encrypt_slice(block);
        chain.copy_from_slice(block);
    }

    let (full, tail) = rest.split_at_mut(BLOCK_SIZE);
    let mut x = chain;
    xor_block(&mut x, full);
    aes.encrypt_block(&mut x);

    let mut y = x;
    xor_block(&mut y, tail);
    aes.encrypt_block(&mut y);

    full.copy_from_slice(&y);
    tail.copy_from_slice(&x[..d]);
    x.zeroize();
    chain.zeroize();
}

fn decrypt_cs3(aes: &Aes, iv: &[u8; BLOCK_SIZE], buf: &mut [u8]) {
    let mut chain = *iv;
    if buf.len() == BLOCK_SIZE {
        aes.decrypt_slice(buf);
        xor_block(buf, &chain);
        chain.zeroize();
        return;
    }

    let (head, d) = split_point(buf.len());
    let (init, rest) = buf.split_at_mut(head);
    let mut next = [0u8; BLOCK_SIZE];
    for block in init.chunks_exact_mut(BLOCK_SIZE) {
        next.copy_from_slice(block);
        aes.decrypt_slice(block);
        xor_block(block, &chain);
        chain = next;
    }

    let (full, tail) = rest.split_at_mut(BLOCK_SIZE);
    // full holds E(pad(P_n) ^ X), tail the first d bytes of X
    let mut z = [0u8; BLOCK_SIZE];
    z.copy_from_slice(full);
    aes.decrypt_block(&mut z);

    let mut x = z;
    x[..d].copy_from_slice(tail);
    for (t, (z, x)) in tail.iter_mut().zip(z.iter().zip(x.iter())) {
        *t = z ^ x;
    }

    aes.decrypt_block(&mut x);
    xor_block(&mut x, &chain);
    full.copy_from_slice(&x);

    x.zeroize();
    z.zeroize();
    next.zeroize();
    chain.zeroize();
}

/// AES-CTS, keyed once and usable in both directions.
///
/// # Example
///
/// ```
/// use wolf_core::aes::{Key, cts::AesCts};
/// use wolf_core::buf::Iv;
///
/// let cts = AesCts::new(&Key::Aes128(*b"0123456789abcdef"));
/// let iv = Iv::new([7u8; 16]);
///
/// let mut cipher = [0u8; 21];
/// cts.encrypt(&iv, b"no padding is needed!", &mut cipher).unwrap();
///
/// let mut plain = [0u8; 21];
/// cts.decrypt(&iv, &cipher, &mut plain).unwrap();
/// assert_eq!(&plain, b"no padding is needed!");
/// ```
pub struct AesCts {
    aes: Aes
}

opaque_dbg! { AesCts }

impl AesCts {
    pub fn new(key: &Key) -> Self {
        Self { aes: Aes::new(key) }
    }

    fn iv_block(iv: &Iv) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(iv.slice());
        block
    }

    /// Encrypt `input` into `output`.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `input` is shorter than one block or longer than
    ///   [`u32::MAX`] bytes.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt(&self, iv: &Iv, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        check(input.len(), output.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        encrypt_cs3(&self.aes, &Self::iv_block(iv), out);
        Ok(())
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] under the length rules of [`encrypt`](Self::encrypt).
    pub fn encrypt_in_place(&self, iv: &Iv, buf: &mut [u8]) -> Result<(), Error> {
        check(buf.len(), buf.len())?;
        encrypt_cs3(&self.aes, &Self::iv_block(iv), buf);
        Ok(())
    }

    /// Decrypt `input` into `output`.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, iv: &Iv, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        check(input.len(), output.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        decrypt_cs3(&self.aes, &Self::iv_block(iv), out);
        Ok(())
    }

    /// Decrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`encrypt_in_place`](Self::encrypt_in_place).
    pub fn decrypt_in_place(&self, iv: &Iv, buf: &mut [u8]) -> Result<(), Error> {
        check(buf.len(), buf.len())?;
        decrypt_cs3(&self.aes, &Self::iv_block(iv), buf);
        Ok(())
    }
}
