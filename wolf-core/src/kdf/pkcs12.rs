//! The PKCS #12 password based key derivation function ([`RFC 7292, Appendix B`][1]).
//!
//! This is a legacy construction kept for reading and writing PKCS #12 files. New designs
//! should use [`pbkdf2`](super::pbkdf2) or [`scrypt`](super::scrypt).
//!
//! The password is expected in the encoding the caller's format mandates. For PKCS #12 files
//! that is a big endian BMPString including the two byte terminator.
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc7292#appendix-B
use zeroize::Zeroize;

use crate::Error;
use crate::hash::{MAX_BLOCK_SIZE, MAX_DIGEST_SIZE};
use crate::kdf::Iters;
use crate::mac::hmac::algo::Hash;

/// The longest `password` or `salt` accepted by [`pkcs12_pbkdf`].
pub const MAX_INPUT_LEN: usize = 256;

const MAX_I_LEN: usize = 2 * (MAX_INPUT_LEN + MAX_BLOCK_SIZE);

/// What the derived bytes will be used for; the diversifier `ID` of the construction.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Purpose {
    /// Key material for encryption or decryption.
    Key = 1,
    /// An initialization vector.
    Iv = 2,
    /// A key for MAC generation.
    Mac = 3
}

/// Fill `dst` with repetitions of `src`, `dst` being a whole number of blocks.
#[inline]
fn repeat_into(src: &[u8], dst: &mut [u8]) {
    for (d, s) in dst.iter_mut().zip(src.iter().cycle()) {
        *d = *s;
    }
}

/// `I_j = (I_j + B + 1) mod 2^(8v)` for one big endian block.
#[inline]
fn add_one_plus(block: &mut [u8], b: &[u8]) {
    let mut carry = 1u16;
    for (x, y) in block.iter_mut().zip(b).rev() {
        let sum = u16::from(*x) + u16::from(*y) + carry;
        *x = sum as u8;
        carry = sum >> 8;
    }
}

/// Derive `out.len()` bytes for `purpose` (`wc_PKCS12_PBKDF_ex`).
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `password` or `salt` is longer than [`MAX_INPUT_LEN`].
/// - [`Error::BadFuncArg`] if `iters` is greater than [`i32::MAX`].
///
/// # Example
///
/// ```
/// use wolf_core::kdf::{pkcs12_pbkdf, pkcs12::Purpose, Iters, Sha256};
///
/// // "pass" as a terminated BMPString
/// let password = [0, b'p', 0, b'a', 0, b's', 0, b's', 0, 0];
/// let mut key = [0u8; 32];
///
/// pkcs12_pbkdf::<Sha256>(
///     &password, &[7u8; 8], Iters::new(2048).unwrap(), Purpose::Key, &mut key
/// ).unwrap();
/// ```
pub fn pkcs12_pbkdf<H: Hash>(
    password: &[u8],
    salt: &[u8],
    iters: Iters,
    purpose: Purpose,
    out: &mut [u8]
) -> Result<(), Error> {
    if password.len() > MAX_INPUT_LEN || salt.len() > MAX_INPUT_LEN || !iters.is_valid_size() {
        log_debug!(pass_len = password.len(), salt_len = salt.len(), "bad pkcs12 arguments");
        return Err(Error::BadFuncArg);
    }

    let (u, v) = (H::DIGEST_SIZE, H::BLOCK_SIZE);
    let s_len = salt.len().div_ceil(v) * v;
    let p_len = password.len().div_ceil(v) * v;

    let mut d = [purpose as u8; MAX_BLOCK_SIZE];
    let mut i_buf = [0u8; MAX_I_LEN];
    let i_all = &mut i_buf[..s_len + p_len];
    repeat_into(salt, &mut i_all[..s_len]);
    repeat_into(password, &mut i_all[s_len..]);

    let mut hash = crate::hash::Hash::new(H::TYPE)?;
    let mut a = [0u8; MAX_DIGEST_SIZE];
    let mut b = [0u8; MAX_BLOCK_SIZE];

    let mut chunks = out.chunks_mut(u).peekable();
    while let Some(chunk) = chunks.next() {
        hash.ingest(&d[..v]);
        hash.ingest(i_all);
        hash.emit(&mut a[..u]);
        for _ in 1..iters.get() {
            hash.ingest(&a[..u]);
            hash.emit(&mut a[..u]);
        }
        chunk.copy_from_slice(&a[..chunk.len()]);

        if chunks.peek().is_some() {
            repeat_into(&a[..u], &mut b[..v]);
            for block in i_all.chunks_exact_mut(v) {
                add_one_plus(block, &b[..v]);
            }
        }
    }

    d.zeroize();
    i_buf.zeroize();
    a.zeroize();
    b.zeroize();
    Ok(())
}
