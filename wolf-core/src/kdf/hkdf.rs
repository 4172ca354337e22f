//! The `HMAC` Key Derivation Function (`HKDF`).
//!
//! This module provides an implementation of HKDF as specified in [`RFC 5869`][1]. `HKDF` is a key
//! derivation function based on HMAC, designed to derive one or more secret keys from a master
//! secret key.
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc5869
use zeroize::Zeroize;

use crate::aead::Aad as Additional;
use crate::{can_cast_u32, Error};
use crate::hash::MAX_DIGEST_SIZE;
use crate::kdf::{Salt, salt::Empty};
use crate::mac::hmac::Hmac;
use crate::mac::hmac::algo::Hash;

/// The most output a single `HKDF-Expand` may produce, in blocks of the digest size.
pub const MAX_BLOCKS: usize = 255;

/// `HKDF-Extract`, writing the pseudorandom key into `prk` (`wc_HKDF_Extract`).
///
/// An empty `salt` is replaced by a string of zeros the length of the digest.
///
/// # Errors
///
/// - [`Error::Buffer`] if `prk` is shorter than the digest of `H`.
/// - [`Error::BadFuncArg`] if `salt` or `ikm` is longer than [`u32::MAX`].
///
/// # Returns
///
/// The number of bytes written to `prk`.
pub fn hkdf_extract<H: Hash>(
    salt: impl Salt<Empty>,
    ikm: &[u8],
    prk: &mut [u8]
) -> Result<usize, Error> {
    let salt = salt.as_bytes();
    if prk.len() < H::DIGEST_SIZE {
        return Err(Error::buffer(H::DIGEST_SIZE, prk.len()));
    }

    let zeros = [0u8; MAX_DIGEST_SIZE];
    let key = if salt.is_empty() { &zeros[..H::DIGEST_SIZE] } else { salt };

    let mut hmac = Hmac::new(H::TYPE, key)?;
    hmac.update(ikm)?;
    hmac.finalize_into(prk)
}

/// `HKDF-Expand`, filling `output` from the pseudorandom key `prk` (`wc_HKDF_Expand`).
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `output` is longer than [`MAX_BLOCKS`] digests, or `info` is
///   longer than [`u32::MAX`].
/// - Any error from keying [`Hmac`] with `prk`.
pub fn hkdf_expand<H: Hash>(
    prk: &[u8],
    info: impl Additional,
    output: &mut [u8]
) -> Result<(), Error> {
    let ds = H::DIGEST_SIZE;
    let info = info.as_bytes();

    if output.len() > MAX_BLOCKS * ds || !can_cast_u32(info.len()) {
        log_debug!(out_len = output.len(), "hkdf output too long");
        return Err(Error::BadFuncArg);
    }

    let mut hmac = Hmac::new(H::TYPE, prk)?;
    let mut t = [0u8; MAX_DIGEST_SIZE];
    let mut prev = 0usize;

    for (chunk, counter) in output.chunks_mut(ds).zip(1u8..=255) {
        hmac.update(&t[..prev])?
            .update(info)?
            .update(&[counter])?;
        hmac.finalize_into(&mut t[..ds])?;
        chunk.copy_from_slice(&t[..chunk.len()]);
        prev = ds;
    }

    t.zeroize();
    Ok(())
}

/// Performs HKDF and writes the result into the provided output buffer (`wc_HKDF`).
///
/// # Arguments
///
/// * `key` - The input keying material.
/// * `salt` - The salt value (a non-secret random value).
/// * `additional` - Additional input (optional context and application specific information).
/// * `output` - The buffer to write the derived key material into.
///
/// # Errors
///
/// See [`hkdf_extract`] and [`hkdf_expand`].
///
/// # Examples
///
/// ```
/// use wolf_core::kdf::{hkdf_into, Sha256};
///
/// let key = [42u8; 32];
/// let salt = b"salt";
/// let info = b"context information";
/// let mut output = [0u8; 64];
///
/// hkdf_into::<Sha256>(&key, salt, info, &mut output).unwrap();
/// ```
pub fn hkdf_into<H: Hash>(
    key: &[u8],
    salt: impl Salt<Empty>,
    additional: impl Additional,
    output: &mut [u8]
) -> Result<(), Error> {
    let mut prk = [0u8; MAX_DIGEST_SIZE];
    let res = hkdf_extract::<H>(salt, key, &mut prk)
        .and_then(|len| hkdf_expand::<H>(&prk[..len], additional, output));
    prk.zeroize();
    res
}

/// Performs `HKDF` and returns the result as a fixed-size array.
///
/// # Errors
///
/// See [`hkdf_into`].
///
/// # Examples
///
/// ```
/// use wolf_core::kdf::{hkdf, Sha256};
///
/// let derived_key = hkdf::<Sha256, 32>(&[42u8; 32], b"salt", b"context information").unwrap();
/// assert_eq!(derived_key.len(), 32);
/// ```
pub fn hkdf<H: Hash, const KL: usize>(
    key: &[u8],
    salt: impl Salt<Empty>,
    additional: impl Additional
) -> Result<[u8; KL], Error> {
    let mut out = [0u8; KL];
    hkdf_into::<H>(key, salt, additional, out.as_mut_slice())?;
    Ok(out)
}
