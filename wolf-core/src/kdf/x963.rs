//! The ANSI X9.63 key derivation function (`wc_X963_KDF`).
//!
//! Used by ECIES and other key agreement schemes to stretch a shared secret `Z`:
//!
//! ```text
//! K(i) = H(Z || counter_i || SharedInfo), counter_1 = 0x00000001 (big endian)
//! ```
use zeroize::Zeroize;

use crate::aead::Aad as SharedInfo;
use crate::Error;
use crate::hash::MAX_DIGEST_SIZE;
use crate::mac::hmac::algo::Hash;

/// Derive `out.len()` bytes from the shared `secret` and optional `shared_info`.
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `secret` is empty.
/// - [`Error::BadFuncArg`] if `out` would need more than [`u32::MAX`] digests.
///
/// # Example
///
/// ```
/// use wolf_core::kdf::{x963_kdf, Sha256};
///
/// let mut key = [0u8; 48];
/// x963_kdf::<Sha256>(b"shared secret z", b"ecies", &mut key).unwrap();
/// assert_ne!(key, [0u8; 48]);
/// ```
pub fn x963_kdf<H: Hash>(
    secret: &[u8],
    shared_info: impl SharedInfo,
    out: &mut [u8]
) -> Result<(), Error> {
    let ds = H::DIGEST_SIZE;
    if secret.is_empty() || (out.len() as u64) > (ds as u64) * u64::from(u32::MAX) {
        log_debug!(secret_len = secret.len(), out_len = out.len(), "bad x963 arguments");
        return Err(Error::BadFuncArg);
    }

    let info = shared_info.as_bytes();
    let mut hash = crate::hash::Hash::new(H::TYPE)?;
    let mut t = [0u8; MAX_DIGEST_SIZE];

    for (chunk, counter) in out.chunks_mut(ds).zip(1u32..) {
        hash.ingest(secret);
        hash.ingest(&counter.to_be_bytes());
        hash.ingest(info);
        hash.emit(&mut t[..ds]);
        chunk.copy_from_slice(&t[..chunk.len()]);
    }

    t.zeroize();
    Ok(())
}
