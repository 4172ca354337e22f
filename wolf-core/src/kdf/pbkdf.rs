//! The Password Based Key Derivation Functions 1 and 2 (RFC 8018).

use zeroize::Zeroize;

use crate::{can_cast_i32, const_can_cast_i32, Error};
use crate::hash::MAX_DIGEST_SIZE;
use crate::kdf::{Salt, Iters, PbkdfSalt};
use crate::mac::hmac::Hmac;
use crate::mac::hmac::algo::Hash;

/// The minimum output key length as stated in [SP 800-132, Section 5][1].
///
/// ```text
/// The kLen value shall be at least 112 bits in length.
/// ```
///
/// [1]: https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-132.pdf
pub const FIPS_MIN_KEY: usize = 14;

#[inline]
#[must_use]
const fn check_key_len(len: usize) -> bool {
    can_cast_i32(len) && (cfg!(feature = "allow-non-fips") || len >= FIPS_MIN_KEY)
}

#[inline]
#[must_use]
const fn const_check_key_len<const L: usize>() -> bool {
    const_can_cast_i32::<L>() && (cfg!(feature = "allow-non-fips") || L >= FIPS_MIN_KEY)
}

fn check_args(password: &[u8], salt: &[u8], iters: Iters, key_ok: bool) -> Result<(), Error> {
    if can_cast_i32(password.len()) && can_cast_i32(salt.len()) && iters.is_valid_size() && key_ok {
        Ok(())
    } else {
        log_debug!(
            password_len = password.len(),
            salt_len = salt.len(),
            iters = iters.get(),
            "rejected pbkdf arguments"
        );
        Err(Error::BadFuncArg)
    }
}

pub(super) fn pbkdf2_imp<H: Hash>(
    password: &[u8],
    salt: &[u8],
    iters: Iters,
    out: &mut [u8]
) -> Result<(), Error> {
    let ds = H::DIGEST_SIZE;
    let mut hmac = Hmac::new(H::TYPE, password)?;
    let mut u = [0u8; MAX_DIGEST_SIZE];
    let mut t = [0u8; MAX_DIGEST_SIZE];

    // output length is bounded by i32::MAX, so the block index fits a u32.
    for (chunk, block) in out.chunks_mut(ds).zip(1u32..) {
        hmac.update(salt)?.update(&block.to_be_bytes())?;
        hmac.finalize_into(&mut u[..ds])?;
        t[..ds].copy_from_slice(&u[..ds]);

        for _ in 1..iters.get() {
            hmac.update(&u[..ds])?;
            hmac.finalize_into(&mut u[..ds])?;
            for (acc, x) in t[..ds].iter_mut().zip(u[..ds].iter()) {
                *acc ^= *x;
            }
        }

        chunk.copy_from_slice(&t[..chunk.len()]);
    }

    u.zeroize();
    t.zeroize();
    Ok(())
}

/// Performs PBKDF2 and writes the result into the provided `out_key` buffer
/// (`wc_PBKDF2`).
///
/// # Arguments
///
/// * `password` - The password to use for the key derivation.
/// * `salt`     - The salt to use for key derivation.
/// * `iters`    - The number of times to process the hash.
/// * `out_key`  - The buffer to write the generated key into.
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if the length of the `password`, `salt` or `out_key`, or the number
///   of `iters`, was greater than [`i32::MAX`].
/// - [`Error::HmacMinKeylen`] if the `password` is shorter than the HMAC FIPS minimum and
///   `allow-non-fips` is disabled.
///
/// ## FIPS Errors
///
/// If the `allow-non-fips` feature flag is disabled this will return [`Error::BadFuncArg`] if the
/// `out_key` length is not at least [`FIPS_MIN_KEY`] (14 bytes).
///
/// # Example
///
/// ```
/// use wolf_core::kdf::{pbkdf2_into, Sha256, Iters};
///
/// let password = b"my secret password";
/// let salt = [42; 16];
/// let iters = Iters::new(1_000).unwrap();
/// let mut out_key = [0u8; 32];
///
/// pbkdf2_into::<Sha256>(password, salt, iters, out_key.as_mut_slice()).unwrap();
/// ```
pub fn pbkdf2_into<H: Hash>(
    password: &[u8],
    salt: impl Salt<PbkdfSalt>,
    iters: Iters,
    out_key: &mut [u8]
) -> Result<(), Error> {
    let salt = salt.as_bytes();
    check_args(password, salt, iters, check_key_len(out_key.len()))?;
    pbkdf2_imp::<H>(password, salt, iters, out_key)
}

/// Performs PBKDF2 and returns the result as a fixed-size array.
///
/// # Errors
///
/// See [`pbkdf2_into`], the `KL` generic takes the place of the output length.
///
/// # Example
///
/// ```
/// use wolf_core::kdf::{pbkdf2, Sha256, Iters};
///
/// let password = b"my secret password";
/// let salt = [42; 16];
/// let iters = Iters::new(1_000).unwrap();
///
/// let key = pbkdf2::<32, Sha256>(password, salt, iters).unwrap();
/// assert_eq!(key.len(), 32);
/// ```
pub fn pbkdf2<const KL: usize, H: Hash>(
    password: &[u8],
    salt: impl Salt<PbkdfSalt>,
    iters: Iters
) -> Result<[u8; KL], Error> {
    let salt = salt.as_bytes();
    check_args(password, salt, iters, const_check_key_len::<KL>())?;
    let mut out = [0u8; KL];
    pbkdf2_imp::<H>(password, salt, iters, out.as_mut_slice())?;
    Ok(out)
}

non_fips! {
    fn pbkdf1_imp<H: Hash>(
        password: &[u8],
        salt: &[u8],
        iters: Iters,
        out: &mut [u8]
    ) -> Result<(), Error> {
        let ds = H::DIGEST_SIZE;
        if out.len() > ds {
            return Err(Error::BadFuncArg);
        }

        let mut hash = crate::hash::Hash::new(H::TYPE)?;
        let mut t = [0u8; MAX_DIGEST_SIZE];

        hash.update(H::TYPE, password)?;
        hash.update(H::TYPE, salt)?;
        hash.finalize_into(H::TYPE, &mut t[..ds])?;

        for _ in 1..iters.get() {
            hash.update(H::TYPE, &t[..ds])?;
            hash.finalize_into(H::TYPE, &mut t[..ds])?;
        }

        out.copy_from_slice(&t[..out.len()]);
        t.zeroize();
        Ok(())
    }

    /// Performs PBKDF1 and writes the result into the provided `out_key` buffer
    /// (`wc_PBKDF1`).
    ///
    /// PBKDF1 cannot produce more than one digest of output, prefer [`pbkdf2_into`].
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if the length of the `password` or `salt`, or the number of
    ///   `iters`, was greater than [`i32::MAX`].
    /// - [`Error::BadFuncArg`] if `out_key` is longer than the digest of `H`.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::kdf::{pbkdf1_into, Sha256, Iters};
    ///
    /// let password = b"my secret password";
    /// let salt = [42; 16];
    /// let iters = Iters::new(1_000).unwrap();
    /// let mut out_key = [0u8; 32];
    ///
    /// pbkdf1_into::<Sha256>(password, salt, iters, out_key.as_mut_slice()).unwrap();
    /// ```
    pub fn pbkdf1_into<H: Hash>(
        password: &[u8],
        salt: impl Salt<PbkdfSalt>,
        iters: Iters,
        out_key: &mut [u8]
    ) -> Result<(), Error> {
        let salt = salt.as_bytes();
        check_args(password, salt, iters, check_key_len(out_key.len()))?;
        pbkdf1_imp::<H>(password, salt, iters, out_key)
    }

    /// Performs PBKDF1 and returns the result as a fixed-size array.
    ///
    /// # Errors
    ///
    /// See [`pbkdf1_into`], the `KL` generic takes the place of the output length.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::kdf::{pbkdf1, Sha256, Iters};
    ///
    /// let key = pbkdf1::<32, Sha256>(b"my secret password", [42; 16], Iters::new(10).unwrap())
    ///     .unwrap();
    /// assert_eq!(key.len(), 32);
    /// ```
    pub fn pbkdf1<const KL: usize, H: Hash>(
        password: &[u8],
        salt: impl Salt<PbkdfSalt>,
        iters: Iters
    ) -> Result<[u8; KL], Error> {
        let salt = salt.as_bytes();
        check_args(password, salt, iters, const_check_key_len::<KL>())?;
        let mut out = [0u8; KL];
        pbkdf1_imp::<H>(password, salt, iters, out.as_mut_slice())?;
        Ok(out)
    }
}
