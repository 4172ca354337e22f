//! Hashed-Based Message Authentication Codes `HMAC` (RFC 2104).
//!
//! [`Hmac`] is keyed with a runtime [`HashType`] and built on the [`Hash`] dispatcher. The
//! [`algo`] markers name the same hash functions at compile time for the KDF APIs.

pub mod algo;
mod digest;

pub use digest::Digest;

#[doc(inline)]
pub use algo::{
    Sha224, Sha256, Sha384, Sha512,
    Sha3_224, Sha3_256, Sha3_384, Sha3_512,
    Sha
};

#[cfg(feature = "allow-non-fips")]
#[doc(inline)]
pub use algo::Md5;

use core::fmt;
use zeroize::Zeroize;

use crate::can_cast_u32;
use crate::error::Error;
use crate::hash::{Hash, HashType, MAX_BLOCK_SIZE, MAX_DIGEST_SIZE};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// The minimum key length accepted outside of `allow-non-fips` builds.
pub const FIPS_MIN_KEY: usize = 14;

/// Hashed-Based Message Authentication Codes `HMAC`.
///
/// Finalizing resets the instance to the keyed initial state, so the same key may be used for
/// the next message immediately.
///
/// # Example
///
/// ```
/// use wolf_core::mac::hmac::Hmac;
/// use wolf_core::hash::HashType;
///
/// # fn main() -> Result<(), wolf_core::Error> {
/// let mut hmac = Hmac::new(HashType::Sha256, &[42u8; 32])?;
///
/// hmac.update(b"hello world, ")?;
/// hmac.update(b"beautiful weather.")?;
///
/// let parts = hmac.finalize();
///
/// hmac.update(b"hello world, beautiful weather.")?;
///
/// let all = hmac.finalize();
///
/// assert_eq!(parts, all);
/// assert_eq!(all.len(), 32);
/// # Ok(()) }
/// ```
pub struct Hmac {
    hash: Hash,
    ipad: [u8; MAX_BLOCK_SIZE],
    opad: [u8; MAX_BLOCK_SIZE]
}

impl fmt::Debug for Hmac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hmac<{}> {{ ... }}", self.hash.hash_type())
    }
}

#[inline]
const fn supported(ty: HashType) -> bool {
    match ty {
        HashType::Md5 | HashType::Blake2b => cfg!(feature = "allow-non-fips"),
        HashType::Sha | HashType::Sha224 | HashType::Sha256 | HashType::Sha384
            | HashType::Sha512 | HashType::Sha3_224 | HashType::Sha3_256 | HashType::Sha3_384
            | HashType::Sha3_512 => true,
        _ => false
    }
}

impl Hmac {
    /// Digest length of HMAC over `ty`.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if `ty` is not usable with HMAC in this build.
    pub const fn size_by_type(ty: HashType) -> Result<usize, Error> {
        if !supported(ty) {
            return Err(Error::BadFuncArg);
        }
        match ty.digest_size() {
            Ok(size) => Ok(size),
            Err(_) => Err(Error::BadFuncArg)
        }
    }

    /// Create a new `Hmac` keyed with `key` over the hash function `ty`.
    ///
    /// Keys longer than the block size of `ty` are hashed first.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `ty` is not usable with HMAC in this build, or the key length
    ///   does not fit in a `u32`.
    /// - [`Error::HmacMinKeylen`] if the key is shorter than [`FIPS_MIN_KEY`] and the
    ///   `allow-non-fips` feature is disabled.
    pub fn new(ty: HashType, key: &[u8]) -> Result<Self, Error> {
        Self::size_by_type(ty)?;

        let mut this = Self {
            hash: Hash::new(ty)?,
            ipad: [0u8; MAX_BLOCK_SIZE],
            opad: [0u8; MAX_BLOCK_SIZE]
        };

        this.load_key(key)?;
        Ok(this)
    }

    /// Replace both the key and the hash function.
    ///
    /// # Errors
    ///
    /// See [`Hmac::new`]. On error the instance is left keyed as before.
    pub fn set_key(&mut self, ty: HashType, key: &[u8]) -> Result<(), Error> {
        let next = Self::new(ty, key)?;
        *self = next;
        Ok(())
    }

    fn load_key(&mut self, key: &[u8]) -> Result<(), Error> {
        if !can_cast_u32(key.len()) {
            return Err(Error::BadFuncArg);
        }
        if !cfg!(feature = "allow-non-fips") && key.len() < FIPS_MIN_KEY {
            log_warn!(key_len = key.len(), "hmac key shorter than the FIPS minimum");
            return Err(Error::HmacMinKeylen);
        }

        let bs = self.hash.block_size();
        let ds = self.hash.digest_size();

        self.ipad.zeroize();

        if key.len() > bs {
            self.hash.ingest(key);
            self.hash.emit(&mut self.ipad[..ds]);
        } else {
            self.ipad[..key.len()].copy_from_slice(key);
        }

        self.opad[..bs].copy_from_slice(&self.ipad[..bs]);

        for (i, o) in self.ipad[..bs].iter_mut().zip(self.opad[..bs].iter_mut()) {
            *i ^= IPAD;
            *o ^= OPAD;
        }

        self.hash.ingest(&self.ipad[..bs]);
        Ok(())
    }

    /// The hash function this instance is keyed with.
    #[inline]
    pub fn hash_type(&self) -> HashType {
        self.hash.hash_type()
    }

    /// Length of the MAC this instance produces.
    #[inline]
    pub fn digest_size(&self) -> usize {
        self.hash.digest_size()
    }

    /// Updates the message to authenticate.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if the length of `data` is greater than [`u32::MAX`].
    pub fn update(&mut self, data: &[u8]) -> Result<&mut Self, Error> {
        if !can_cast_u32(data.len()) {
            return Err(Error::BadFuncArg);
        }
        self.hash.ingest(data);
        Ok(self)
    }

    /// Write the MAC into `output` and reset for the next message.
    ///
    /// # Errors
    ///
    /// [`Error::Buffer`] if `output` is shorter than [`digest_size`](Self::digest_size).
    pub fn finalize_into(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let ds = self.digest_size();
        if output.len() < ds {
            return Err(Error::buffer(ds, output.len()));
        }

        self.finalize_imp(output);
        Ok(ds)
    }

    /// `output` must hold at least `digest_size` bytes.
    fn finalize_imp(&mut self, output: &mut [u8]) {
        let bs = self.hash.block_size();
        let ds = self.hash.digest_size();
        let mut inner = [0u8; MAX_DIGEST_SIZE];

        self.hash.emit(&mut inner);
        self.hash.ingest(&self.opad[..bs]);
        self.hash.ingest(&inner[..ds]);
        self.hash.emit(output);

        self.hash.ingest(&self.ipad[..bs]);
        inner.zeroize();
    }

    /// Compute the MAC of the message and reset for the next message.
    pub fn finalize(&mut self) -> Digest {
        let mut out = [0u8; MAX_DIGEST_SIZE];
        self.finalize_imp(&mut out);
        Digest::new(out, self.digest_size())
    }

    /// Finalize and compare against `other` in constant-time.
    #[must_use]
    pub fn compare_digest(&mut self, other: &[u8]) -> bool {
        self.finalize().compare_digest(other)
    }
}

impl Drop for Hmac {
    #[inline]
    fn drop(&mut self) {
        self.ipad.zeroize();
        self.opad.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn unsupported_types() {
        for ty in [
            HashType::None, HashType::Md2, HashType::Md4, HashType::Md5Sha, HashType::Blake2s,
            HashType::Shake128, HashType::Shake256, HashType::Sha512_224, HashType::Ripemd160
        ] {
            assert_eq!(Hmac::size_by_type(ty), Err(Error::BadFuncArg));
            assert_eq!(Hmac::new(ty, &[0u8; 32]).unwrap_err(), Error::BadFuncArg);
        }
    }

    #[test]
    fn sizes() {
        assert_eq!(Hmac::size_by_type(HashType::Sha), Ok(20));
        assert_eq!(Hmac::size_by_type(HashType::Sha3_384), Ok(48));
        assert_eq!(Hmac::size_by_type(HashType::Sha512), Ok(64));
    }

    #[test]
    #[cfg(feature = "allow-non-fips")]
    fn rfc4231_case_2() {
        let mut hmac = Hmac::new(HashType::Sha256, b"Jefe").unwrap();
        hmac.update(b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hmac.finalize(),
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
    }

    #[test]
    #[cfg(not(feature = "allow-non-fips"))]
    fn short_key_rejected() {
        assert_eq!(Hmac::new(HashType::Sha256, b"Jefe").unwrap_err(), Error::HmacMinKeylen);
        assert!(Hmac::new(HashType::Sha256, &[0u8; FIPS_MIN_KEY]).is_ok());
    }

    #[test]
    fn rfc4231_long_key() {
        let key = [0xaau8; 131];
        let mut hmac = Hmac::new(HashType::Sha512, &key).unwrap();
        hmac.update(b"Test Using Larger Than Block-Size Key - Hash Key First").unwrap();
        assert_eq!(
            hmac.finalize(),
            hex!(
                "80b24263c7c1a3ebb71493c1dd7be8b49b46d1f41b4aeec1121b013783f8f352"
                "6b56d037e05f2598bd0fd2215d6a1e5295e64f73f63f0aec8b915a985d786598"
            )
        );
    }

    #[test]
    fn finalize_resets_to_keyed_state() {
        let mut hmac = Hmac::new(HashType::Sha384, &[7u8; 48]).unwrap();
        hmac.update(b"message").unwrap();
        let first = hmac.finalize();
        hmac.update(b"message").unwrap();
        assert!(hmac.compare_digest(first.as_slice()));
    }

    #[test]
    fn rekey_changes_hash() {
        let mut hmac = Hmac::new(HashType::Sha256, &[1u8; 32]).unwrap();
        hmac.set_key(HashType::Sha3_512, &[2u8; 64]).unwrap();
        assert_eq!(hmac.hash_type(), HashType::Sha3_512);
        assert_eq!(hmac.finalize().len(), 64);

        assert!(hmac.set_key(HashType::None, &[2u8; 64]).is_err());
        assert_eq!(hmac.hash_type(), HashType::Sha3_512);
    }

    #[test]
    fn short_output() {
        let mut hmac = Hmac::new(HashType::Sha256, &[1u8; 32]).unwrap();
        let mut out = [0u8; 31];
        assert_eq!(hmac.finalize_into(&mut out), Err(Error::Buffer { needed: 32, had: 31 }));
    }
}
