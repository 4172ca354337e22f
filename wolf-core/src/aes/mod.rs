//! Advanced Encryption Standard (AES)
//!
//! [`Aes`] is the block function, the modes build on it:
//!
//! | Mode | Type |
//! |------|------|
//! | ECB (single blocks) | [`ecb::AesEcb`] |
//! | CBC | [`cbc::AesCbc`] |
//! | CBC with ciphertext stealing (CS3) | [`cts::AesCts`] |
//! | CTR | [`ctr::AesCtr`] |
//! | XTS | [`xts::AesXts`], [`xts::XtsStream`] |
//! | Key Wrap (RFC 3394) | [`keywrap`] |
//!
//! GCM, CCM, EAX and SIV are exposed through [`aead`](crate::aead), GMAC and CMAC through
//! [`mac`](crate::mac).
mod block;

pub mod ecb;
pub mod cbc;
pub mod cts;
pub mod ctr;
pub mod xts;
pub mod keywrap;
pub(crate) mod gcm;
pub(crate) mod ccm;
pub(crate) mod cmac;

#[cfg(test)]
pub mod test_utils;

pub use block::{Aes, BLOCK_SIZE};

use zeroize::Zeroize;
use crate::Error;

/// An AES key, the variant selects the number of rounds.
#[cfg_attr(test, derive(Debug, Clone, PartialEq))]
pub enum Key {
    Aes256([u8; 32]),
    Aes192([u8; 24]),
    Aes128([u8; 16])
}

impl Key {
    #[inline]
    pub const fn capacity(&self) -> usize {
        match self {
            Self::Aes256(_) => 32,
            Self::Aes192(_) => 24,
            Self::Aes128(_) => 16
        }
    }

    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        match self {
            Self::Aes256(buf) => buf.as_slice(),
            Self::Aes192(buf) => buf.as_slice(),
            Self::Aes128(buf) => buf.as_slice()
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::Aes256(buf) => buf.as_mut_slice(),
            Self::Aes192(buf) => buf.as_mut_slice(),
            Self::Aes128(buf) => buf.as_mut_slice()
        }
    }

    #[inline]
    pub fn zero(&mut self) {
        self.as_mut_slice().zeroize();
    }
}

impl Zeroize for Key {
    #[inline]
    fn zeroize(&mut self) {
        self.zero();
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.zero();
    }
}

impl From<[u8; 32]> for Key {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self::Aes256(value)
    }
}

impl From<[u8; 24]> for Key {
    #[inline]
    fn from(value: [u8; 24]) -> Self {
        Self::Aes192(value)
    }
}

impl From<[u8; 16]> for Key {
    #[inline]
    fn from(value: [u8; 16]) -> Self {
        Self::Aes128(value)
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = Error;

    /// # Errors
    ///
    /// [`Error::KeySize`] unless the slice is 16, 24 or 32 bytes.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if let Ok(k) = <[u8; 16]>::try_from(value) {
            Ok(Self::Aes128(k))
        } else if let Ok(k) = <[u8; 24]>::try_from(value) {
            Ok(Self::Aes192(k))
        } else if let Ok(k) = <[u8; 32]>::try_from(value) {
            Ok(Self::Aes256(k))
        } else {
            Err(Error::KeySize)
        }
    }
}

/// A double length key for XTS, the first half keys the data cipher and the second half the
/// tweak cipher.
#[cfg_attr(test, derive(Debug, Clone, PartialEq))]
pub enum XtsKey {
    Aes128([u8; 32]),
    Aes256([u8; 64])
}

impl XtsKey {
    #[inline]
    pub const fn capacity(&self) -> usize {
        match self {
            Self::Aes128(_) => 32,
            Self::Aes256(_) => 64
        }
    }

    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        match self {
            Self::Aes128(buf) => buf.as_slice(),
            Self::Aes256(buf) => buf.as_slice()
        }
    }

    /// Split into the data key and the tweak key.
    pub(crate) fn halves(&self) -> (&[u8], &[u8]) {
        let s = self.as_slice();
        s.split_at(s.len() / 2)
    }

    #[inline]
    pub fn zero(&mut self) {
        match self {
            Self::Aes128(buf) => buf.zeroize(),
            Self::Aes256(buf) => buf.zeroize()
        }
    }
}

impl Drop for XtsKey {
    fn drop(&mut self) {
        self.zero();
    }
}

impl From<[u8; 32]> for XtsKey {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self::Aes128(value)
    }
}

impl From<[u8; 64]> for XtsKey {
    #[inline]
    fn from(value: [u8; 64]) -> Self {
        Self::Aes256(value)
    }
}

/// The direction a mode with a fixed direction (CBC, ECB) was keyed for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt
}
