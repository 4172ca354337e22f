//! Key Derivation Functions
//!
//! | Function | Module | Built on |
//! |----------|--------|----------|
//! | `PBKDF2` (and `PBKDF1`) | [`pbkdf`] | [`Hmac`] / [`Hash`](crate::hash::Hash) |
//! | `HKDF` | [`hkdf`] | [`Hmac`] |
//! | `scrypt` | [`scrypt`] | `PBKDF2-HMAC-SHA256`, `Salsa20/8` |
//! | ANSI X9.63 | [`x963`] | [`Hash`](crate::hash::Hash) |
//! | PKCS #12 | [`pkcs12`] | [`Hash`](crate::hash::Hash) |
//!
//! The hash function is chosen at compile time with the [`algo`](crate::mac::hmac::algo)
//! markers re-exported here. All functions report failure through [`Error`](crate::Error).
//!
//! [`Hmac`]: crate::mac::hmac::Hmac

pub mod pbkdf;
pub mod hkdf;
pub mod x963;
pub mod pkcs12;

#[cfg(all(feature = "alloc", feature = "allow-non-fips"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "alloc", feature = "allow-non-fips"))))]
pub mod scrypt;

#[cfg(all(feature = "alloc", feature = "allow-non-fips"))]
pub use scrypt::{scrypt, scrypt_ex};

pub use pbkdf::{pbkdf2, pbkdf2_into};
pub use hkdf::{hkdf, hkdf_into};
pub use x963::x963_kdf;
pub use pkcs12::pkcs12_pbkdf;

non_fips! {
    pub use pbkdf::{pbkdf1, pbkdf1_into};
}

use crate::to_u32;
use crate::sealed::AadSealed as Sealed;
use core::num::NonZeroU32;
use core::marker::PhantomData;
use core::convert::Infallible;
use crate::buf::InvalidSize;
use crate::error::InvalidIters;

#[doc(inline)]
pub use crate::mac::hmac::algo::{
    Sha, Sha224, Sha256, Sha384, Sha512,
    Sha3_224, Sha3_256, Sha3_384, Sha3_512
};

non_fips! {
    #[doc(inline)]
    pub use crate::mac::hmac::algo::Md5;
}

/// A non-zero iteration count for PBKDF1, PBKDF2 and the PKCS #12 KDF.
///
/// wolfCrypt takes the count as an `int`, so counts above [`i32::MAX`] are refused by the
/// functions which consume it. Password hashing should use hundreds of thousands of iterations.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Iters { count: NonZeroU32 }

impl Iters {
    /// `None` for zero.
    pub const fn new(iters: u32) -> Option<Self> {
        match NonZeroU32::new(iters) {
            Some(count) => Some(Self { count }),
            None => None
        }
    }

    /// Whether the count fits a C `int`.
    pub const fn is_valid_size(&self) -> bool {
        self.get() <= i32::MAX as u32
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.count.get()
    }
}

impl From<NonZeroU32> for Iters {
    #[inline]
    fn from(value: NonZeroU32) -> Self {
        Self { count: value }
    }
}

impl TryFrom<u32> for Iters {
    type Error = InvalidIters;

    /// # Errors
    ///
    /// If the number of iterations was zero.
    #[inline]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidIters)
    }
}

impl TryFrom<usize> for Iters {
    type Error = InvalidIters;

    /// # Errors
    ///
    /// - If the number of iterations was zero.
    /// - If the number of iterations was greater than [`u32::MAX`].
    #[inline]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        to_u32(value).and_then(Self::new).ok_or(InvalidIters)
    }
}

pub mod salt {
    //! Salt requirement marker types.
    use super::{InvalidSize, Infallible};

    /// A lower bound on salt length.
    pub trait MinSize : super::Sealed {
        /// What [`SaltSlice::new`](super::SaltSlice::new) fails with under this bound.
        type CreateError;

        fn min_size() -> usize;
    }

    macro_rules! def_sz {
        ($(
            $(#[$meta:meta])*
            $name:ident => $sz:literal => $err:ident
        ),* $(,)?) => {
            $(
                $(#[$meta])*
                pub struct $name;

                impl super::Sealed for $name {}
                impl MinSize for $name {
                    type CreateError = $err;

                    #[inline]
                    fn min_size() -> usize {
                        $sz
                    }
                }
            )*
        };
    }

    def_sz! {
        /// Any salt, including none (HKDF, X9.63 shared info).
        Empty => 0 => Infallible,
        /// At least one byte.
        NonEmpty => 1 => InvalidSize,
        /// At least 16 bytes, the FIPS PBKDF minimum.
        Min16 => 16 => InvalidSize
    }
}

/// The salt constraint the PBKDF family enforces in this build.
///
/// With `allow-non-fips` a salt only needs to be non-empty, otherwise [NIST SP 800-132][1]
/// requires at least 128 bits.
///
/// [1]: https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-132.pdf
#[cfg(feature = "allow-non-fips")]
pub type PbkdfSalt = salt::NonEmpty;

/// The salt constraint the PBKDF family enforces in this build.
///
/// With `allow-non-fips` a salt only needs to be non-empty, otherwise [NIST SP 800-132][1]
/// requires at least 128 bits.
///
/// [1]: https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-132.pdf
#[cfg(not(feature = "allow-non-fips"))]
pub type PbkdfSalt = salt::Min16;

/// Represents a salt value used in key derivation functions (KDFs).
///
/// Salts may be optional, this depends on the `SZ` constraint. Fixed size arrays meet the
/// constraint at compile time, [`SaltSlice`] checks it at runtime.
pub trait Salt<SZ: salt::MinSize>: Sealed {
    #[doc(hidden)]
    #[must_use]
    fn as_bytes(&self) -> &[u8];
}

impl Salt<salt::Empty> for [u8] {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl<const C: usize> Salt<salt::Empty> for [u8; C] {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

macro_rules! impl_salt_for_sizes {
    ($constraint:ty => [$($sz:literal),*]) => {
        $(
            impl Salt<$constraint> for [u8; $sz] {
                #[inline]
                fn as_bytes(&self) -> &[u8] { self.as_slice() }
            }
        )*
    };
}

impl_salt_for_sizes! { salt::Min16 => [
    16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 48, 64
]}

impl_salt_for_sizes! { salt::NonEmpty => [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
    16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 48, 64
]}

impl Salt<salt::Empty> for () {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &[]
    }
}

impl<T: Salt<SZ> + ?Sized, SZ: salt::MinSize> Salt<SZ> for &T {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        <T as Salt<SZ>>::as_bytes(self)
    }
}

impl<T: Salt<SZ> + ?Sized, SZ: salt::MinSize> Salt<SZ> for &mut T {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        <T as Salt<SZ>>::as_bytes(self)
    }
}

/// A [`Salt`] with runtime flexibility.
///
/// The [`Salt`] trait is implemented for common fixed size types which meet the marker constraint
/// at compile time, this type moves the check to runtime.
#[repr(transparent)]
pub struct SaltSlice<'s, SZ: salt::MinSize> {
    raw: &'s [u8],
    _min_size: PhantomData<SZ>
}

impl<'s, SZ: salt::MinSize> Clone for SaltSlice<'s, SZ> {
    #[inline]
    fn clone(&self) -> Self {
        Self::create(self.raw)
    }
}

macro_rules! impl_salt_for {
    ($sz:ty => { $item:item }) => {
        impl<'s> SaltSlice<'s, $sz> {
            $item
        }
    };
}

impl_salt_for! { salt::Empty => {
    /// Create a new `SaltSlice` instance.
    ///
    /// # Errors
    ///
    /// This is infallible, the result keeps this `new` in sync with the other constraints.
    pub const fn new(slice: &'s [u8]) -> Result<Self, Infallible> {
        Ok(Self::create(slice))
    }
}}

impl_salt_for! { salt::NonEmpty => {
    /// Create a new `SaltSlice` instance.
    ///
    /// # Errors
    ///
    /// If `slice` is empty. It is still **strongly recommended** to use at least a 128 bit salt
    /// generated from a `CSPRNG`.
    pub const fn new(slice: &'s [u8]) -> Result<Self, InvalidSize> {
        if slice.is_empty() {
            Err(InvalidSize)
        } else {
            Ok(Self::create(slice))
        }
    }
}}

impl_salt_for! { salt::Min16 => {
    /// Create a new `SaltSlice` instance.
    ///
    /// # Errors
    ///
    /// If `slice` is shorter than 128 bits (16 bytes).
    pub const fn new(slice: &'s [u8]) -> Result<Self, InvalidSize> {
        if slice.len() >= 16 {
            Ok(Self::create(slice))
        } else {
            Err(InvalidSize)
        }
    }
}}

impl<'s, SZ: salt::MinSize> SaltSlice<'s, SZ> {
    #[inline]
    const fn create(raw: &'s [u8]) -> Self {
        Self { raw, _min_size: PhantomData }
    }
}

macro_rules! impl_salt_try_from {
    ($ty:ty) => {
        impl<'s> TryFrom<&'s [u8]> for SaltSlice<'s, $ty> {
            type Error = <$ty as salt::MinSize>::CreateError;

            #[inline]
            fn try_from(value: &'s [u8]) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

impl_salt_try_from! { salt::NonEmpty }
impl_salt_try_from! { salt::Min16 }

impl<'s> From<&'s [u8]> for SaltSlice<'s, salt::Empty> {
    #[inline]
    fn from(value: &'s [u8]) -> Self {
        Self::create(value)
    }
}

impl<'s> From<&'s [u8; 16]> for SaltSlice<'s, salt::Min16> {
    #[inline]
    fn from(value: &'s [u8; 16]) -> Self {
        Self::create(value)
    }
}

impl<'s, SZ: salt::MinSize> Sealed for SaltSlice<'s, SZ> {}

impl<'s, SZ: salt::MinSize> Salt<SZ> for SaltSlice<'s, SZ> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.raw
    }
}
