//! Pure Rust hashing, HMAC, symmetric cipher, AEAD and KDF primitives, shaped after wolfCrypt.
//!
//! The statically typed APIs (e.g. [`hash::Sha256`], [`aead::AesGcm`]) report failure through
//! the opaque [`Unspecified`] or [`opaque_res::Res`], while the runtime dispatched layers
//! ([`hash::Hash`], [`mac::hmac::Hmac`], [`kdf`], [`base64`]) return the descriptive [`Error`],
//! which maps onto a wolfCrypt [`ErrorCode`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::nursery,
    clippy::all
)]
// lengths are checked against u32::MAX before any narrowing cast.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
// this devalues things which actually require the must-use attribute
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
// the panic API asserts on `Res`, only for more controlled error messages.
#![allow(clippy::manual_assert)]
#![allow(clippy::inline_always)]
// constant time bitwise hacks
#![allow(clippy::cast_sign_loss)]
// round functions index by position
#![allow(clippy::many_single_char_names)]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod buf;
pub mod opaque_res;
mod sealed;

pub mod error;
pub mod ct;
pub mod context;
pub mod base64;

pub mod hash;
pub mod mac;
pub mod aes;
pub mod des3;
pub mod aead;
pub mod kdf;

non_fips! {
    pub mod chacha;
    pub mod camellia;
    pub mod arc4;
    pub mod rabbit;
    pub mod hc128;
}

pub use error::{Error, ErrorCode, Unspecified, MakeOpaque};
pub use context::Context;

#[must_use]
pub(crate) const fn const_can_cast_u32<const S: usize>() -> bool {
    const_lte::<S, { u32::MAX }>()
}

#[inline]
#[must_use]
pub(crate) const fn can_cast_u32(len: usize) -> bool {
    len <= (u32::MAX as usize)
}

#[must_use]
pub(crate) const fn const_can_cast_i32<const S: usize>() -> bool {
    S <= (i32::MAX as usize)
}

#[inline]
#[must_use]
pub(crate) const fn can_cast_i32(len: usize) -> bool {
    len <= (i32::MAX as usize)
}

#[must_use]
pub(crate) const fn const_lte<const L: usize, const MAX: u32>() -> bool {
    L <= (MAX as usize)
}

#[cfg(feature = "allow-non-fips")]
#[must_use]
pub(crate) const fn const_gte<const L: usize, const MIN: usize>() -> bool {
    L >= MIN
}

#[cfg(feature = "allow-non-fips")]
#[inline]
#[must_use]
pub(crate) const fn lte<const MAX: usize>(value: usize) -> bool {
    value <= MAX
}

#[cfg(feature = "allow-non-fips")]
#[inline]
#[must_use]
pub(crate) const fn gte<const MIN: usize>(value: usize) -> bool {
    value >= MIN
}

#[inline]
#[must_use]
pub(crate) const fn to_u32(num: usize) -> Option<u32> {
    if can_cast_u32(num) {
        Some(num as u32)
    } else {
        None
    }
}
