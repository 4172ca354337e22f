//! Cryptographic Hash Algorithms
//!
//! Each algorithm has its own statically typed hasher (e.g. [`Sha256`]), and [`Hash`] selects
//! one at runtime from a [`HashType`].

pub(crate) mod engine;
pub(crate) mod keccak;

#[macro_use]
mod api_gen;
#[macro_use]
mod shake_api;

#[doc(hidden)]
pub mod sha;
#[doc(hidden)]
pub mod sha224;
#[doc(hidden)]
pub mod sha256;
#[doc(hidden)]
pub mod sha384;
#[doc(hidden)]
pub mod sha512;
#[doc(hidden)]
pub mod sha512_256;
#[doc(hidden)]
pub mod sha512_224;
#[doc(hidden)]
pub mod sha3_224;
#[doc(hidden)]
pub mod sha3_256;
#[doc(hidden)]
pub mod sha3_384;
#[doc(hidden)]
pub mod sha3_512;
#[doc(hidden)]
pub mod shake128;
#[doc(hidden)]
pub mod shake256;

pub mod dispatch;

pub use {
    sha::Sha,
    sha224::Sha224,
    sha256::Sha256,
    sha384::Sha384,
    sha512::Sha512,
    sha512_224::Sha512_224,
    sha512_256::Sha512_256,
    sha3_224::Sha3_224,
    sha3_256::Sha3_256,
    sha3_384::Sha3_384,
    sha3_512::Sha3_512,
    shake128::Shake128,
    shake256::Shake256
};

pub use dispatch::{
    Hash, HashType, hash, oid, digest_size, block_size, MAX_DIGEST_SIZE, MAX_BLOCK_SIZE
};

#[cfg(feature = "allow-non-fips")]
#[macro_use]
mod blake_api;

non_fips! {
    #[doc(hidden)]
    pub mod ripemd_160;
    pub use ripemd_160::RipeMd;

    #[doc(hidden)]
    pub mod md5;
    #[doc(hidden)]
    pub mod md4;

    pub use md5::Md5;
    pub use md4::Md4;

    #[doc(hidden)]
    pub mod blake2b;
    pub use blake2b::Blake2b;
}
