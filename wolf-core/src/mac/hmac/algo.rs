//! Marker types which select the hash function at compile time.
//!
//! The KDFs in [`kdf`](crate::kdf) are parameterised over these, each marker maps onto the
//! runtime [`HashType`] used by [`Hmac`](super::Hmac).

use crate::hash::HashType;
use crate::sealed::HmacSealed as Sealed;

/// A fixed size digest produced by a hash function.
pub trait Digest : Sealed + AsRef<[u8]> + AsMut<[u8]> + Copy {
    #[doc(hidden)]
    #[must_use]
    fn zeroes() -> Self;
    /// Returns the size of the digest in bytes.
    #[must_use]
    fn size() -> u32;
}

/// The hashing algorithm to use with `HMAC` and the HMAC based KDFs.
pub trait Hash : Sealed {
    /// The output of the hash function.
    type Digest: Digest;

    /// The runtime identifier of this hash function.
    const TYPE: HashType;

    /// The digest length in bytes.
    const DIGEST_SIZE: usize;

    /// The block length in bytes.
    const BLOCK_SIZE: usize;
}

macro_rules! make_digest {
    ($($sz:literal),* $(,)?) => {
        $(
            impl Sealed for [u8; $sz] {}
            impl Digest for [u8; $sz] {
                #[inline]
                fn zeroes() -> Self {
                    [0u8; $sz]
                }
                #[inline]
                fn size() -> u32 {
                    $sz
                }
            }
        )*
    };
}

macro_rules! make_algo_type {
    ($((
        $(#[$meta:meta])*
        $name:ident,
        $ds:literal,
        $bs:literal
    )),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Copy, Clone, Debug)]
            pub struct $name;
            impl Sealed for $name {}

            impl Hash for $name {
                type Digest = [u8; $ds];
                const TYPE: HashType = HashType::$name;
                const DIGEST_SIZE: usize = $ds;
                const BLOCK_SIZE: usize = $bs;
            }
        )*
    };
}

make_digest! { 16, 20, 28, 32, 48, 64 }

#[cfg_attr(docsrs, doc(cfg(feature = "allow-non-fips")))]
#[cfg(feature = "allow-non-fips")]
make_algo_type! {
    (
        /// The `MD5` HMAC Hash Function.
        ///
        /// `MD5` should be [considered cryptographically broken and unsuitable for further use][1].
        /// Collision attacks against `MD5` are both practical and trivial, theoretical attacks
        /// against `MD5` have been found.
        ///
        /// `MD5` is included in this library for legacy reasons only.
        ///
        /// [1]: https://www.kb.cert.org/vuls/id/836068
        Md5, 16, 64
    )
}

make_algo_type! {
    (
        /// The `SHA-1` HMAC Hash Function.
        ///
        /// The SHA-1 algorithm is included in this library for legacy reasons only. NIST has
        /// deprecated SHA-1 for digital signatures, HMAC-SHA-1 remains approved but new designs
        /// should prefer the SHA-2 or SHA-3 families.
        Sha, 20, 64
    ),
    (
        /// The `SHA224` HMAC Hash Function.
        Sha224, 28, 64
    ),
    (
        /// The `SHA256` HMAC Hash Function.
        Sha256, 32, 64
    ),
    (
        /// The `SHA384` HMAC Hash Function.
        Sha384, 48, 128
    ),
    (
        /// The `SHA512` HMAC Hash Function.
        Sha512, 64, 128
    ),
    (
        /// The `SHA3-224` HMAC Hash Function.
        Sha3_224, 28, 144
    ),
    (
        /// The `SHA3-256` HMAC Hash Function.
        Sha3_256, 32, 136
    ),
    (
        /// The `SHA3-384` HMAC Hash Function.
        Sha3_384, 48, 104
    ),
    (
        /// The `SHA3-512` HMAC Hash Function.
        Sha3_512, 64, 72
    )
}
