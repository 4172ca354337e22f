//! Runtime selected hashing.
//!
//! [`HashType`] names an algorithm, [`Hash`] holds exactly one live digest state for it. Every
//! operation on a [`Hash`] is tagged with the caller's [`HashType`]; a tag which does not match
//! the handle is rejected with [`Error::BadFuncArg`] rather than silently hashing with the
//! wrong algorithm.
//!
//! # Example
//!
//! ```
//! use wolf_core::hash::{Hash, HashType};
//!
//! let mut hash = Hash::new(HashType::Sha256).unwrap();
//! hash.update(HashType::Sha256, b"hello ").unwrap();
//! hash.update(HashType::Sha256, b"world").unwrap();
//!
//! let mut digest = [0u8; 32];
//! assert_eq!(hash.finalize_into(HashType::Sha256, &mut digest), Ok(32));
//!
//! // a mismatched tag never touches the state
//! assert!(hash.update(HashType::Sha512, b"oops").is_err());
//! ```
use core::fmt;
use core::str::FromStr;
use zeroize::Zeroize;

use crate::context::Context;
use crate::error::Error;
use crate::hash::{
    Sha, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256,
    Sha3_224, Sha3_256, Sha3_384, Sha3_512
};
#[cfg(feature = "allow-non-fips")]
use crate::hash::{Md5, RipeMd, Blake2b};

/// The largest digest any dispatchable algorithm produces.
pub const MAX_DIGEST_SIZE: usize = 64;
/// The largest block size of any dispatchable algorithm (SHA3-224).
pub const MAX_BLOCK_SIZE: usize = 144;

/// Every hash algorithm identifier, mirroring the wolfCrypt numbering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, core::hash::Hash)]
#[repr(i32)]
pub enum HashType {
    None = 0,
    Md2 = 1,
    Md4 = 2,
    Md5 = 3,
    Sha = 4,
    Sha224 = 5,
    Sha256 = 6,
    Sha384 = 7,
    Sha512 = 8,
    Md5Sha = 9,
    Sha3_224 = 10,
    Sha3_256 = 11,
    Sha3_384 = 12,
    Sha3_512 = 13,
    Blake2b = 14,
    Blake2s = 15,
    Sha512_224 = 16,
    Sha512_256 = 17,
    Shake128 = 18,
    Shake256 = 19,
    Ripemd160 = 20
}

impl HashType {
    /// All variants, in numeric order.
    pub const ALL: [Self; 21] = [
        Self::None, Self::Md2, Self::Md4, Self::Md5, Self::Sha, Self::Sha224, Self::Sha256,
        Self::Sha384, Self::Sha512, Self::Md5Sha, Self::Sha3_224, Self::Sha3_256,
        Self::Sha3_384, Self::Sha3_512, Self::Blake2b, Self::Blake2s, Self::Sha512_224,
        Self::Sha512_256, Self::Shake128, Self::Shake256, Self::Ripemd160
    ];

    /// The raw wolfCrypt value.
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Look up an algorithm by its common name, ignoring case.
    ///
    /// Unrecognized names map to [`HashType::None`].
    ///
    /// ```
    /// use wolf_core::hash::HashType;
    ///
    /// assert_eq!(HashType::from_name("sha3-256"), HashType::Sha3_256);
    /// assert_eq!(HashType::from_name("SHA1"), HashType::Sha);
    /// assert_eq!(HashType::from_name("whirlpool"), HashType::None);
    /// ```
    pub fn from_name(name: &str) -> Self {
        const NAMES: [(&str, HashType); 20] = [
            ("MD2", HashType::Md2),
            ("MD4", HashType::Md4),
            ("MD5", HashType::Md5),
            ("SHA", HashType::Sha),
            ("SHA1", HashType::Sha),
            ("SHA224", HashType::Sha224),
            ("SHA256", HashType::Sha256),
            ("SHA384", HashType::Sha384),
            ("SHA512", HashType::Sha512),
            ("SHA3-224", HashType::Sha3_224),
            ("SHA3-256", HashType::Sha3_256),
            ("SHA3-384", HashType::Sha3_384),
            ("SHA3-512", HashType::Sha3_512),
            ("BLAKE2B", HashType::Blake2b),
            ("BLAKE2S", HashType::Blake2s),
            ("SHA512-224", HashType::Sha512_224),
            ("SHA512-256", HashType::Sha512_256),
            ("SHAKE128", HashType::Shake128),
            ("SHAKE256", HashType::Shake256),
            ("RIPEMD160", HashType::Ripemd160)
        ];

        NAMES.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map_or(Self::None, |(_, ty)| *ty)
    }

    /// Digest length in bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for `None`, `Md2`, `Md4`, `Md5Sha` and the SHAKE XOFs.
    /// - [`Error::HashType`] for algorithms which are not available in this build.
    pub const fn digest_size(self) -> Result<usize, Error> {
        match self.sizes() {
            Ok((ds, _)) => Ok(ds),
            Err(e) => Err(e)
        }
    }

    /// Internal block length in bytes, with the same errors as [`digest_size`].
    ///
    /// [`digest_size`]: Self::digest_size
    pub const fn block_size(self) -> Result<usize, Error> {
        match self.sizes() {
            Ok((_, bs)) => Ok(bs),
            Err(e) => Err(e)
        }
    }

    const fn sizes(self) -> Result<(usize, usize), Error> {
        match self {
            Self::None | Self::Md2 | Self::Md4 | Self::Md5Sha
                | Self::Shake128 | Self::Shake256 => Err(Error::BadFuncArg),
            Self::Blake2s => Err(Error::HashType),
            Self::Md5 if !cfg!(feature = "allow-non-fips") => Err(Error::HashType),
            Self::Blake2b if !cfg!(feature = "allow-non-fips") => Err(Error::HashType),
            Self::Ripemd160 if !cfg!(feature = "allow-non-fips") => Err(Error::HashType),
            Self::Md5 => Ok((16, 64)),
            Self::Sha => Ok((20, 64)),
            Self::Sha224 => Ok((28, 64)),
            Self::Sha256 => Ok((32, 64)),
            Self::Sha384 => Ok((48, 128)),
            Self::Sha512 => Ok((64, 128)),
            Self::Sha3_224 => Ok((28, 144)),
            Self::Sha3_256 => Ok((32, 136)),
            Self::Sha3_384 => Ok((48, 104)),
            Self::Sha3_512 => Ok((64, 72)),
            Self::Blake2b => Ok((64, 128)),
            Self::Sha512_224 => Ok((28, 128)),
            Self::Sha512_256 => Ok((32, 128)),
            Self::Ripemd160 => Ok((20, 64))
        }
    }

    /// The wolfCrypt OID sum for this algorithm.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for `None`, `Md4`, `Blake2b`, `Blake2s` and `Ripemd160`, which
    ///   have no OID in this numbering.
    /// - [`Error::HashType`] for recognized algorithms which are compiled out (`Md2` always,
    ///   `Md5` and `Md5Sha` without `allow-non-fips`).
    pub const fn oid(self) -> Result<i32, Error> {
        match self {
            Self::None | Self::Md4 | Self::Blake2b | Self::Blake2s | Self::Ripemd160 =>
                Err(Error::BadFuncArg),
            Self::Md2 => Err(Error::HashType),
            Self::Md5 | Self::Md5Sha if !cfg!(feature = "allow-non-fips") => Err(Error::HashType),
            Self::Md5 | Self::Md5Sha => Ok(649),
            Self::Sha => Ok(88),
            Self::Sha224 => Ok(417),
            Self::Sha256 => Ok(414),
            Self::Sha384 => Ok(415),
            Self::Sha512 => Ok(416),
            Self::Sha512_224 => Ok(418),
            Self::Sha512_256 => Ok(419),
            Self::Sha3_224 => Ok(420),
            Self::Sha3_256 => Ok(421),
            Self::Sha3_384 => Ok(422),
            Self::Sha3_512 => Ok(423),
            Self::Shake128 => Ok(424),
            Self::Shake256 => Ok(425)
        }
    }
}

impl TryFrom<i32> for HashType {
    type Error = Error;

    /// Raw tags outside of `0..=20` are [`Error::BadFuncArg`].
    #[inline]
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value).ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(Error::BadFuncArg)
    }
}

impl From<HashType> for i32 {
    #[inline]
    fn from(value: HashType) -> Self {
        value.as_i32()
    }
}

impl FromStr for HashType {
    type Err = core::convert::Infallible;

    /// Never fails, see [`HashType::from_name`].
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Md2 => "MD2",
            Self::Md4 => "MD4",
            Self::Md5 => "MD5",
            Self::Sha => "SHA",
            Self::Sha224 => "SHA224",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Md5Sha => "MD5-SHA",
            Self::Sha3_224 => "SHA3-224",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_512 => "SHA3-512",
            Self::Blake2b => "BLAKE2B",
            Self::Blake2s => "BLAKE2S",
            Self::Sha512_224 => "SHA512-224",
            Self::Sha512_256 => "SHA512-256",
            Self::Shake128 => "SHAKE128",
            Self::Shake256 => "SHAKE256",
            Self::Ripemd160 => "RIPEMD160"
        })
    }
}

/// A digest state for one runtime selected algorithm.
///
/// Finalizing writes the digest and re-initializes the handle for the same algorithm, so a
/// handle is always ready for input.
#[derive(Clone)]
pub enum Hash {
    #[cfg(feature = "allow-non-fips")]
    Md5(Md5),
    Sha(Sha),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Sha512_224(Sha512_224),
    Sha512_256(Sha512_256),
    Sha3_224(Sha3_224),
    Sha3_256(Sha3_256),
    Sha3_384(Sha3_384),
    Sha3_512(Sha3_512),
    #[cfg(feature = "allow-non-fips")]
    Blake2b(Blake2b<64>),
    #[cfg(feature = "allow-non-fips")]
    RipeMd(RipeMd)
}

macro_rules! each_hash {
    ($this:expr, $h:ident => $body:expr) => {
        match $this {
            #[cfg(feature = "allow-non-fips")]
            Hash::Md5($h) => $body,
            Hash::Sha($h) => $body,
            Hash::Sha224($h) => $body,
            Hash::Sha256($h) => $body,
            Hash::Sha384($h) => $body,
            Hash::Sha512($h) => $body,
            Hash::Sha512_224($h) => $body,
            Hash::Sha512_256($h) => $body,
            Hash::Sha3_224($h) => $body,
            Hash::Sha3_256($h) => $body,
            Hash::Sha3_384($h) => $body,
            Hash::Sha3_512($h) => $body,
            #[cfg(feature = "allow-non-fips")]
            Hash::Blake2b($h) => $body,
            #[cfg(feature = "allow-non-fips")]
            Hash::RipeMd($h) => $body
        }
    };
}

impl Hash {
    /// Create a handle for `ty` using the default [`Context`].
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for `None`, `Md2`, `Md4`, `Md5Sha`, `Shake128` and `Shake256`,
    ///   which are either not digests or only have dedicated APIs.
    /// - [`Error::HashType`] for `Blake2s`, and for `Md5`, `Blake2b` and `Ripemd160` without
    ///   the `allow-non-fips` feature.
    #[inline]
    pub fn new(ty: HashType) -> Result<Self, Error> {
        Self::new_ex(ty, &Context::default())
    }

    /// Create a handle for `ty` under an explicit [`Context`].
    ///
    /// Only the software implementation is built in, so a context naming a device is refused.
    ///
    /// # Errors
    ///
    /// - [`Error::NotCompiledIn`] if `ctx` selects a device.
    /// - Otherwise those of [`Hash::new`].
    pub fn new_ex(ty: HashType, ctx: &Context) -> Result<Self, Error> {
        log_debug!(label = ctx.label(), dev_id = ctx.dev_id(), hash = %ty, "hash init");
        if !ctx.is_software() {
            log_warn!(dev_id = ctx.dev_id(), "no device backend for hashing");
            return Err(Error::NotCompiledIn);
        }

        match ty {
            HashType::None | HashType::Md2 | HashType::Md4 | HashType::Md5Sha
                | HashType::Shake128 | HashType::Shake256 => Err(Error::BadFuncArg),
            HashType::Blake2s => Err(Error::HashType),
            #[cfg(not(feature = "allow-non-fips"))]
            HashType::Md5 | HashType::Blake2b | HashType::Ripemd160 => Err(Error::HashType),
            #[cfg(feature = "allow-non-fips")]
            HashType::Md5 => Ok(Self::Md5(Md5::new())),
            #[cfg(feature = "allow-non-fips")]
            HashType::Blake2b => Ok(Self::Blake2b(Blake2b::unkeyed())),
            #[cfg(feature = "allow-non-fips")]
            HashType::Ripemd160 => Ok(Self::RipeMd(RipeMd::new())),
            HashType::Sha => Ok(Self::Sha(Sha::new())),
            HashType::Sha224 => Ok(Self::Sha224(Sha224::new())),
            HashType::Sha256 => Ok(Self::Sha256(Sha256::new())),
            HashType::Sha384 => Ok(Self::Sha384(Sha384::new())),
            HashType::Sha512 => Ok(Self::Sha512(Sha512::new())),
            HashType::Sha512_224 => Ok(Self::Sha512_224(Sha512_224::new())),
            HashType::Sha512_256 => Ok(Self::Sha512_256(Sha512_256::new())),
            HashType::Sha3_224 => Ok(Self::Sha3_224(Sha3_224::new())),
            HashType::Sha3_256 => Ok(Self::Sha3_256(Sha3_256::new())),
            HashType::Sha3_384 => Ok(Self::Sha3_384(Sha3_384::new())),
            HashType::Sha3_512 => Ok(Self::Sha3_512(Sha3_512::new()))
        }
    }

    /// The algorithm this handle computes.
    pub const fn hash_type(&self) -> HashType {
        match self {
            #[cfg(feature = "allow-non-fips")]
            Self::Md5(_) => HashType::Md5,
            Self::Sha(_) => HashType::Sha,
            Self::Sha224(_) => HashType::Sha224,
            Self::Sha256(_) => HashType::Sha256,
            Self::Sha384(_) => HashType::Sha384,
            Self::Sha512(_) => HashType::Sha512,
            Self::Sha512_224(_) => HashType::Sha512_224,
            Self::Sha512_256(_) => HashType::Sha512_256,
            Self::Sha3_224(_) => HashType::Sha3_224,
            Self::Sha3_256(_) => HashType::Sha3_256,
            Self::Sha3_384(_) => HashType::Sha3_384,
            Self::Sha3_512(_) => HashType::Sha3_512,
            #[cfg(feature = "allow-non-fips")]
            Self::Blake2b(_) => HashType::Blake2b,
            #[cfg(feature = "allow-non-fips")]
            Self::RipeMd(_) => HashType::Ripemd160
        }
    }

    /// Digest length of this handle's algorithm.
    #[inline]
    pub fn digest_size(&self) -> usize {
        each_hash!(self, h => size_of_digest(h))
    }

    /// Block length of this handle's algorithm.
    #[inline]
    pub fn block_size(&self) -> usize {
        each_hash!(self, h => size_of_block(h))
    }

    #[inline]
    fn check_tag(&self, ty: HashType) -> Result<(), Error> {
        if self.hash_type() == ty {
            Ok(())
        } else {
            log_warn!(expected = %self.hash_type(), got = %ty, "hash type mismatch");
            Err(Error::BadFuncArg)
        }
    }

    #[inline]
    fn check_out(&self, out: &[u8]) -> Result<usize, Error> {
        let needed = self.digest_size();
        if out.len() < needed {
            Err(Error::buffer(needed, out.len()))
        } else {
            Ok(needed)
        }
    }

    /// Absorb `data`.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if `ty` is not this handle's algorithm.
    pub fn update(&mut self, ty: HashType, data: &[u8]) -> Result<(), Error> {
        self.check_tag(ty)?;
        self.ingest(data);
        Ok(())
    }

    /// Write the digest into `out`, returning its length, and re-initialize the handle.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `ty` is not this handle's algorithm.
    /// - [`Error::Buffer`] if `out` is shorter than the digest.
    pub fn finalize_into(&mut self, ty: HashType, out: &mut [u8]) -> Result<usize, Error> {
        self.check_tag(ty)?;
        let len = self.check_out(out)?;
        self.emit(out);
        Ok(len)
    }

    /// Write the digest of everything absorbed so far into `out` without changing the state.
    ///
    /// # Errors
    ///
    /// See [`finalize_into`](Self::finalize_into).
    pub fn get_hash(&self, ty: HashType, out: &mut [u8]) -> Result<usize, Error> {
        self.check_tag(ty)?;
        let len = self.check_out(out)?;
        if each_hash!(self, h => h.get_hash_into(out)).is_err() {
            return Err(Error::buffer(len, out.len()));
        }
        Ok(len)
    }

    #[inline]
    pub(crate) fn ingest(&mut self, data: &[u8]) {
        each_hash!(self, h => h.ingest(data))
    }

    /// `out` must hold at least `digest_size` bytes.
    #[inline]
    pub(crate) fn emit(&mut self, out: &mut [u8]) {
        each_hash!(self, h => h.emit(out))
    }

    /// Put the handle back into its freshly initialized state.
    pub fn reset(&mut self) {
        let mut scratch = [0u8; MAX_DIGEST_SIZE];
        self.emit(&mut scratch);
        scratch.zeroize();
    }
}

trait Sizes {
    const DS: usize;
    const BS: usize;
}

macro_rules! impl_sizes {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sizes for $ty {
                const DS: usize = <$ty>::DIGEST_SIZE;
                const BS: usize = <$ty>::BLOCK_SIZE;
            }
        )*
    };
}

impl_sizes! {
    Sha, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256,
    Sha3_224, Sha3_256, Sha3_384, Sha3_512
}

#[cfg(feature = "allow-non-fips")]
impl_sizes! { Md5, RipeMd }

#[cfg(feature = "allow-non-fips")]
impl Sizes for Blake2b<64> {
    const DS: usize = 64;
    const BS: usize = Blake2b::<64>::BLOCK_SIZE;
}

#[inline(always)]
const fn size_of_digest<T: Sizes>(_: &T) -> usize { T::DS }

#[inline(always)]
const fn size_of_block<T: Sizes>(_: &T) -> usize { T::BS }

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash<{}> {{ ... }}", self.hash_type())
    }
}

/// Hash `data` with `ty` in one call, writing the digest into `out` and returning its length.
///
/// # Errors
///
/// Those of [`Hash::new`] and [`Hash::finalize_into`].
///
/// # Example
///
/// ```
/// use wolf_core::hash::{hash, HashType};
///
/// let mut out = [0u8; 32];
/// assert_eq!(hash(HashType::Sha256, b"", &mut out), Ok(32));
/// assert_eq!(out[..4], [0xe3, 0xb0, 0xc4, 0x42]);
/// ```
pub fn hash(ty: HashType, data: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    let mut h = Hash::new(ty)?;
    h.update(ty, data)?;
    h.finalize_into(ty, out)
}

/// The wolfCrypt OID sum for `ty`, see [`HashType::oid`].
#[inline]
pub const fn oid(ty: HashType) -> Result<i32, Error> {
    ty.oid()
}

/// Digest length for `ty`, see [`HashType::digest_size`].
#[inline]
pub const fn digest_size(ty: HashType) -> Result<usize, Error> {
    ty.digest_size()
}

/// Block length for `ty`, see [`HashType::block_size`].
#[inline]
pub const fn block_size(ty: HashType) -> Result<usize, Error> {
    ty.block_size()
}
