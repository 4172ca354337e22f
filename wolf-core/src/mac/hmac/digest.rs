use core::fmt;
use crate::ct;
use crate::hash::MAX_DIGEST_SIZE;

/// Utility wrapper around the final `HMAC` hash.
///
/// The length depends on the hash function the [`Hmac`](super::Hmac) was keyed with, up to
/// [`MAX_DIGEST_SIZE`] bytes. All equality checks are constant-time over the digest bytes.
#[must_use]
#[derive(Clone)]
pub struct Digest {
    raw: [u8; MAX_DIGEST_SIZE],
    len: usize
}

impl fmt::Debug for Digest {
    /// Writes "Digest { ... }" to the provided formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Digest { ... }")
    }
}

impl Digest {
    /// `len` must not exceed [`MAX_DIGEST_SIZE`].
    pub(crate) const fn new(raw: [u8; MAX_DIGEST_SIZE], len: usize) -> Self {
        debug_assert!(len <= MAX_DIGEST_SIZE);
        Self { raw, len }
    }

    /// The digest bytes.
    ///
    /// # Note
    ///
    /// Comparing `Digest`s should always be in constant-time, do not compare the returned slice
    /// with `==`. The `Digest` type's `PartialEq` implementations and [`compare_digest`] are
    /// all constant-time, as is this crate's [`ct_eq`] function.
    ///
    /// [`compare_digest`]: Self::compare_digest
    /// [`ct_eq`]: crate::ct::ct_eq
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.raw[..self.len]
    }

    /// Length of the digest in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Never `true` for a digest produced by [`Hmac`](super::Hmac).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Compare against `other` in constant-time.
    ///
    /// A length mismatch is not hidden, the lengths of MACs are public.
    #[inline]
    #[must_use]
    pub fn compare_digest(&self, other: &[u8]) -> bool {
        ct::ct_eq(self.as_slice(), other)
    }

    /// Hex-encode the digest in constant-time into `out`, returning the encoded `&str`.
    ///
    /// # Errors
    ///
    /// If `out` is shorter than twice the digest length.
    #[inline]
    pub fn hex_encode<'o>(&self, out: &'o mut [u8]) -> Result<&'o str, crate::buf::InvalidSize> {
        ct::hex_encode_str(self.as_slice(), out)
    }
}

impl AsRef<[u8]> for Digest {
    #[inline]
    fn as_ref(&self) -> &[u8] { self.as_slice() }
}

impl PartialEq for Digest {
    /// Constant-Time Equivalence.
    fn eq(&self, other: &Self) -> bool {
        ct::ct_eq(self.as_slice(), other.as_slice())
    }
}

impl Eq for Digest {}

impl PartialEq<[u8]> for Digest {
    /// Constant-Time Equivalence.
    fn eq(&self, other: &[u8]) -> bool {
        ct::ct_eq(self.as_slice(), other)
    }
}

impl<const C: usize> PartialEq<[u8; C]> for Digest {
    /// Constant-Time Equivalence.
    fn eq(&self, other: &[u8; C]) -> bool {
        ct::ct_eq(self.as_slice(), other)
    }
}

impl<T: ?Sized> PartialEq<&T> for Digest where Self: PartialEq<T> {
    /// Constant-Time Equivalence.
    #[inline]
    fn eq(&self, other: &&T) -> bool {
        self.eq(*other)
    }
}

impl Drop for Digest {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.raw);
    }
}
