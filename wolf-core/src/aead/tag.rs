use core::fmt;
use crate::ct;
use crate::error::Error;

/// Represents the authentication tag for AEADs and the one-shot MACs.
///
/// A tag holds up to [`CAPACITY`](Self::CAPACITY) bytes. GCM and CCM may produce truncated
/// tags, in which case [`len`](Self::len) is less than `CAPACITY` and only the leading bytes
/// are meaningful. Equality is constant-time over the meaningful bytes.
#[must_use = "You must use the tag, or the AEAD is doing nothing for you"]
#[derive(Copy, Clone)]
pub struct Tag {
    inner: [u8; 16],
    len: u8
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_fmt(format_args!("Tag({:?})", self.as_slice()))
    }
}

impl Tag {
    /// The size of the full authentication tag in bytes.
    pub const CAPACITY: usize = 16;

    /// Creates a new full length `Tag` from a 16-byte array.
    pub const fn new(inner: [u8; Self::CAPACITY]) -> Self {
        Self { inner, len: Self::CAPACITY as u8 }
    }

    /// Creates a new `Tag` instance filled with zeros.
    ///
    /// This is typically used to create a tag buffer that will be filled
    /// by an encryption operation.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::aead::Tag;
    ///
    /// let tag = Tag::new_zeroed();
    /// assert_eq!(tag.as_slice(), &[0u8; 16]);
    /// ```
    pub const fn new_zeroed() -> Self {
        Self::new([0u8; Self::CAPACITY])
    }

    /// Creates a (possibly truncated) tag from the received bytes.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if `tag` is empty or longer than [`CAPACITY`](Self::CAPACITY).
    pub fn from_slice(tag: &[u8]) -> Result<Self, Error> {
        if tag.is_empty() || tag.len() > Self::CAPACITY {
            return Err(Error::BadFuncArg);
        }
        let mut inner = [0u8; Self::CAPACITY];
        inner[..tag.len()].copy_from_slice(tag);
        Ok(Self { inner, len: tag.len() as u8 })
    }

    /// Keep only the leading `len` bytes.
    ///
    /// `len` must be at least 1 and no greater than the current length.
    pub(crate) fn truncate(&mut self, len: usize) {
        debug_assert!(len >= 1 && len <= self.len());
        self.inner[len..].fill(0);
        self.len = len as u8;
    }

    /// Length of the tag in bytes.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Consumes the `Tag` and returns the underlying 16-byte array.
    ///
    /// Bytes past [`len`](Self::len) are zero.
    #[inline]
    pub const fn take(self) -> [u8; Self::CAPACITY] {
        self.inner
    }

    /// Returns a reference to the tag as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner[..self.len()]
    }

    #[inline]
    pub(crate) fn as_mut_array(&mut self) -> &mut [u8; Self::CAPACITY] {
        &mut self.inner
    }

    /// Constant-time check of this (possibly truncated) tag against the leading bytes of a
    /// freshly computed full length tag.
    #[inline]
    pub(crate) fn matches_prefix(&self, full: &[u8; Self::CAPACITY]) -> bool {
        ct::ct_eq(&full[..self.len()], self.as_slice())
    }
}

impl AsRef<[u8]> for Tag {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<[u8; 16]> for Tag {
    #[inline]
    fn from(value: [u8; 16]) -> Self {
        Self::new(value)
    }
}

impl PartialEq for Tag {
    /// Constant Time Equivalence
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ct::ct_eq(self.as_slice(), other.as_slice())
    }
}

impl Eq for Tag {}

impl PartialEq<[u8]> for Tag {
    /// Constant Time Equivalence
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        ct::ct_eq(self.as_slice(), other)
    }
}

impl<const C: usize> PartialEq<[u8; C]> for Tag {
    /// Constant Time Equivalence
    #[inline]
    fn eq(&self, other: &[u8; C]) -> bool {
        ct::ct_eq(self.as_slice(), other)
    }
}
