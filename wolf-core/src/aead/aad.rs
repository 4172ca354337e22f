use crate::{can_cast_u32, to_u32};
use crate::sealed::AadSealed as Sealed;
use core::fmt;

/// A generic representation of additional authenticated data (AAD).
///
/// Implemented for byte slices and arrays, `str`, `()` (no AAD), `Option<T: Aad>` and, with the
/// `alloc` feature, `Vec<u8>` and `String`.
pub trait Aad: Sealed {
    /// The authenticated bytes, empty if no AAD is being provided.
    #[doc(hidden)]
    #[must_use]
    fn as_bytes(&self) -> &[u8];

    /// The length of the AAD as a `u32`, `None` if it cannot be represented as one.
    #[doc(hidden)]
    #[must_use]
    #[inline]
    fn try_size(&self) -> Option<u32> {
        to_u32(self.as_bytes().len())
    }

    /// Returns `true` IFF the result of [`try_size`] would be `Some`.
    ///
    /// [`try_size`]: Aad::try_size
    #[doc(hidden)]
    #[must_use]
    #[inline]
    fn is_valid_size(&self) -> bool {
        can_cast_u32(self.as_bytes().len())
    }
}

/// Represents Additional Authenticated Data (AAD) Slice.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AadSlice<'s> {
    inner: Option<&'s [u8]>
}

impl<'s> fmt::Debug for AadSlice<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AadSlice(")
            .and_then(|()| match self.inner {
                None => f.write_str("EMPTY"),
                Some(inner) => <[u8] as fmt::Debug>::fmt(inner, f)
            })
            .and_then(|()| f.write_str(")"))
    }
}

impl<'a> PartialEq<[u8]> for AadSlice<'a> {
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        self.inner.is_some_and(|inner| inner == other)
    }
}

impl<'s> AadSlice<'s> {
    /// An empty AAD.
    pub const EMPTY: Self = Self { inner: None };

    /// Create a new AAD instance from a byte slice.
    pub const fn new(aad: &'s [u8]) -> Self {
        Self { inner: Some(aad) }
    }

    #[inline(always)]
    #[must_use]
    pub const fn size(&self) -> Option<u32> {
        match self.inner {
            None => Some(0),
            Some(val) => to_u32(val.len())
        }
    }

    #[inline]
    #[must_use]
    pub const fn valid_size(&self) -> bool {
        match self.inner {
            Some(inner) => can_cast_u32(inner.len()),
            None => true
        }
    }
}

impl<'a> From<&'a [u8]> for AadSlice<'a> {
    #[inline]
    fn from(value: &'a [u8]) -> Self {
        Self::new(value)
    }
}

impl<'a> Sealed for AadSlice<'a> {}

impl<'a> Aad for AadSlice<'a> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.inner.unwrap_or_default()
    }
}

impl<T: ?Sized + Sealed> Sealed for &T {}
impl<T: ?Sized + Aad> Aad for &T {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        T::as_bytes(self)
    }
}

impl<T: ?Sized + Sealed> Sealed for &mut T {}
impl<T: ?Sized + Aad> Aad for &mut T {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        T::as_bytes(self)
    }
}

impl Sealed for [u8] {}
impl Aad for [u8] {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl<const C: usize> Sealed for [u8; C] {}
impl<const C: usize> Aad for [u8; C] {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Sealed for str {}
impl Aad for str {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }
}

impl Sealed for () {}
impl Aad for () {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &[]
    }
}

impl<T: Sealed> Sealed for Option<T> {}
impl<T: Aad> Aad for Option<T> {
    #[inline]
    fn as_bytes(&self) -> &[u8] {
        match self {
            None => &[],
            Some(inner) => inner.as_bytes()
        }
    }
}

alloc! {
    impl Sealed for alloc::vec::Vec<u8> {}
    impl Aad for alloc::vec::Vec<u8> {
        #[inline]
        fn as_bytes(&self) -> &[u8] {
            self.as_slice()
        }
    }

    impl Sealed for alloc::string::String {}
    impl Aad for alloc::string::String {
        #[inline]
        fn as_bytes(&self) -> &[u8] {
            self.as_str().as_bytes()
        }
    }
}
