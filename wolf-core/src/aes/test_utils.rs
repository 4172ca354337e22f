//! Inline, `Copy` input generators for the property tests.
use core::{fmt, ops};
use proptest::arbitrary::{any, Arbitrary};
use proptest::{array, prop_oneof};
use proptest::strategy::{BoxedStrategy, Strategy};
use crate::aead::SivKey;
use crate::aes::{Key, XtsKey};

/// Up to `C` bytes of message, nonce or AAD.
#[derive(Clone, Copy)]
pub struct BoundList<const C: usize> {
    inner: [u8; C],
    len: usize
}

impl<const C: usize> fmt::Debug for BoundList<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if C <= 64 {
            write!(f, "BoundList({:02x?})", self.as_slice())
        } else {
            write!(f, "BoundList {{ len: {} }}", self.len)
        }
    }
}

impl<const C: usize> BoundList<C> {
    /// `len` zero bytes, the output buffer for an input of that length.
    #[track_caller]
    pub fn new_zeroes(len: usize) -> Self {
        assert!(len <= C, "{len} exceeds the capacity of {C}");
        Self { inner: [0u8; C], len }
    }

    /// A zeroed list as long as `self`.
    #[inline]
    pub const fn create_self(&self) -> Self {
        Self { inner: [0u8; C], len: self.len }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.inner[..self.len]
    }

    /// Lists whose length lies within `range`, for modes with a minimum input.
    pub fn with_len(range: ops::RangeInclusive<usize>) -> BoxedStrategy<Self> {
        debug_assert!(*range.end() <= C);
        (range, array::uniform::<_, C>(any::<u8>()))
            .prop_map(|(len, inner)| Self { inner, len })
            .boxed()
    }
}

impl<const C: usize> PartialEq for BoundList<C> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const C: usize> ops::Deref for BoundList<C> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<const C: usize> ops::DerefMut for BoundList<C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<const C: usize> Arbitrary for BoundList<C> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        Self::with_len(0..=C)
    }
}

/// Up to `N` update calls of at most `B` bytes each.
#[derive(Clone, Copy)]
pub struct Pieces<const N: usize, const B: usize> {
    inner: [BoundList<B>; N],
    len: usize
}

impl<const N: usize, const B: usize> fmt::Debug for Pieces<N, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_slice().iter().map(|p| p.len())).finish()
    }
}

impl<const N: usize, const B: usize> Pieces<N, B> {
    #[inline]
    pub fn as_slice(&self) -> &[BoundList<B>] {
        &self.inner[..self.len]
    }

    /// The pieces concatenated, the message a single update would see.
    pub fn join(&self) -> Vec<u8> {
        self.as_slice().iter().flat_map(|p| p.as_slice()).copied().collect()
    }
}

impl<const N: usize, const B: usize> Arbitrary for Pieces<N, B> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (0..=N, array::uniform::<_, N>(any::<BoundList<B>>()))
            .prop_map(|(len, inner)| Self { inner, len })
            .boxed()
    }
}

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any::<[u8; 32]>().prop_map(Key::Aes256),
            any::<[u8; 24]>().prop_map(Key::Aes192),
            any::<[u8; 16]>().prop_map(Key::Aes128)
        ].boxed()
    }
}

impl Arbitrary for XtsKey {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any::<[u8; 32]>().prop_map(XtsKey::Aes128),
            any::<[u8; 64]>().prop_map(XtsKey::Aes256)
        ].boxed()
    }
}

impl Arbitrary for SivKey {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any::<[u8; 32]>().prop_map(SivKey::Aes128),
            any::<[u8; 48]>().prop_map(SivKey::Aes192),
            any::<[u8; 64]>().prop_map(SivKey::Aes256)
        ].boxed()
    }
}
