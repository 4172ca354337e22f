//! `ChaCha20` key material, 128 or 256 bits.
use crate::sealed::KeySealed;
use crate::Error;
use zeroize::Zeroize;
use core::fmt;

/// Anything usable as a `ChaCha20` key: [`Key`], [`KeyRef`], or a reference to a 16 or 32 byte
/// array.
pub trait GenericKey : KeySealed {
    #[doc(hidden)]
    fn slice(&self) -> &[u8];
}

/// An owned `ChaCha20` key, zeroed on drop.
#[must_use]
pub enum Key {
    B128([u8; 16]),
    B256([u8; 32])
}

/// A borrowed `ChaCha20` key.
#[must_use]
#[derive(Copy, Clone)]
pub enum KeyRef<'r> {
    B128(&'r [u8; 16]),
    B256(&'r [u8; 32])
}

macro_rules! key_common {
    ($ident:ident $(<$lt:lifetime>)?) => {
        impl $(<$lt>)? $ident $(<$lt>)? {
            /// The key length in bytes.
            #[inline]
            #[allow(clippy::len_without_is_empty)]
            pub const fn len(&self) -> usize {
                match self {
                    Self::B256(_) => 32,
                    Self::B128(_) => 16
                }
            }

            #[inline]
            pub const fn as_slice(&self) -> &[u8] {
                match self {
                    Self::B256(array) => array.as_slice(),
                    Self::B128(array) => array.as_slice()
                }
            }
        }

        impl $(<$lt>)? fmt::Debug for $ident $(<$lt>)? {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    Self::B256(_) => f.write_str(concat!(stringify!($ident), "::256")),
                    Self::B128(_) => f.write_str(concat!(stringify!($ident), "::128"))
                }
            }
        }

        impl $(<$lt>)? KeySealed for $ident $(<$lt>)? {}

        impl $(<$lt>)? GenericKey for $ident $(<$lt>)? {
            #[inline]
            fn slice(&self) -> &[u8] {
                self.as_slice()
            }
        }
    };
}

key_common! { Key }
key_common! { KeyRef<'r> }

impl Key {
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::B256(array) => array.as_mut_slice(),
            Self::B128(array) => array.as_mut_slice()
        }
    }

    #[inline]
    pub const fn as_ref(&self) -> KeyRef {
        match self {
            Self::B128(raw) => KeyRef::B128(raw),
            Self::B256(raw) => KeyRef::B256(raw)
        }
    }
}

impl Zeroize for Key {
    #[inline]
    fn zeroize(&mut self) {
        self.as_mut_slice().zeroize();
    }
}

impl Drop for Key {
    #[inline]
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl From<[u8; 16]> for Key {
    #[inline]
    fn from(value: [u8; 16]) -> Self {
        Self::B128(value)
    }
}

impl From<[u8; 32]> for Key {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self::B256(value)
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = Error;

    /// # Errors
    ///
    /// [`Error::KeySize`] unless `value` is 16 or 32 bytes.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if let Ok(raw) = <[u8; 32]>::try_from(value) {
            Ok(Self::B256(raw))
        } else if let Ok(raw) = <[u8; 16]>::try_from(value) {
            Ok(Self::B128(raw))
        } else {
            Err(Error::KeySize)
        }
    }
}

impl<'r> From<&'r [u8; 16]> for KeyRef<'r> {
    #[inline]
    fn from(value: &'r [u8; 16]) -> Self {
        Self::B128(value)
    }
}

impl<'r> From<&'r [u8; 32]> for KeyRef<'r> {
    #[inline]
    fn from(value: &'r [u8; 32]) -> Self {
        Self::B256(value)
    }
}

impl<'r> KeySealed for &'r [u8; 16] {}
impl<'r> GenericKey for &'r [u8; 16] {
    #[inline]
    fn slice(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<'r> KeySealed for &'r [u8; 32] {}
impl<'r> GenericKey for &'r [u8; 32] {
    #[inline]
    fn slice(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Key {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;
        prop_oneof![
            any::<[u8; 32]>().prop_map(Key::B256),
            any::<[u8; 16]>().prop_map(Key::B128)
        ].boxed()
    }

    type Strategy = proptest::strategy::BoxedStrategy<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice() {
        assert_eq!(Key::try_from([1u8; 16].as_slice()).map(|k| k.len()), Ok(16));
        assert_eq!(Key::try_from([1u8; 32].as_slice()).map(|k| k.len()), Ok(32));
        assert!(matches!(Key::try_from([1u8; 24].as_slice()), Err(Error::KeySize)));
    }

    #[test]
    fn debug_hides_material() {
        let key = Key::B256([0xaa; 32]);
        assert_eq!(std::format!("{key:?}"), "Key::256");
        assert_eq!(std::format!("{:?}", key.as_ref()), "KeyRef::256");
    }
}
