//! The `Poly1305` one-time authenticator (RFC 8439).
//!
//! The streaming APIs follow the ChaCha20-Poly1305 layout: the message is zero padded to a
//! multiple of 16 bytes and followed by the little-endian lengths of the (empty) additional data
//! and the message. [`Poly1305::mac`] authenticates a message and additional data in the same
//! layout, [`Poly1305::mac_raw`] is the bare RFC 8439 section 2.5 function.

mod key;
mod engine;
pub mod state;

pub use key::{GenericKey, Key, KeyRef, KEY_SIZE};
pub(crate) use engine::Engine;

use state::{Poly1305State, Init, Ready, Streaming};
use crate::opaque_res::Res;
use crate::{can_cast_u32, ct, Unspecified};
use core::marker::PhantomData;
use crate::aead::Tag;

/// The `Poly1305` Message Authentication Code (MAC)
///
/// # Example
///
/// ```
/// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
///
/// let key: Key = [7u8; 32].into();
///
/// let tag = Poly1305::new(key.as_ref())
///     .update_ct(b"hello world")
///     .update_ct(b", how are you")
///     .finalize()
///     .unwrap();
///
/// let o_tag = Poly1305::new(key.as_ref())
///     .mac(b"hello world, how are you", b"")
///     .unwrap();
///
/// assert_eq!(tag, o_tag);
/// ```
pub struct Poly1305<State: Poly1305State = Init> {
    inner: Engine,
    _state: PhantomData<State>
}

impl<State: Poly1305State> From<Poly1305<State>> for Unspecified {
    #[inline]
    fn from(value: Poly1305<State>) -> Self {
        drop(value);
        Unspecified
    }
}

opaque_dbg! { Poly1305 }

impl Poly1305<Init> {
    /// Creates a new `Poly1305` instance with the provided key.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::mac::{Poly1305, poly1305::Key};
    ///
    /// let key: Key = [0u8; 32].into();
    /// let poly = Poly1305::new(key.as_ref());
    /// ```
    pub fn new<K: GenericKey>(key: K) -> Poly1305<Ready> {
        Poly1305::<Ready> {
            inner: Engine::new(key.bytes()),
            _state: PhantomData
        }
    }
}

impl<State: Poly1305State> Poly1305<State> {
    #[inline]
    fn with_state<N: Poly1305State>(self) -> Poly1305<N> {
        Poly1305 { inner: self.inner, _state: PhantomData }
    }
}

impl Poly1305<Ready> {
    /// Computes the MAC over `additional` and `input` in the AEAD layout.
    ///
    /// # Errors
    ///
    /// If the length of `input` or `additional` is greater than [`u32::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
    ///
    /// let key: Key = [0u8; 32].into();
    /// let tag = Poly1305::new(key.as_ref())
    ///     .mac(b"message", b"aad")
    ///     .unwrap();
    /// ```
    pub fn mac(mut self, input: &[u8], additional: &[u8]) -> Result<Tag, Unspecified> {
        if !(can_cast_u32(input.len()) && can_cast_u32(additional.len())) {
            return Err(Unspecified)
        }

        self.inner.update(additional);
        self.inner.pad(additional.len() as u64);
        self.inner.update(input);
        self.inner.pad(input.len() as u64);
        self.inner.encode_sizes(additional.len() as u64, input.len() as u64);

        Ok(finish(self.inner))
    }

    /// The plain Poly1305 function of RFC 8439 section 2.5, with no padding or length block.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::mac::{Poly1305, poly1305::Key};
    ///
    /// let key: Key = [9u8; 32].into();
    /// let tag = Poly1305::new(key.as_ref()).mac_raw(b"Cryptographic Forum Research Group");
    /// assert_eq!(tag.len(), 16);
    /// ```
    pub fn mac_raw(mut self, input: &[u8]) -> Tag {
        self.inner.update(input);
        finish(self.inner)
    }

    /// Updates the `Poly1305` instance with additional input, transitioning it to a streaming
    /// state.
    ///
    /// # Errors
    ///
    /// If the length of `input` is greater than [`u32::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
    ///
    /// # fn main() -> Result<(), wolf_core::Unspecified> {
    /// let key: Key = [0u8; 32].into();
    /// let stream = Poly1305::new(key.as_ref())
    ///     .update(b"chunk1")?
    ///     .update(b"chunk2")?;
    /// # Ok(()) }
    /// ```
    #[inline]
    pub fn update(mut self, input: &[u8]) -> Result<StreamPoly1305, Unspecified> {
        if !can_cast_u32(input.len()) { return Err(Unspecified) }
        self.inner.update(input);
        Ok(StreamPoly1305::from_parts(self.with_state(), input.len() as u32))
    }

    /// Updates the `Poly1305` instance without branching on the validity of `input`.
    ///
    /// Errors are accumulated and reported by [`CtPoly1305::finalize`].
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
    ///
    /// let key: Key = [0u8; 32].into();
    /// let ct_poly = Poly1305::new(key.as_ref())
    ///     .update_ct(b"sensitive ")
    ///     .update_ct(b"chunks")
    ///     .finalize()
    ///     .unwrap();
    /// ```
    pub fn update_ct(mut self, input: &[u8]) -> CtPoly1305 {
        let (adjusted, res) = CtPoly1305::adjust_slice(input);
        self.inner.update(adjusted);
        CtPoly1305::from_parts(self.with_state(), res, adjusted.len() as u32)
    }
}

#[inline]
fn finish(engine: Engine) -> Tag {
    let mut tag = Tag::new_zeroed();
    engine.finalize(tag.as_mut_array());
    tag
}

#[inline]
fn finalize_streaming(mut engine: Engine, accum_len: u32) -> Tag {
    engine.pad(u64::from(accum_len));
    engine.encode_sizes(0, u64::from(accum_len));
    finish(engine)
}

/// Represents an ongoing streaming MAC computation, allowing incremental updates.
///
/// # Example
///
/// ```
/// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
///
/// # fn main() -> Result<(), wolf_core::Unspecified> {
/// let key: Key = [0u8; 32].into();
/// let stream = Poly1305::new(key.as_ref())
///     .update(b"chunk1")?
///     .update(b"chunk2")?
///     .update(b"chunk3")?;
///
/// let tag = stream.finalize();
/// # Ok(()) }
/// ```
pub struct StreamPoly1305 {
    poly1305: Poly1305<Streaming>,
    accum_len: u32
}

impl From<StreamPoly1305> for Unspecified {
    #[inline]
    fn from(value: StreamPoly1305) -> Self {
        value.poly1305.into()
    }
}

opaque_dbg! { StreamPoly1305 }

impl StreamPoly1305 {
    const fn from_parts(poly1305: Poly1305<Streaming>, accum_len: u32) -> Self {
        Self { poly1305, accum_len }
    }

    /// Updates the streaming MAC computation with additional input.
    ///
    /// # Errors
    ///
    /// If the length of `input` is greater than [`u32::MAX`], or the total length would
    /// overflow a `u32`. The untouched stream is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
    ///
    /// # fn main() -> Result<(), wolf_core::Unspecified> {
    /// let key: Key = [0u8; 32].into();
    ///
    /// let tag = Poly1305::new(key.as_ref())
    ///     .update(b"chunk1")?
    ///     .update(b"chunk2")?
    ///     .update(b"chunk3")?
    ///     .finalize();
    /// # Ok(()) }
    /// ```
    pub fn update(mut self, input: &[u8]) -> Result<Self, Self> {
        if !can_cast_u32(input.len()) { return Err(self) };
        let (accum_len, res) = ct::add_no_wrap(self.accum_len, input.len() as u32);
        if res.is_err() { return Err(self) }

        self.poly1305.inner.update(input);
        self.accum_len = accum_len;
        Ok(self)
    }

    /// Finalizes the streaming MAC computation and returns the resulting `Tag`.
    pub fn finalize(self) -> Tag {
        finalize_streaming(self.poly1305.inner, self.accum_len)
    }
}

/// A streaming computation which never branches on the validity of its input, errors are
/// accumulated and surface in [`finalize`](Self::finalize).
///
/// # Example
///
/// ```
/// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
///
/// let key: Key = [0u8; 32].into();
/// let ct_poly = Poly1305::new(key.as_ref())
///     .update_ct(b"constant time ")
///     .update_ct(b"chunk")
///     .finalize()
///     .unwrap();
/// ```
#[must_use]
pub struct CtPoly1305 {
    poly1305: Poly1305<Streaming>,
    result: Res,
    accum_len: u32
}

opaque_dbg! { CtPoly1305 }

impl CtPoly1305 {
    const fn from_parts(poly1305: Poly1305<Streaming>, result: Res, accum_len: u32) -> Self {
        Self { poly1305, result, accum_len }
    }

    #[inline(always)]
    fn incr_accum(&mut self, len: u32) -> Res {
        let (accum_len, res) = ct::add_no_wrap(self.accum_len, len);
        self.accum_len = accum_len;
        res
    }

    #[inline(always)]
    const fn slice_len_mask(len: usize) -> usize {
        (can_cast_u32(len) as usize).wrapping_neg()
    }

    /// An over long slice becomes empty, and the returned `Res` records the failure.
    #[inline(always)]
    fn adjust_slice(slice: &[u8]) -> (&[u8], Res) {
        let mask = Self::slice_len_mask(slice.len());
        (&slice[..(slice.len() & mask)], Res::from(mask != 0))
    }

    /// Adds more data to the computation.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{mac::{Poly1305, poly1305::Key}, aead::Tag};
    ///
    /// let key: Key = [0u8; 32].into();
    /// let ct_poly = Poly1305::new(key.as_ref())
    ///     .update_ct(b"chunk1")
    ///     .update_ct(b"chunk2")
    ///     .finalize()
    ///     .unwrap();
    /// ```
    pub fn update_ct(mut self, input: &[u8]) -> Self {
        let (adjusted, mut res) = Self::adjust_slice(input);
        let incr = self.incr_accum(adjusted.len() as u32);
        res.ensure(incr);

        // on overflow the accumulator was left as is, so the data must not be absorbed either
        let absorbed = &adjusted[..adjusted.len() & (res.is_ok() as usize).wrapping_neg()];
        self.poly1305.inner.update(absorbed);

        self.result.ensure(res);
        self
    }

    /// Finalizes the computation and returns the resulting `Tag`.
    ///
    /// # Errors
    ///
    /// If any update was given more than [`u32::MAX`] bytes, or the total length overflowed a
    /// `u32`.
    pub fn finalize(self) -> Result<Tag, Unspecified> {
        let tag = finalize_streaming(self.poly1305.inner, self.accum_len);
        self.result.unit_err(tag)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use poly1305::universal_hash::{KeyInit, UniversalHash};
    use proptest::prelude::*;

    fn padded(aad: &[u8], msg: &[u8]) -> Vec<u8> {
        let mut out = aad.to_vec();
        out.resize(aad.len().next_multiple_of(16), 0);
        out.extend_from_slice(msg);
        out.resize(out.len().next_multiple_of(16), 0);
        out.extend_from_slice(&(aad.len() as u64).to_le_bytes());
        out.extend_from_slice(&(msg.len() as u64).to_le_bytes());
        out
    }

    proptest! {
        #[test]
        fn raw_eq_rust_crypto(key in any::<Key>(), msg in any::<Vec<u8>>()) {
            let ours = Poly1305::new(key.as_ref()).mac_raw(&msg);
            let theirs = poly1305::Poly1305::new(key.bytes().into()).compute_unpadded(&msg);
            prop_assert_eq!(ours.as_slice(), theirs.as_slice());
        }

        #[test]
        fn aead_layout_eq_rust_crypto(
            key in any::<Key>(),
            msg in any::<Vec<u8>>(),
            aad in any::<Vec<u8>>()
        ) {
            let ours = Poly1305::new(key.as_ref()).mac(&msg, &aad).unwrap();
            let theirs = poly1305::Poly1305::new(key.bytes().into())
                .compute_unpadded(&padded(&aad, &msg));
            prop_assert_eq!(ours.as_slice(), theirs.as_slice());
        }

        #[test]
        fn ct_and_checked_agree(key in any::<Key>(), a in any::<Vec<u8>>(), b in any::<Vec<u8>>()) {
            let ct = Poly1305::new(key.as_ref()).update_ct(&a).update_ct(&b).finalize().unwrap();
            let checked = Poly1305::new(key.as_ref())
                .update(&a).unwrap()
                .update(&b).unwrap()
                .finalize();
            prop_assert_eq!(ct, checked);
        }
    }
}
