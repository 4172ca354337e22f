//! Streaming AES-GCM (`wc_AesGcmEncryptInit` / `Update` / `Final` and the decrypt
//! counterparts).
//!
//! [`AesGcmStream`] is a type-state machine. AAD may arrive in any number of pieces, but only
//! before the first byte of data, and one instance only ever runs in one direction.
pub mod states;

use states::{State, Init, Direction, Active, Absorbing, EncryptAad, DecryptAad};

#[doc(inline)]
pub use states::{Encrypt, Decrypt};

use core::marker::PhantomData;
use crate::aead::aes_gcm::{MAX_INPUT, MIN_TAG_LEN};
use crate::aead::{Aad, Tag};
use crate::aes::{gcm::GcmStream, Key};
use crate::Error;

opaque_dbg! { AesGcmStream<Init> }
opaque_dbg! { AesGcmStream<EncryptAad> }
opaque_dbg! { AesGcmStream<DecryptAad> }
opaque_dbg! { AesGcmStream<Encrypt> }
opaque_dbg! { AesGcmStream<Decrypt> }

/// Incremental AES-GCM over a single IV.
///
/// # Warning
///
/// When decrypting, plaintext is released before the tag is checked. Do not act on it until
/// [`verify`](AesGcmStream::verify) succeeds.
///
/// # Example
///
/// ```
/// use wolf_core::aead::{AesGcm, AesGcmStream};
/// use wolf_core::aead::gcm_stream::{Encrypt, Decrypt};
/// use wolf_core::aes::Key;
///
/// let key = Key::Aes256([9u8; 32]);
/// let iv = [4u8; 12];
/// let mut data = *b"a file read in chunks";
///
/// let tag = AesGcmStream::new::<Encrypt>(&key, &iv).unwrap()
///     .update_aad("label").unwrap()
///     .update_in_place(&mut data[..7]).unwrap()
///     .update_in_place(&mut data[7..]).unwrap()
///     .finalize();
///
/// // the stream and the one-shot form agree
/// let mut oneshot = [0u8; 21];
/// let expected = AesGcm::new(&key).encrypt(&iv, b"a file read in chunks", &mut oneshot, "label");
/// assert_eq!(expected, Ok(tag));
/// assert_eq!(oneshot, data);
///
/// assert!(AesGcmStream::new::<Decrypt>(&key, &iv).unwrap()
///     .update_aad("label").unwrap()
///     .update_in_place(&mut data).unwrap()
///     .verify(&tag)
///     .is_ok());
/// assert_eq!(&data, b"a file read in chunks");
/// ```
#[must_use]
pub struct AesGcmStream<S: State = Init> {
    core: GcmStream,
    _state: PhantomData<S>
}

impl AesGcmStream<Init> {
    /// Key a new stream in the direction `D` ([`Encrypt`] or [`Decrypt`]).
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if `iv` is empty.
    pub fn new<D: Direction>(key: &Key, iv: &[u8]) -> Result<AesGcmStream<D::Aad>, Error> {
        if iv.is_empty() {
            return Err(Error::BadFuncArg);
        }
        Ok(AesGcmStream { core: GcmStream::new(key, iv), _state: PhantomData })
    }
}

impl<S: State> AesGcmStream<S> {
    #[inline]
    fn with_state<N: State>(self) -> AesGcmStream<N> {
        AesGcmStream { core: self.core, _state: PhantomData }
    }
}

impl<S: Absorbing> AesGcmStream<S> {
    /// Absorb a piece of AAD.
    ///
    /// # Errors
    ///
    /// The total AAD would exceed [`u32::MAX`] bytes, the stream is handed back.
    pub fn update_aad<A: Aad>(mut self, aad: A) -> Result<Self, Self> {
        let aad = aad.as_bytes();
        match self.core.aad_len().checked_add(aad.len() as u64) {
            Some(total) if total <= u64::from(u32::MAX) => {
                self.core.aad(aad);
                Ok(self)
            },
            _ => Err(self)
        }
    }
}

impl<S: Active> AesGcmStream<S> {
    #[inline]
    fn admit(&self, len: usize) -> bool {
        self.core.data_len()
            .checked_add(len as u64)
            .is_some_and(|total| total <= MAX_INPUT)
    }

    #[inline]
    fn process(&mut self, data: &mut [u8]) {
        if <S::Mode as Direction>::ENCRYPT {
            self.core.encrypt(data);
        } else {
            self.core.decrypt(data);
        }
    }

    /// Encrypt or decrypt `data` in place, closing the AAD on first use.
    ///
    /// # Errors
    ///
    /// The total data would exceed the GCM limit for one IV, the stream is handed back.
    pub fn update_in_place(mut self, data: &mut [u8]) -> Result<AesGcmStream<S::Mode>, Self> {
        if !self.admit(data.len()) { return Err(self) }
        self.process(data);
        Ok(self.with_state())
    }

    /// Encrypt or decrypt `data` into the leading bytes of `output`.
    ///
    /// # Errors
    ///
    /// `output` is shorter than `data`, or the total data would exceed the GCM limit for one
    /// IV. The stream is handed back and `output` is untouched.
    pub fn update(mut self, data: &[u8], output: &mut [u8]) -> Result<AesGcmStream<S::Mode>, Self> {
        if output.len() < data.len() || !self.admit(data.len()) { return Err(self) }
        let out = &mut output[..data.len()];
        out.copy_from_slice(data);
        self.process(out);
        Ok(self.with_state())
    }
}

impl<S: Active<Mode = Encrypt>> AesGcmStream<S> {
    /// Compute the full 16 byte tag (`wc_AesGcmEncryptFinal`).
    pub fn finalize(mut self) -> Tag {
        Tag::new(self.core.finish())
    }

    /// Compute the tag truncated to `tag_len` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] unless `4 <= tag_len <= 16`.
    pub fn finalize_with_tag_len(self, tag_len: usize) -> Result<Tag, Error> {
        if !(MIN_TAG_LEN..=Tag::CAPACITY).contains(&tag_len) {
            return Err(Error::BadFuncArg);
        }
        let mut tag = self.finalize();
        tag.truncate(tag_len);
        Ok(tag)
    }
}

impl<S: Active<Mode = Decrypt>> AesGcmStream<S> {
    /// Compare the computed tag against `tag` in constant time (`wc_AesGcmDecryptFinal`).
    ///
    /// A truncated tag is verified over its own length.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `tag` is shorter than 4 bytes.
    /// - [`Error::AesGcmAuth`] if the tags differ.
    pub fn verify(mut self, tag: &Tag) -> Result<(), Error> {
        if tag.len() < MIN_TAG_LEN {
            return Err(Error::BadFuncArg);
        }

        if tag.matches_prefix(&self.core.finish()) {
            Ok(())
        } else {
            log_warn!(
                aad_len = self.core.aad_len(), data_len = self.core.data_len(),
                tag_len = tag.len(), "AES-GCM stream authentication failed"
            );
            Err(Error::AesGcmAuth)
        }
    }
}


#[cfg(all(test, not(miri)))]
mod property_tests {
    use super::*;
    use crate::aead::AesGcm;
    use crate::aes::test_utils::BoundList;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2_000))]

        #[test]
        fn pieces_match_oneshot(
            key in any::<Key>(),
            iv in BoundList::<32>::with_len(1..=32),
            aad in any::<BoundList<48>>(),
            input in any::<BoundList<256>>(),
            aad_split in any::<prop::sample::Index>(),
            split in any::<prop::sample::Index>()
        ) {
            let mut expected = input;
            let tag = AesGcm::new(&key)
                .encrypt_in_place(iv.as_slice(), expected.as_mut_slice(), aad.as_slice())
                .unwrap();

            let a = aad_split.index(aad.len() + 1);
            let d = split.index(input.len() + 1);
            let mut buf = input;
            let (head, tail) = buf.as_mut_slice().split_at_mut(d);

            let ours = AesGcmStream::new::<Encrypt>(&key, iv.as_slice()).unwrap()
                .update_aad(&aad.as_slice()[..a]).unwrap()
                .update_aad(&aad.as_slice()[a..]).unwrap()
                .update_in_place(head).unwrap()
                .update_in_place(tail).unwrap()
                .finalize();

            prop_assert_eq!(ours, tag);
            prop_assert_eq!(buf.as_slice(), expected.as_slice());

            let (head, tail) = buf.as_mut_slice().split_at_mut(d);
            let res = AesGcmStream::new::<Decrypt>(&key, iv.as_slice()).unwrap()
                .update_aad(aad.as_slice()).unwrap()
                .update_in_place(head).unwrap()
                .update_in_place(tail).unwrap()
                .verify(&tag);
            prop_assert!(res.is_ok());
            prop_assert_eq!(buf, input);
        }
    }
}
