//! `ChaCha20-Poly1305` (RFC 8439 §2.8)
//!
//! The one-shot [`encrypt`] / [`decrypt`] functions (and their in-place variants) cover most
//! needs. [`ChaCha20Poly1305`] is the streaming form, a type-state machine which only permits
//! AAD before the first byte of data, and only one direction per instance.
pub mod states;

use states::{
    State, Init, CanUpdate, CanSetAad, CanUpdateAad,
    Updating, UpdatingAad,

    EncryptMaybeAad, DecryptMaybeAad,
    EncryptAad, DecryptAad,
};

#[doc(inline)]
pub use states::{Decrypt, Encrypt};

use core::marker::PhantomData;
use zeroize::Zeroize;
use crate::aead::{Aad, Tag};
use crate::buf::{GenericIv, U12};
use crate::chacha::block::{Core, BLOCK_LEN};
use crate::mac::poly1305::{GenericKey, Engine};
use crate::{ct, Error};

opaque_dbg! { ChaCha20Poly1305<Init> }
opaque_dbg! { ChaCha20Poly1305<EncryptMaybeAad> }
opaque_dbg! { ChaCha20Poly1305<DecryptMaybeAad> }
opaque_dbg! { ChaCha20Poly1305<EncryptAad> }
opaque_dbg! { ChaCha20Poly1305<DecryptAad> }
opaque_dbg! { ChaCha20Poly1305<Encrypt> }
opaque_dbg! { ChaCha20Poly1305<Decrypt> }

/// The most data one key / nonce pair can process, 2^32 - 1 blocks of 64 bytes.
const MAX_DATA: u64 = ((1 << 32) - 1) * BLOCK_LEN as u64;

/// Key the cipher and derive the one-time Poly1305 key from block 0.
fn keyed(key: &[u8; 32], iv: &[u8]) -> (Core, Engine) {
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(iv);

    let mut cipher = Core::new(key);
    cipher.set_iv(&nonce, 0);

    let mut block0 = [0u8; BLOCK_LEN];
    cipher.block(&mut block0);

    let mut poly_key = [0u8; 32];
    poly_key.copy_from_slice(&block0[..32]);
    let poly = Engine::new(&poly_key);

    block0.zeroize();
    poly_key.zeroize();
    (cipher, poly)
}

fn compute_tag(mut poly: Engine, aad_len: usize, data_len: usize) -> Tag {
    poly.pad(data_len as u64);
    poly.encode_sizes(aad_len as u64, data_len as u64);
    let mut tag = Tag::new_zeroed();
    poly.finalize(tag.as_mut_array());
    tag
}

#[inline]
fn check_oneshot<A: Aad>(in_len: usize, out_len: usize, aad: &A) -> Result<(), Error> {
    if in_len as u64 > MAX_DATA || !aad.is_valid_size() {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

fn seal<K: GenericKey, IV: GenericIv<Size = U12>>(key: K, iv: IV, buf: &mut [u8], aad: &[u8]) -> Tag {
    let (mut cipher, mut poly) = keyed(key.bytes(), iv.as_slice());
    poly.update(aad);
    poly.pad(aad.len() as u64);

    cipher.apply(buf);
    poly.update(buf);

    compute_tag(poly, aad.len(), buf.len())
}

fn open<K: GenericKey, IV: GenericIv<Size = U12>>(
    key: K, iv: IV, buf: &mut [u8], aad: &[u8], tag: &Tag
) -> Result<(), Error> {
    if tag.len() != Tag::CAPACITY {
        return Err(Error::BadFuncArg);
    }

    let (mut cipher, mut poly) = keyed(key.bytes(), iv.as_slice());
    poly.update(aad);
    poly.pad(aad.len() as u64);
    poly.update(buf);

    let ok = compute_tag(poly, aad.len(), buf.len()) == *tag;
    cipher.apply(buf);
    ct::zero_unless(u8::from(ok), buf);

    if ok {
        Ok(())
    } else {
        log_warn!(
            input_len = buf.len(), aad_len = aad.len(),
            "ChaCha20-Poly1305 authentication failed"
        );
        Err(Error::MacCmpFailed)
    }
}

/// Encrypt `plain` into `out` (`wc_ChaCha20Poly1305_Encrypt`).
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `plain` exceeds the 256 GiB limit of a single nonce, or the AAD's
///   length is greater than [`u32::MAX`].
/// - [`Error::Buffer`] if `out` is shorter than `plain`.
///
/// # Example
///
/// ```
/// use wolf_core::aead::chacha20_poly1305::{encrypt, decrypt};
/// use wolf_core::mac::poly1305::Key;
///
/// let key = Key::new([7u8; 32]);
/// let mut cipher = [0u8; 5];
/// let tag = encrypt(key.as_ref(), [1u8; 12], b"hello", &mut cipher, "aad").unwrap();
///
/// let mut plain = [0u8; 5];
/// decrypt(key.as_ref(), [1u8; 12], &cipher, &mut plain, "aad", tag).unwrap();
/// assert_eq!(&plain, b"hello");
/// ```
pub fn encrypt<K, IV, A>(
    key: K, iv: IV,
    plain: &[u8], out: &mut [u8],
    aad: A
) -> Result<Tag, Error>
    where
        K: GenericKey,
        IV: GenericIv<Size = U12>,
        A: Aad
{
    check_oneshot(plain.len(), out.len(), &aad)?;
    let out = &mut out[..plain.len()];
    out.copy_from_slice(plain);
    Ok(seal(key, iv, out, aad.as_bytes()))
}

/// Encrypt `in_out` in place.
///
/// # Errors
///
/// As [`encrypt`], minus the buffer check.
pub fn encrypt_in_place<K, IV, A>(key: K, iv: IV, in_out: &mut [u8], aad: A) -> Result<Tag, Error>
    where
        K: GenericKey,
        IV: GenericIv<Size = U12>,
        A: Aad
{
    check_oneshot(in_out.len(), in_out.len(), &aad)?;
    Ok(seal(key, iv, in_out, aad.as_bytes()))
}

/// Decrypt `cipher` into `out` and verify `tag` (`wc_ChaCha20Poly1305_Decrypt`).
///
/// # Errors
///
/// - [`Error::BadFuncArg`] for the argument errors of [`encrypt`], or a truncated tag.
/// - [`Error::Buffer`] if `out` is shorter than `cipher`.
/// - [`Error::MacCmpFailed`] if the tag does not match, the written output is zeroed.
pub fn decrypt<K, IV, A>(
    key: K, iv: IV,
    cipher: &[u8], out: &mut [u8],
    aad: A, tag: Tag
) -> Result<(), Error>
    where
        K: GenericKey,
        IV: GenericIv<Size = U12>,
        A: Aad
{
    check_oneshot(cipher.len(), out.len(), &aad)?;
    let out = &mut out[..cipher.len()];
    out.copy_from_slice(cipher);
    open(key, iv, out, aad.as_bytes(), &tag)
}

/// Decrypt `in_out` in place and verify `tag`.
///
/// # Errors
///
/// As [`decrypt`], `in_out` is zeroed on authentication failure.
pub fn decrypt_in_place<K, IV, A>(
    key: K, iv: IV,
    in_out: &mut [u8],
    aad: A, tag: Tag
) -> Result<(), Error>
where
    K: GenericKey,
    IV: GenericIv<Size = U12>,
    A: Aad
{
    check_oneshot(in_out.len(), in_out.len(), &aad)?;
    open(key, iv, in_out, aad.as_bytes(), &tag)
}

/// Streaming `ChaCha20-Poly1305` (`wc_ChaCha20Poly1305_Init` / `UpdateAad` / `UpdateData` /
/// `Final`).
///
/// # Warning
///
/// When decrypting in pieces, plaintext is released before the tag is checked. Do not act on
/// it until [`verify`](ChaCha20Poly1305::verify) succeeds.
///
/// # Example
///
/// ```
/// use wolf_core::aead::chacha20_poly1305::{ChaCha20Poly1305, Encrypt, Decrypt};
/// use wolf_core::mac::poly1305::Key;
///
/// let key = Key::new([7u8; 32]);
/// let mut data = *b"hello world";
///
/// let tag = ChaCha20Poly1305::new::<Encrypt>(key.as_ref(), [0u8; 12])
///     .set_aad("header").unwrap()
///     .update_in_place(&mut data[..5]).unwrap()
///     .update_in_place(&mut data[5..]).unwrap()
///     .finalize();
///
/// assert!(ChaCha20Poly1305::new::<Decrypt>(key.as_ref(), [0u8; 12])
///     .set_aad("header").unwrap()
///     .update_in_place(&mut data).unwrap()
///     .verify(&tag)
///     .is_ok());
///
/// assert_eq!(&data, b"hello world");
/// ```
#[must_use]
pub struct ChaCha20Poly1305<S: State = Init> {
    cipher: Core,
    poly: Engine,
    aad_len: usize,
    data_len: usize,
    _state: PhantomData<S>
}

impl ChaCha20Poly1305<Init> {
    /// Key a new instance in the direction `Mode` ([`Encrypt`] or [`Decrypt`]).
    pub fn new<Mode: Updating>(
        key: impl GenericKey,
        iv: impl GenericIv<Size = U12>
    ) -> ChaCha20Poly1305<Mode::InitState> {
        let (cipher, poly) = keyed(key.bytes(), iv.as_slice());
        ChaCha20Poly1305 {
            cipher,
            poly,
            aad_len: 0,
            data_len: 0,
            _state: PhantomData
        }
    }
}

impl<S: State> ChaCha20Poly1305<S> {
    #[inline]
    fn with_state<N: State>(self) -> ChaCha20Poly1305<N> {
        ChaCha20Poly1305 {
            cipher: self.cipher,
            poly: self.poly,
            aad_len: self.aad_len,
            data_len: self.data_len,
            _state: PhantomData
        }
    }

    #[inline]
    fn close_aad(&mut self) {
        self.poly.pad(self.aad_len as u64);
    }
}

impl<S: CanUpdateAad> ChaCha20Poly1305<S> {
    /// Absorb a piece of AAD, more may follow before [`finish`](ChaCha20Poly1305::finish).
    ///
    /// # Errors
    ///
    /// The total AAD would exceed [`u32::MAX`] bytes, the instance is handed back.
    #[inline]
    pub fn update_aad<A: Aad>(mut self, aad: A) -> Result<ChaCha20Poly1305<S::Updating>, Self> {
        let aad = aad.as_bytes();
        match self.aad_len.checked_add(aad.len()) {
            Some(total) if crate::can_cast_u32(total) => {
                self.poly.update(aad);
                self.aad_len = total;
                Ok(self.with_state())
            },
            _ => Err(self)
        }
    }
}

impl<S: CanUpdate> ChaCha20Poly1305<S> {
    #[inline]
    fn admit(&self, len: usize) -> bool {
        self.data_len
            .checked_add(len)
            .is_some_and(|total| total as u64 <= MAX_DATA)
    }

    fn process(&mut self, data: &mut [u8]) {
        if <S::Mode as Updating>::ENCRYPT {
            self.cipher.apply(data);
            self.poly.update(data);
        } else {
            self.poly.update(data);
            self.cipher.apply(data);
        }
        self.data_len += data.len();
    }

    /// Encrypt or decrypt `data` in place (`wc_ChaCha20Poly1305_UpdateData`).
    ///
    /// # Errors
    ///
    /// The total data would exceed the limit of a single nonce, the instance is handed back.
    pub fn update_in_place(mut self, data: &mut [u8]) -> Result<ChaCha20Poly1305<S::Mode>, Self> {
        if !self.admit(data.len()) { return Err(self) }
        self.process(data);
        Ok(self.with_state())
    }

    /// Encrypt or decrypt `data` into the leading bytes of `output`.
    ///
    /// # Errors
    ///
    /// `output` is shorter than `data`, or the total data would exceed the limit of a single
    /// nonce. The instance is handed back.
    pub fn update(mut self, data: &[u8], output: &mut [u8]) -> Result<ChaCha20Poly1305<S::Mode>, Self> {
        if output.len() < data.len() || !self.admit(data.len()) { return Err(self) }
        let out = &mut output[..data.len()];
        out.copy_from_slice(data);
        self.process(out);
        Ok(self.with_state())
    }
}

impl<S: CanSetAad> ChaCha20Poly1305<S> {
    /// Provide the entire AAD at once.
    ///
    /// # Errors
    ///
    /// The AAD is longer than [`u32::MAX`] bytes, the instance is handed back.
    #[inline]
    pub fn set_aad<A: Aad>(
        mut self,
        aad: A
    ) -> Result<ChaCha20Poly1305<<S as CanSetAad>::Mode>, Self>
    {
        if !aad.is_valid_size() { return Err(self) }
        let aad = aad.as_bytes();
        self.poly.update(aad);
        self.aad_len = aad.len();
        self.close_aad();
        Ok(self.with_state())
    }
}

impl<S: UpdatingAad> ChaCha20Poly1305<S> {
    /// Signal the end of the AAD.
    pub fn finish(mut self) -> ChaCha20Poly1305<S::Mode> {
        self.close_aad();
        self.with_state()
    }
}

impl<S: Updating> ChaCha20Poly1305<S> {
    /// Compute the tag over everything processed (`wc_ChaCha20Poly1305_Final`).
    pub fn finalize(self) -> Tag {
        compute_tag(self.poly, self.aad_len, self.data_len)
    }
}

impl ChaCha20Poly1305<Decrypt> {
    /// Compare the computed tag against `tag` in constant time.
    ///
    /// # Errors
    ///
    /// [`Error::MacCmpFailed`] if they differ.
    pub fn verify(self, tag: &Tag) -> Result<(), Error> {
        if self.finalize() == *tag {
            Ok(())
        } else {
            log_warn!("ChaCha20-Poly1305 stream authentication failed");
            Err(Error::MacCmpFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::mac::poly1305::Key;
    use hex_literal::hex;
    use super::*;

    const SUNSCREEN: &[u8; 114] = b"Ladies and Gentlemen of the class of '99: If I could offer you \
        only one tip for the future, sunscreen would be it.";

    const CIPHER: [u8; 114] = hex!(
        "d31a8d34648e60db7b86afbc53ef7ec2a4aded51296e08fea9e2b5a736ee62d6"
        "3dbea45e8ca9671282fafb69da92728b1a71de0a9e060b2905d6a5b67ecd3b36"
        "92ddbd7f2d778b8c9803aee328091b58fab324e4fad675945585808b4831d7bc"
        "3ff4def08e4b7a9de576d26586cec64b6116"
    );
    const TAG: [u8; 16] = hex!("1ae10b594f09e26a7e902ecbd0600691");
    const AAD: [u8; 12] = hex!("50515253c0c1c2c3c4c5c6c7");
    const IV: [u8; 12] = hex!("070000004041424344454647");

    fn rfc_key() -> Key {
        Key::new(core::array::from_fn(|i| 0x80 + i as u8))
    }

    #[test]
    fn rfc8439_2_8_2() {
        let key = rfc_key();
        let mut out = [0u8; 114];
        let tag = encrypt(key.as_ref(), IV, SUNSCREEN, &mut out, AAD).unwrap();
        assert_eq!(out, CIPHER);
        assert_eq!(tag, TAG);

        let mut plain = [0u8; 114];
        assert!(decrypt(key.as_ref(), IV, &CIPHER, &mut plain, AAD, Tag::new(TAG)).is_ok());
        assert_eq!(&plain, SUNSCREEN);
    }

    #[test]
    fn streaming_matches_oneshot() {
        let key = rfc_key();
        let mut out = [0u8; 114];

        let tag = ChaCha20Poly1305::new::<Encrypt>(key.as_ref(), IV)
            .update_aad(&AAD[..5]).unwrap()
            .update_aad(&AAD[5..]).unwrap()
            .finish()
            .update(&SUNSCREEN[..33], &mut out[..33]).unwrap()
            .update(&SUNSCREEN[33..], &mut out[33..]).unwrap()
            .finalize();

        assert_eq!(out, CIPHER);
        assert_eq!(tag, TAG);

        let res = ChaCha20Poly1305::new::<Decrypt>(key.as_ref(), IV)
            .set_aad(AAD).unwrap()
            .update_in_place(&mut out).unwrap()
            .verify(&tag);

        assert!(res.is_ok());
        assert_eq!(&out, SUNSCREEN);
    }

    #[test]
    fn empty_everything() {
        let tag = encrypt_in_place(Key::new([0u8; 32]), [0u8; 12], &mut [], ()).unwrap();
        assert_eq!(tag, hex!("4eb972c9a8fb3a1b382bb4d36f5ffad1"));

        let streamed = ChaCha20Poly1305::new::<Encrypt>(Key::new([0u8; 32]), [0u8; 12])
            .set_aad(()).unwrap()
            .finalize();
        assert_eq!(streamed, tag);
    }

    #[test]
    fn type_state_machine() {
        let key = Key::new([0u8; 32]);

        let mut cipher = [69, 69, 69, 69];

        let tag = ChaCha20Poly1305::new::<Encrypt>(key.as_ref(), [0u8; 12])
            .set_aad(Some(Some(Some(())))).unwrap()
            .update_in_place(cipher.as_mut_slice()).unwrap()
            .finalize();

        let new_tag = ChaCha20Poly1305::new::<Decrypt>(key.as_ref(), [0u8; 12])
            .set_aad(()).unwrap()
            .update_in_place(cipher.as_mut_slice()).unwrap()
            .finalize();

        assert_eq!(tag, new_tag);
        assert_eq!(cipher, [69, 69, 69, 69]);
    }

    #[test]
    fn tamper_rejection_zeroes_output() {
        let key = rfc_key();

        let mut flipped = CIPHER;
        flipped[100] ^= 0x20;
        let mut out = [0xffu8; 114];
        assert_eq!(
            decrypt(key.as_ref(), IV, &flipped, &mut out, AAD, Tag::new(TAG)),
            Err(Error::MacCmpFailed)
        );
        assert_eq!(out, [0u8; 114]);

        let mut bad_tag = TAG;
        bad_tag[0] ^= 1;
        let mut in_out = CIPHER;
        assert_eq!(
            decrypt_in_place(key.as_ref(), IV, &mut in_out, AAD, Tag::new(bad_tag)),
            Err(Error::MacCmpFailed)
        );
        assert_eq!(in_out, [0u8; 114]);

        let mut in_out = CIPHER;
        assert_eq!(
            decrypt_in_place(key.as_ref(), IV, &mut in_out, &AAD[1..], Tag::new(TAG)),
            Err(Error::MacCmpFailed)
        );
    }

    #[test]
    fn argument_errors() {
        let key = rfc_key();
        let mut out = [0u8; 4];
        assert_eq!(encrypt(key.as_ref(), IV, &[0u8; 5], &mut out, ()), Err(Error::buffer(5, 4)));

        let short = Tag::from_slice(&TAG[..12]).unwrap();
        assert_eq!(
            decrypt(key.as_ref(), IV, &[0u8; 4], &mut out, (), short),
            Err(Error::BadFuncArg)
        );

        let mut small = [0u8; 2];
        assert!(ChaCha20Poly1305::new::<Encrypt>(key.as_ref(), IV)
            .update(&[0u8; 3], &mut small)
            .is_err());
    }
}
