use crate::aead::{Aad, Tag};
use crate::aes::{ccm::Ccm, Key};
use crate::{ct, Error};

/// Smallest accepted CCM nonce.
pub const MIN_NONCE_LEN: usize = 7;
/// Largest accepted CCM nonce.
pub const MAX_NONCE_LEN: usize = 13;

/// AES-CCM (Counter with CBC-MAC), RFC 3610 / NIST SP 800-38C.
///
/// The nonce length `n` fixes the size of the message length field, `L = 15 - n`, so shorter
/// nonces permit longer messages. Tags are 4, 6, 8, 10, 12, 14 or 16 bytes.
///
/// # Example
///
/// ```
/// use wolf_core::{aead::AesCcm, aes::Key};
///
/// let ccm = AesCcm::new(&Key::Aes128([3u8; 16]));
/// let nonce = [7u8; 13];
///
/// let mut cipher = [0u8; 5];
/// let tag = ccm.encrypt(&nonce, b"hello", &mut cipher, "aad", 8).unwrap();
/// assert_eq!(tag.len(), 8);
///
/// let mut plain = [0u8; 5];
/// ccm.decrypt(&nonce, &cipher, &mut plain, "aad", &tag).unwrap();
/// assert_eq!(&plain, b"hello");
/// ```
pub struct AesCcm {
    ccm: Ccm
}

opaque_dbg! { AesCcm }

#[inline]
const fn valid_tag_len(len: usize) -> bool {
    len >= 4 && len <= 16 && len % 2 == 0
}

/// Whether a payload of `len` bytes can be encoded in the `15 - nonce_len` byte length field.
#[inline]
const fn fits_length_field(nonce_len: usize, len: usize) -> bool {
    let l = 15 - nonce_len;
    l >= 8 || (len as u64) < (1u64 << (8 * l))
}

fn check_args<A: Aad>(
    nonce: &[u8], in_len: usize, out_len: usize, aad: &A, tag_len: usize
) -> Result<(), Error> {
    if nonce.len() < MIN_NONCE_LEN || nonce.len() > MAX_NONCE_LEN
        || !fits_length_field(nonce.len(), in_len)
        || !aad.is_valid_size()
        || !valid_tag_len(tag_len)
    {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

impl AesCcm {
    /// Create a new AES-CCM instance (`wc_AesCcmSetKey`).
    pub fn new(key: &Key) -> Self {
        Self { ccm: Ccm::new(key) }
    }

    /// Encrypt `input` into `output` (`wc_AesCcmEncrypt`), returning a `tag_len` byte tag.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if the nonce is not 7..=13 bytes, `tag_len` is invalid, `input`
    ///   does not fit the length field, or the AAD's length is greater than [`u32::MAX`].
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt<A: Aad>(
        &self, nonce: &[u8], input: &[u8], output: &mut [u8], aad: A, tag_len: usize
    ) -> Result<Tag, Error> {
        check_args(nonce, input.len(), output.len(), &aad, tag_len)?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        Ok(self.seal(nonce, out, aad.as_bytes(), tag_len))
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt), minus the buffer check.
    pub fn encrypt_in_place<A: Aad>(
        &self, nonce: &[u8], buf: &mut [u8], aad: A, tag_len: usize
    ) -> Result<Tag, Error> {
        check_args(nonce, buf.len(), buf.len(), &aad, tag_len)?;
        Ok(self.seal(nonce, buf, aad.as_bytes(), tag_len))
    }

    fn seal(&self, nonce: &[u8], buf: &mut [u8], aad: &[u8], tag_len: usize) -> Tag {
        let mut tag = Tag::new(self.ccm.seal(nonce, aad, buf, tag_len));
        tag.truncate(tag_len);
        tag
    }

    /// Decrypt `input` into `output` and verify `tag` (`wc_AesCcmDecrypt`).
    ///
    /// The tag length is taken from `tag`.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for the argument errors of [`encrypt`](Self::encrypt).
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    /// - [`Error::AesCcmAuth`] if the tag does not match, the written output is zeroed.
    pub fn decrypt<A: Aad>(
        &self, nonce: &[u8], input: &[u8], output: &mut [u8], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        check_args(nonce, input.len(), output.len(), &aad, tag.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.open(nonce, out, aad.as_bytes(), tag)
    }

    /// Decrypt `buf` in place and verify `tag`.
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt), `buf` is zeroed on authentication failure.
    pub fn decrypt_in_place<A: Aad>(
        &self, nonce: &[u8], buf: &mut [u8], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        check_args(nonce, buf.len(), buf.len(), &aad, tag.len())?;
        self.open(nonce, buf, aad.as_bytes(), tag)
    }

    fn open(&self, nonce: &[u8], buf: &mut [u8], aad: &[u8], tag: &Tag) -> Result<(), Error> {
        let expected = self.ccm.open(nonce, aad, buf, tag.len());
        let ok = tag.matches_prefix(&expected);
        ct::zero_unless(u8::from(ok), buf);

        if ok {
            Ok(())
        } else {
            log_warn!(
                input_len = buf.len(), aad_len = aad.len(), tag_len = tag.len(),
                "AES-CCM authentication failed"
            );
            Err(Error::AesCcmAuth)
        }
    }
}
