//! GMAC, GCM authenticating only associated data.
use crate::aead::{Aad, Tag};
use crate::aes::{gcm::Gcm, Key};
use crate::buf::GenericIv;
use crate::Error;

/// The minimum accepted tag length for verification.
pub const MIN_TAG_LEN: usize = 4;

/// AES-GMAC (`wc_GmacSetKey` / `wc_GmacUpdate` / `wc_GmacVerify`).
///
/// Each IV must be unique per key, exactly as for [`AesGcm`](crate::aead::AesGcm).
///
/// # Example
///
/// ```
/// use wolf_core::{aes::Key, buf::Nonce, mac::gmac::Gmac};
///
/// let gmac = Gmac::new(&Key::Aes128([9u8; 16]));
/// let nonce = Nonce::new([1u8; 12]);
///
/// let tag = gmac.mac(nonce.copy(), b"authenticate me");
/// assert!(gmac.verify(nonce, b"authenticate me", &tag).is_ok());
/// ```
pub struct Gmac {
    gcm: Gcm
}

opaque_dbg! { Gmac }

impl Gmac {
    /// Key a new GMAC instance.
    pub fn new(key: &Key) -> Self {
        Self { gcm: Gcm::new(key) }
    }

    /// Compute the full 16 byte tag over `aad`.
    pub fn mac<N: GenericIv, A: Aad>(&self, iv: N, aad: A) -> Tag {
        Tag::new(self.gcm.seal(iv.as_slice(), aad.as_bytes(), &mut []))
    }

    /// Compute a tag truncated to `tag_len` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] unless `4 <= tag_len <= 16`.
    pub fn mac_truncated<N: GenericIv, A: Aad>(&self, iv: N, aad: A, tag_len: usize) -> Result<Tag, Error> {
        if !(MIN_TAG_LEN..=Tag::CAPACITY).contains(&tag_len) {
            return Err(Error::BadFuncArg);
        }
        let mut tag = self.mac(iv, aad);
        tag.truncate(tag_len);
        Ok(tag)
    }

    /// Verify `tag` over `aad`, truncated tags are checked over their length.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if the tag is shorter than 4 bytes.
    /// - [`Error::AesGcmAuth`] if the tag does not match.
    pub fn verify<N: GenericIv, A: Aad>(&self, iv: N, aad: A, tag: &Tag) -> Result<(), Error> {
        if tag.len() < MIN_TAG_LEN {
            return Err(Error::BadFuncArg);
        }

        let aad = aad.as_bytes();
        let expected = self.gcm.seal(iv.as_slice(), aad, &mut []);

        if tag.matches_prefix(&expected) {
            Ok(())
        } else {
            log_warn!(aad_len = aad.len(), tag_len = tag.len(), "GMAC verification failed");
            Err(Error::AesGcmAuth)
        }
    }
}
