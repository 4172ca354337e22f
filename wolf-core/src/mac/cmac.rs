//! AES-CMAC (RFC 4493).
use crate::aead::Tag;
use crate::aes::cmac::{CmacKey, CmacRun};
use crate::aes::Key;
use crate::Error;

/// The minimum accepted tag length for verification.
pub const MIN_TAG_LEN: usize = 4;

/// Incremental AES-CMAC (`wc_InitCmac` / `wc_CmacUpdate` / `wc_CmacFinal`).
///
/// # Example
///
/// ```
/// use wolf_core::{aes::Key, mac::cmac::Cmac};
///
/// let key = Key::Aes128([0x2bu8; 16]);
///
/// let mut cmac = Cmac::new(&key);
/// cmac.update(b"split ");
/// cmac.update(b"message");
/// let tag = cmac.finalize();
///
/// assert_eq!(tag, Cmac::generate(&key, b"split message"));
/// assert!(Cmac::verify(&key, b"split message", &tag).is_ok());
/// ```
pub struct Cmac {
    key: CmacKey,
    run: CmacRun
}

opaque_dbg! { Cmac }

impl Cmac {
    /// Key a new CMAC instance.
    pub fn new(key: &Key) -> Self {
        Self { key: CmacKey::new(key), run: CmacRun::new() }
    }

    /// Absorb `data`.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.run.update(&self.key, data);
    }

    /// The full 16 byte tag.
    pub fn finalize(mut self) -> Tag {
        Tag::new(self.run.finish(&self.key))
    }

    /// The tag truncated to `tag_len` bytes (`wc_CmacFinal` with a short `outSz`).
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] unless `4 <= tag_len <= 16`.
    pub fn finalize_truncated(self, tag_len: usize) -> Result<Tag, Error> {
        if !(MIN_TAG_LEN..=Tag::CAPACITY).contains(&tag_len) {
            return Err(Error::BadFuncArg);
        }
        let mut tag = self.finalize();
        tag.truncate(tag_len);
        Ok(tag)
    }

    /// CMAC of `data` in one call (`wc_AesCmacGenerate`).
    pub fn generate(key: &Key, data: &[u8]) -> Tag {
        Tag::new(CmacKey::new(key).mac(data))
    }

    /// Verify `tag` over `data` in constant time (`wc_AesCmacVerify`). Truncated tags are
    /// checked over their length.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if the tag is shorter than 4 bytes.
    /// - [`Error::MacCmpFailed`] if the tag does not match.
    pub fn verify(key: &Key, data: &[u8], tag: &Tag) -> Result<(), Error> {
        if tag.len() < MIN_TAG_LEN {
            return Err(Error::BadFuncArg);
        }
        if tag.matches_prefix(&CmacKey::new(key).mac(data)) {
            Ok(())
        } else {
            log_warn!(data_len = data.len(), tag_len = tag.len(), "CMAC verification failed");
            Err(Error::MacCmpFailed)
        }
    }
}
