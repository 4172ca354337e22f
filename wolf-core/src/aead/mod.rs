//! Authenticated Encryption with Associated Data
//!
//! | AEAD                  | Type                   | Tag      | Failure                     |
//! |-----------------------|------------------------|----------|-----------------------------|
//! | AES-GCM               | [`AesGcm`]             | 4..=16   | [`Error::AesGcmAuth`]       |
//! | AES-GCM, streaming    | [`AesGcmStream`]       | 4..=16   | [`Error::AesGcmAuth`]       |
//! | AES-CCM               | [`AesCcm`]             | 4..=16   | [`Error::AesCcmAuth`]       |
//! | AES-EAX               | [`AesEax`]             | 4..=16   | [`Error::MacCmpFailed`]     |
//! | AES-EAX, streaming    | [`AesEaxStream`]       | 4..=16   | [`Error::MacCmpFailed`]     |
//! | AES-SIV               | [`AesSiv`]             | 16       | [`Error::MacCmpFailed`]     |
//! | ChaCha20-Poly1305     | [`ChaCha20Poly1305`]   | 16       | [`Error::MacCmpFailed`]     |
//!
//! On authentication failure every one-shot decrypt variant zeroes the output it wrote before
//! returning the error. Streams release plaintext as they go and only report the failure.
//!
//! [`Error::AesGcmAuth`]: crate::Error::AesGcmAuth
//! [`Error::AesCcmAuth`]: crate::Error::AesCcmAuth
//! [`Error::MacCmpFailed`]: crate::Error::MacCmpFailed
mod aad;
mod tag;
mod aes_gcm;
mod aes_ccm;
mod aes_eax;
mod aes_siv;

pub use aad::{Aad, AadSlice};
pub use tag::Tag;

pub mod gcm_stream;

pub use aes_gcm::AesGcm;
pub use gcm_stream::AesGcmStream;
pub use aes_ccm::AesCcm;
pub use aes_eax::{AesEax, AesEaxStream};
pub use aes_siv::{AesSiv, SivKey};

non_fips! {
    pub mod chacha20_poly1305;
    pub use chacha20_poly1305::ChaCha20Poly1305;
}
