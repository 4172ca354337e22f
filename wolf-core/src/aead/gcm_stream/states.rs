//! Type-states of [`AesGcmStream`](super::AesGcmStream).
//!
//! ```text
//! new::<Encrypt>() -> EncryptAad --update_aad--> EncryptAad
//!                         |
//!                      update --> Encrypt --update--> Encrypt --finalize--> Tag
//! ```
//!
//! `new::<Decrypt>()` mirrors this through `DecryptAad` and `Decrypt`, ending in `verify`.
//! Finalizing straight from the AAD state authenticates the AAD alone, as GMAC does.
use crate::sealed::Sealed;

pub trait State: Sealed {}

define_state! {
    /// Before a direction has been chosen.
    Init,
    /// Keyed for encryption, absorbing AAD.
    EncryptAad,
    /// Encrypting, AAD is closed.
    Encrypt,
    /// Keyed for decryption, absorbing AAD.
    DecryptAad,
    /// Decrypting, AAD is closed.
    Decrypt,
}

/// A direction, the state data is processed in.
pub trait Direction: State {
    type Aad: Absorbing<Mode = Self>;

    #[doc(hidden)]
    const ENCRYPT: bool;
}

/// States which accept data and may be finalized.
pub trait Active: State {
    type Mode: Direction;
}

/// States which still accept AAD.
pub trait Absorbing: Active {}

macro_rules! direction {
    ($aad:ident, $mode:ident, $encrypt:literal) => {
        impl Direction for $mode {
            type Aad = $aad;

            #[doc(hidden)]
            const ENCRYPT: bool = $encrypt;
        }
        impl Active for $mode {
            type Mode = Self;
        }
        impl Active for $aad {
            type Mode = $mode;
        }
        impl Absorbing for $aad {}
    };
}

direction! { EncryptAad, Encrypt, true }
direction! { DecryptAad, Decrypt, false }
