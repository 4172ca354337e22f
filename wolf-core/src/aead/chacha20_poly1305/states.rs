//! Type-states of the streaming [`ChaCha20Poly1305`](super::ChaCha20Poly1305).
//!
//! ```text
//! new::<Encrypt>() -> EncryptMaybeAad --set_aad--> Encrypt --update--> Encrypt --finalize--> Tag
//!                           |                         ^
//!                      update_aad                   finish
//!                           v                         |
//!                       EncryptAad --update_aad--> EncryptAad
//! ```
//!
//! The decrypt side mirrors this with the `Decrypt*` states.
use crate::sealed::Sealed;

pub trait State: Sealed {}

define_state! {
    /// Before a direction has been chosen.
    Init,
    /// Keyed for encryption, AAD may still be provided.
    EncryptMaybeAad,
    /// Absorbing AAD in pieces ahead of encryption.
    EncryptAad,
    /// Encrypting.
    Encrypt,
    /// Keyed for decryption, AAD may still be provided.
    DecryptMaybeAad,
    /// Absorbing AAD in pieces ahead of decryption.
    DecryptAad,
    /// Decrypting.
    Decrypt,
}

pub trait CanUpdate: State {
    type Mode: Updating;
}
pub trait Updating: CanUpdate {
    type InitState: CanSetAad;

    #[doc(hidden)]
    const ENCRYPT: bool;
}

pub trait CanUpdateAad: State {
    type Updating: UpdatingAad;
}
pub trait CanSetAad: CanUpdateAad + CanUpdate {
    type Mode: Updating;
    type Updating: UpdatingAad;
}
pub trait UpdatingAad: CanUpdateAad {
    type Mode: Updating;
}

macro_rules! direction {
    ($maybe:ident, $aad:ident, $mode:ident, $encrypt:literal) => {
        impl CanSetAad for $maybe {
            type Mode = $mode;
            type Updating = $aad;
        }
        impl CanUpdateAad for $maybe {
            type Updating = $aad;
        }
        impl CanUpdate for $maybe {
            type Mode = $mode;
        }

        impl CanUpdateAad for $aad {
            type Updating = Self;
        }
        impl UpdatingAad for $aad {
            type Mode = $mode;
        }

        impl CanUpdate for $mode {
            type Mode = Self;
        }
        impl Updating for $mode {
            type InitState = $maybe;

            #[doc(hidden)]
            const ENCRYPT: bool = $encrypt;
        }
    };
}

direction! { EncryptMaybeAad, EncryptAad, Encrypt, true }
direction! { DecryptMaybeAad, DecryptAad, Decrypt, false }
