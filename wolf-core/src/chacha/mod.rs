//! The `ChaCha20` Stream Cipher

mod key;
pub(crate) mod block;
pub mod states;

pub use key::{Key, KeyRef, GenericKey};
use core::fmt;

use core::marker::PhantomData;
use crate::buf::{GenericIv, U12};
use crate::Unspecified;
use block::Core;
use states::{State, CanProcess, Init, NeedsIv, Ready, Streaming};

macro_rules! impl_fmt {
    ($(#[$meta:meta])* $trait:ident for $state:ident) => {
        impl fmt::$trait for ChaCha20<$state> {
            $(#[$meta])*
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(concat!("ChaCha20<", stringify!($state), "> { ... }"))
            }
        }
    };
    ($state:ident) => {
        impl_fmt! { Debug for $state }
        impl_fmt! {
            #[inline]
            Display for $state
        }
    };
}

/// ChaCha20 (RFC 8439) with a 96 bit nonce and 32 bit block counter.
///
/// The cipher is unauthenticated, prefer [`ChaCha20Poly1305`] unless the caller supplies its own
/// MAC.
///
/// The type parameter tracks whether a nonce is loaded. A one-shot encryption consumes the
/// nonce, so the same keystream cannot be produced twice by accident:
///
/// ```text
/// new(key) -> NeedsIv --set_iv--> Ready --encrypt_*--> NeedsIv
///                                   |
///                                   +--stream--> Streaming --finish--> NeedsIv
/// ```
///
/// Decryption borrows the instance and may be repeated under the loaded nonce.
///
/// # Example
///
/// ```
/// use wolf_core::chacha::ChaCha20;
///
/// let (sealed, chacha) = ChaCha20::new(&[7u8; 32])
///     .set_iv(&[3u8; 12])
///     .encrypt_exact(b"hello world");
///
/// let opened = chacha.set_iv(&[3u8; 12]).decrypt_exact(&sealed);
/// assert_eq!(&opened, b"hello world");
/// ```
///
/// [`ChaCha20Poly1305`]: crate::aead::ChaCha20Poly1305
pub struct ChaCha20<S: State = Init> {
    core: Core,
    _state: PhantomData<S>
}

impl ChaCha20<Init> {
    /// Key a new instance (`wc_Chacha_SetKey`), 16 or 32 bytes. A nonce must be set next.
    pub fn new<K: GenericKey>(key: K) -> ChaCha20<NeedsIv> {
        Self::new_with(Core::new(key.slice()))
    }
}

impl<S: State> ChaCha20<S> {
    #[inline]
    #[must_use]
    const fn new_with<NS: State>(core: Core) -> ChaCha20<NS> {
        ChaCha20::<NS> {
            core,
            _state: PhantomData
        }
    }

    #[inline]
    fn into_state<NS: State>(self) -> ChaCha20<NS> {
        ChaCha20::<NS> {
            core: self.core,
            _state: PhantomData
        }
    }
}

impl ChaCha20<NeedsIv> {
    /// Set the initialization vector to use for the next [`Ready`] state (`wc_Chacha_SetIV`).
    ///
    /// # Arguments
    ///
    /// * `iv` - The 96-bit initialization vector.
    /// * `counter` - The value at which the block counter should start, generally zero.
    pub fn set_iv_with_ctr<IV>(mut self, iv: IV, counter: u32) -> ChaCha20<Ready>
        where IV: GenericIv<Size = U12>
    {
        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(iv.as_slice());
        self.core.set_iv(&nonce, counter);
        self.into_state()
    }

    /// Set the initialization vector to use for the next [`Ready`] state, with the block
    /// counter at zero.
    #[inline]
    pub fn set_iv<IV: GenericIv<Size = U12>>(self, iv: IV) -> ChaCha20<Ready> {
        self.set_iv_with_ctr(iv, 0)
    }
}

impl_fmt! { NeedsIv }

impl<S: CanProcess> ChaCha20<S> {
    /// # Errors
    ///
    /// `output` is shorter than `input`.
    #[inline]
    fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Unspecified> {
        if input.len() > output.len() { return Err(Unspecified) }
        self.core.apply_b2b(input, output);
        Ok(())
    }

    #[inline]
    fn process_in_place<'io>(&mut self, in_out: &'io mut [u8]) -> &'io [u8] {
        self.core.apply(in_out);
        in_out
    }
}

impl ChaCha20<Ready> {
    /// Encrypts the plaintext into the ciphertext buffer.
    ///
    /// # Errors
    ///
    /// The length of `cipher` was less than the length of `plain`, the instance is handed back.
    #[inline]
    pub fn encrypt_into(
        mut self,
        plain: &[u8],
        cipher: &mut [u8]
    ) -> Result<ChaCha20<NeedsIv>, Self> {
        if self.process(plain, cipher).is_ok() {
            Ok(self.into_state())
        } else {
            Err(self)
        }
    }

    /// Encrypts the plaintext in-place.
    #[inline]
    pub fn encrypt_in_place(mut self, in_out: &mut [u8]) -> ChaCha20<NeedsIv> {
        self.process_in_place(in_out);
        self.into_state()
    }

    alloc! {
        /// Encrypts the plaintext and returns the ciphertext as a vector.
        pub fn encrypt(self, plain: &[u8]) -> (alloc::vec::Vec<u8>, ChaCha20<NeedsIv>) {
            let mut output = plain.to_vec();
            let next = self.encrypt_in_place(output.as_mut_slice());
            (output, next)
        }
    }

    /// Encrypts the plaintext array and returns the ciphertext array.
    #[inline]
    pub fn encrypt_exact<const I: usize>(self, plain: &[u8; I]) -> ([u8; I], ChaCha20<NeedsIv>) {
        let mut output = *plain;
        let next = self.encrypt_in_place(&mut output);
        (output, next)
    }

    /// Switch to [`Streaming`], for encrypting a message of unknown length across many calls.
    pub fn stream(self) -> ChaCha20<Streaming> {
        self.into_state()
    }
}

impl_fmt! { Ready }

impl<S: CanProcess> ChaCha20<S> {
    /// Decrypts the ciphertext into the output buffer.
    ///
    /// # Errors
    ///
    /// If the length of `cipher` is greater than the length of `plain`.
    #[inline]
    pub fn decrypt_into(&mut self, cipher: &[u8], plain: &mut [u8]) -> Result<(), Unspecified> {
        self.process(cipher, plain)
    }

    /// Decrypts `in_out` in place, handing it back.
    #[inline]
    pub fn decrypt_in_place<'io>(&mut self, in_out: &'io mut [u8]) -> &'io [u8] {
        self.process_in_place(in_out)
    }

    alloc! {
        /// Decrypts the ciphertext and returns the plaintext as a vector.
        #[inline]
        pub fn decrypt(&mut self, cipher: &[u8]) -> alloc::vec::Vec<u8> {
            let mut output = cipher.to_vec();
            self.process_in_place(output.as_mut_slice());
            output
        }
    }

    /// Decrypts the ciphertext array and returns the plaintext array.
    #[inline]
    pub fn decrypt_exact<const O: usize>(&mut self, cipher: &[u8; O]) -> [u8; O] {
        let mut output = *cipher;
        self.process_in_place(&mut output);
        output
    }
}

impl ChaCha20<Streaming> {
    /// Encrypts the input into the output buffer, continuing the keystream.
    ///
    /// # Errors
    ///
    /// The length of `cipher` was less than the length of `plain`.
    #[inline]
    pub fn encrypt_into(&mut self, plain: &[u8], cipher: &mut [u8]) -> Result<(), Unspecified> {
        self.process(plain, cipher)
    }

    /// Encrypts the buffer in place, continuing the keystream.
    #[inline]
    pub fn encrypt_in_place<'io>(&mut self, in_out: &'io mut [u8]) -> &'io [u8] {
        self.process_in_place(in_out)
    }

    /// Finishes the streaming encryption and returns to the `NeedsIv` state.
    #[inline]
    pub fn finish(self) -> ChaCha20<NeedsIv> {
        self.into_state()
    }

    std! {
        /// Wrap `writer` so every byte written through it is encrypted first, using a stack
        /// buffer of `CHUNK` bytes.
        pub const fn writer<W: io::Write, const CHUNK: usize>(self, writer: W) -> Writer<W, CHUNK> {
            Writer { chacha: self, writer }
        }

        /// [`writer`](Self::writer) with a 128 byte chunk.
        pub const fn default_writer<W: io::Write>(self, writer: W) -> Writer<W, 128> {
            self.writer(writer)
        }
    }
}

impl_fmt! { Streaming }

std! {
    use std::io;

    /// A wrapper for any implementor of `std::io::Write` which encrypts everything written.
    pub struct Writer<W, const CHUNK: usize> {
        chacha: ChaCha20<Streaming>,
        writer: W
    }

    impl<W, const CHUNK: usize> Writer<W, CHUNK> {
        /// Finishes the streaming encryption and returns to the `NeedsIv` state.
        #[inline]
        pub fn finish(self) -> ChaCha20<NeedsIv> {
            self.chacha.finish()
        }
    }

    impl<W: io::Write, const CHUNK: usize> io::Write for Writer<W, CHUNK> {
        /// Encrypts and writes up to `CHUNK` bytes of `buf`.
        ///
        /// Bytes the inner writer does not accept have still advanced the keystream, so prefer
        /// `write_all`.
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut out = [0u8; CHUNK];
            let to_write = core::cmp::min(CHUNK, buf.len());
            self.chacha.core.apply_b2b(&buf[..to_write], &mut out);
            self.writer.write(&out[..to_write])
        }

        fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
            let mut out = [0u8; CHUNK];

            for chunk in buf.chunks(CHUNK.max(1)) {
                self.chacha.core.apply_b2b(chunk, &mut out);
                self.writer.write_all(&out[..chunk.len()])?;
            }

            Ok(())
        }

        #[inline]
        fn flush(&mut self) -> io::Result<()> {
            self.writer.flush()
        }
    }
}
