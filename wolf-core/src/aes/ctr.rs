//! AES in CTR mode with a 128 bit big-endian counter.
//!
//! The counter and any unused keystream carry over between calls, so applying the keystream to
//! a message in pieces of any size equals applying it in one call.
use zeroize::Zeroize;
use crate::aes::{Aes, Key, BLOCK_SIZE};
use crate::buf::Iv;
use crate::opaque_res::Res;

#[inline]
#[must_use]
const fn size_predicate(len: usize) -> bool {
    len <= (u32::MAX as usize)
}

#[inline]
#[must_use]
const fn predicate(input_len: usize, output_len: usize) -> bool {
    input_len <= output_len && size_predicate(input_len)
}

macro_rules! impl_aes_api {
    (
        $(#[$sized_meta:meta])*
        sized => $sized_ident:ident,
        $(#[$try_meta:meta])*
        try => $try_ident:ident,
        $(#[$panics_meta:meta])*
        panics => $panics_ident:ident $(,)?
    ) => {
        $(#[$sized_meta])*
        #[inline]
        pub fn $sized_ident<const S: usize>(
            &mut self, input: &[u8; S], output: &mut [u8; S]
        ) -> Res {
            if !size_predicate(S) {
                return Res::ERR
            }
            self.xor_into(input.as_slice(), output.as_mut_slice());
            Res::OK
        }

        $(#[$try_meta])*
        #[inline]
        pub fn $try_ident(&mut self, input: &[u8], output: &mut [u8]) -> Res {
            if !predicate(input.len(), output.len()) {
                return Res::ERR
            }
            self.xor_into(input, &mut output[..input.len()]);
            Res::OK
        }

        panic_api! {
            $(#[$panics_meta])*
            #[track_caller]
            pub fn $panics_ident(&mut self, input: &[u8], output: &mut [u8]) {
                if self.$try_ident(input, output).is_err() {
                    panic!("Failed to apply keystream");
                }
            }
        }
    };
}

/// A 128 bit big-endian counter with its unused keystream.
///
/// Shared by [`AesCtr`] and the modes which run CTR internally (EAX, SIV).
pub(crate) struct Keystream {
    counter: [u8; BLOCK_SIZE],
    stream: [u8; BLOCK_SIZE],
    used: usize
}

impl Keystream {
    pub(crate) const fn new(counter: [u8; BLOCK_SIZE]) -> Self {
        Self { counter, stream: [0u8; BLOCK_SIZE], used: BLOCK_SIZE }
    }

    #[inline]
    fn refill(&mut self, aes: &Aes) {
        self.stream = self.counter;
        aes.encrypt_block(&mut self.stream);
        self.counter = u128::from_be_bytes(self.counter).wrapping_add(1).to_be_bytes();
        self.used = 0;
    }

    /// `output.len()` must equal `input.len()`.
    pub(crate) fn xor_into(&mut self, aes: &Aes, input: &[u8], output: &mut [u8]) {
        debug_assert_eq!(input.len(), output.len());
        for (i, o) in input.iter().zip(output.iter_mut()) {
            if self.used == BLOCK_SIZE {
                self.refill(aes);
            }
            *o = *i ^ self.stream[self.used];
            self.used += 1;
        }
    }

    pub(crate) fn apply(&mut self, aes: &Aes, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            if self.used == BLOCK_SIZE {
                self.refill(aes);
            }
            *b ^= self.stream[self.used];
            self.used += 1;
        }
    }
}

impl Drop for Keystream {
    #[inline]
    fn drop(&mut self) {
        self.counter.zeroize();
        self.stream.zeroize();
    }
}

/// AES-CTR (`wc_AesCtrEncrypt`). Encryption and decryption are the same operation.
pub struct AesCtr {
    aes: Aes,
    ks: Keystream
}

opaque_dbg! { AesCtr }

impl AesCtr {
    /// Create a new AES CTR instance.
    ///
    /// # Arguments
    ///
    /// * `key` - The key material to use (which determines the number of rounds).
    /// * `iv` - The initial counter block.
    pub fn new(key: &Key, iv: &Iv) -> Self {
        let mut counter = [0u8; BLOCK_SIZE];
        counter.copy_from_slice(iv.slice());
        Self { aes: Aes::new(key), ks: Keystream::new(counter) }
    }

    /// Restart the keystream from a new counter block, keeping the key.
    pub fn set_iv(&mut self, iv: &Iv) {
        let mut counter = [0u8; BLOCK_SIZE];
        counter.copy_from_slice(iv.slice());
        self.ks = Keystream::new(counter);
    }

    #[inline]
    fn xor_into(&mut self, input: &[u8], output: &mut [u8]) {
        self.ks.xor_into(&self.aes, input, output);
    }

    /// Apply the keystream to `buf` in place.
    pub fn apply_keystream_in_place(&mut self, buf: &mut [u8]) {
        self.ks.apply(&self.aes, buf);
    }

    impl_aes_api! {
        /// Apply the underlying keystream to the output buffer, with the size of both the input
        /// and output buffers described at compile time to avoid most runtime checks.
        ///
        /// # Errors
        ///
        /// (Unlikely) If the size of the buffers is greater than what can be represented by a
        /// `u32`.
        ///
        /// # Example
        ///
        /// ```
        /// use wolf_core::{buf::Iv, aes::{Key, ctr::AesCtr}};
        /// // securely generate a random key and initialization vector ...
        /// # let mut key = Key::Aes256([1u8; 32]);
        /// # let iv = Iv::new([2u8; 16]);
        ///
        /// let mut input = [1u8; 32];
        /// let mut output = [0u8; 32];
        ///
        /// assert!(AesCtr::new(&key, &iv)
        ///     .apply_keystream_sized(&input, &mut output)
        ///     .is_ok());
        ///
        /// assert_ne!(&input, &output);
        ///
        /// // and decrypt
        ///
        /// let mut plain = [0u8; 32];
        /// assert!(AesCtr::new(&key, &iv)
        ///     .apply_keystream_sized(&output, &mut plain)
        ///     .is_ok());
        ///
        /// assert_eq!(&plain, &input);
        /// key.zero();
        /// ```
        sized => apply_keystream_sized,

        /// Try to apply the underlying keystream to the output buffer.
        ///
        /// # Errors
        ///
        /// - If the `input` buffer is larger than the `output` buffer.
        /// - (Unlikely) If the size of `input` is greater than what can be represented by a
        ///   `u32`.
        ///
        /// # Example
        ///
        /// ```
        /// use wolf_core::{buf::Iv, aes::{Key, ctr::AesCtr}};
        /// # let key = Key::Aes128([1u8; 16]);
        /// # let iv = Iv::new([2u8; 16]);
        ///
        /// let input = [1u8; 32];
        /// let mut output = [0u8; 31];
        ///
        /// assert!(AesCtr::new(&key, &iv)
        ///     .try_apply_keystream(input.as_slice(), output.as_mut_slice())
        ///     .is_err());
        /// ```
        try => try_apply_keystream,

        /// Apply the underlying keystream to the output buffer.
        ///
        /// # Panics
        ///
        /// - If the `input` buffer is larger than the `output` buffer.
        /// - (Unlikely) If the size of `input` is greater than what can be represented by a
        ///   `u32`.
        ///
        /// # Example
        ///
        /// ```
        /// use wolf_core::{buf::Iv, aes::{Key, ctr::AesCtr}};
        /// # let key = Key::Aes256([1u8; 32]);
        /// # let iv = Iv::new([2u8; 16]);
        ///
        /// let input = [1u8; 32];
        /// let mut output = [0u8; 32];
        ///
        /// AesCtr::new(&key, &iv).apply_keystream(input.as_slice(), output.as_mut_slice());
        ///
        /// let mut plain = [0u8; 32];
        /// AesCtr::new(&key, &iv).apply_keystream(output.as_slice(), plain.as_mut_slice());
        ///
        /// assert_eq!(&plain, &input);
        /// ```
        panics => apply_keystream
    }
}


#[cfg(all(test, not(miri)))]
mod property_tests {
    use aes::{Aes256, Aes192, Aes128};
    use ctr::cipher::{KeyIvInit, StreamCipher};
    use ctr::Ctr128BE;
    use proptest::prelude::*;
    use crate::aes::test_utils::*;
    use super::*;

    macro_rules! with_rust_crypto_ctr {
        ($key:expr, $nonce:expr, |$ctr:ident| $do:expr) => {
            match $key {
                Key::Aes256(buf) => {
                    let mut $ctr = Ctr128BE::<Aes256>::new_from_slices(
                        buf.as_slice(), $nonce.slice()
                    ).unwrap();

                    $do
                },
                Key::Aes128(buf) => {
                    let mut $ctr = Ctr128BE::<Aes128>::new_from_slices(
                        buf.as_slice(), $nonce.slice()
                    ).unwrap();

                    $do
                },
                Key::Aes192(buf) => {
                    let mut $ctr = Ctr128BE::<Aes192>::new_from_slices(
                        buf.as_slice(), $nonce.slice()
                    ).unwrap();

                    $do
                }
            }
        };
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(5000))]

        #[test]
        fn self_bijective(
            input in any::<BoundList<1028>>(),
            key in any::<Key>(),
            nonce in any::<Iv>()
        ) {
            let mut output = input.create_self();

            let res = AesCtr::new(&key, &nonce)
                .try_apply_keystream(input.as_slice(), output.as_mut_slice());

            prop_assert!(res.is_ok());

            if input.len() >= 2 {
                prop_assert_ne!(&output, &input);
            }

            let mut plain = input.create_self();
            let res = AesCtr::new(&key, &nonce)
                .try_apply_keystream(output.as_slice(), plain.as_mut_slice());

            prop_assert!(res.is_ok());

            prop_assert_eq!(plain.as_slice(), input.as_slice());
        }

        #[test]
        fn from_ctr_crate(
            input in any::<BoundList<1028>>(),
            key in any::<Key>(),
            nonce in any::<Iv>()
        ) {
            let mut ctr = AesCtr::new(&key, &nonce);
            let mut c_in = input;

            with_rust_crypto_ctr!(&key, nonce, |o_ctr| {
                o_ctr.apply_keystream(c_in.as_mut_slice());
            });

            let mut plain = input.create_self();
            prop_assert!(ctr.try_apply_keystream(c_in.as_slice(), plain.as_mut_slice()).is_ok());

            prop_assert_eq!(plain.as_slice(), input.as_slice());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn eq_ctr_crate_many_invocations(
            mut input in any::<BoundList<512>>(),
            key in any::<Key>(),
            nonce in any::<Iv>(),
        ) {
            let mut ctr = AesCtr::new(&key, &nonce);

            with_rust_crypto_ctr!(&key, nonce, |o_ctr| {
                for _ in 0..64 {
                    let mut ours = input.create_self();
                    prop_assert!(
                        ctr.try_apply_keystream(input.as_slice(), ours.as_mut_slice()).is_ok()
                    );

                    o_ctr.apply_keystream(input.as_mut_slice());

                    prop_assert_eq!(ours.as_slice(), input.as_slice());
                }
            });
        }
    }
}
