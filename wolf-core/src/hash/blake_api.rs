macro_rules! blake_api {
    (
        name: $name:ident,
        core: $core:ty,
        // applies to both key and the digest length
        max: $max:literal $(,)?
    ) => {
        #[doc = concat!("The `", stringify!($name), "` hasher.")]
        #[doc = ""]
        #[doc = "# Const Generic"]
        #[doc = ""]
        #[doc = concat!(
            "* `C` - The length of the ", stringify!($name),
            " digest to implement, from `1` to `", stringify!($max), "`."
        )]
        #[doc = ""]
        #[doc = "# Example"]
        #[doc = ""]
        #[doc = "```"]
        #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
        #[doc = ""]
        #[doc = concat!(
            "let mut hasher = ", stringify!($name), "::<", stringify!($max), ">::new().unwrap();"
        )]
        #[doc = ""]
        #[doc = "let input = b\"hello world\";"]
        #[doc = "assert!(hasher.try_update(input.as_slice()).is_ok());"]
        #[doc = ""]
        #[doc = "let finalized = hasher.try_finalize().unwrap();"]
        #[doc = concat!("assert_eq!(finalized.len(), ", stringify!($max), ");")]
        #[doc = "```"]
        #[derive(Clone)]
        #[repr(transparent)]
        pub struct $name<const C: usize> {
            inner: $core
        }

        impl<const C: usize> $name<C> {
            /// The block size in bytes.
            pub const BLOCK_SIZE: usize = <$core>::BLOCK;

            #[doc = concat!("Create a new `", stringify!($name), "` instance.")]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = concat!(
                "If the digest length `C` is zero or greater than `", stringify!($max), "`."
            )]
            #[doc = ""]
            #[doc = "# Example"]
            #[doc = ""]
            #[doc = "```"]
            #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
            #[doc = ""]
            #[doc = concat!(
                "assert!(", stringify!($name), "::<", stringify!($max), ">::new().is_ok());"
            )]
            #[doc = concat!(
                "assert!(", stringify!($name), "::<{", stringify!($max * 2), "}>::new().is_err());"
            )]
            #[doc = concat!("assert!(", stringify!($name), "::<0>::new().is_err());")]
            #[doc = "```"]
            pub fn new() -> Result<Self, $crate::error::Unspecified> {
                if C == 0 || !$crate::const_lte::<C, { $max }>() {
                    return Err($crate::error::Unspecified);
                }

                Ok(Self { inner: <$core>::with_params(C, &[]) })
            }

            #[doc = concat!("Create a keyed `", stringify!($name), "` instance, suitable for use as a MAC.")]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = concat!(
                "- If the digest length `C` is zero or greater than `", stringify!($max), "`."
            )]
            #[doc = concat!("- If the key is longer than `", stringify!($max), "` bytes.")]
            #[doc = ""]
            #[doc = "# Example"]
            #[doc = ""]
            #[doc = "```"]
            #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
            #[doc = ""]
            #[doc = "let key = b\"my-secret-key\";"]
            #[doc = concat!(
                "let mut hasher = ", stringify!($name), "::<", stringify!($max),
                ">::new_with_key(key).unwrap();"
            )]
            #[doc = "assert!(hasher.try_update(b\"hello world\").is_ok());"]
            #[doc = "let mac = hasher.try_finalize().unwrap();"]
            #[doc = ""]
            #[doc = concat!("let long_key = [0u8; ", stringify!($max + 1), "];")]
            #[doc = concat!(
                "assert!(", stringify!($name), "::<", stringify!($max),
                ">::new_with_key(&long_key).is_err());"
            )]
            #[doc = "```"]
            pub fn new_with_key(key: &[u8]) -> Result<Self, $crate::error::Unspecified> {
                if C == 0 || !($crate::const_lte::<C, { $max }>() && $crate::lte::<{ $max }>(key.len())) {
                    return Err($crate::error::Unspecified);
                }

                Ok(Self { inner: <$core>::with_params(C, key) })
            }

            #[doc = "Create a keyed instance with the key length checked at compilation time."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = concat!(
                "If `C` is zero, or either `C` or `K` is greater than `", stringify!($max), "`."
            )]
            pub fn new_with_sized_key<const K: usize>(key: &[u8; K]) -> Result<Self, $crate::error::Unspecified> {
                if C == 0 || !($crate::const_lte::<C, { $max }>() && $crate::const_lte::<K, { $max }>()) {
                    return Err($crate::error::Unspecified);
                }

                Ok(Self { inner: <$core>::with_params(C, key) })
            }

            #[doc = "Update the hasher with `data`."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If the length of `data` cannot be safely casted to a `u32`."]
            #[inline]
            pub fn try_update(&mut self, data: &[u8]) -> $crate::opaque_res::Res {
                if !$crate::can_cast_u32(data.len()) { return $crate::opaque_res::Res::ERR }
                self.inner.absorb(data);
                $crate::opaque_res::Res::OK
            }

            #[doc = "Update the hasher with `data`, the length check is performed at compilation time."]
            #[inline]
            pub fn update_sized<const OC: usize>(&mut self, data: &[u8; OC]) -> $crate::opaque_res::Res {
                if !$crate::const_can_cast_u32::<{ OC }>() { return $crate::opaque_res::Res::ERR }
                self.inner.absorb(data);
                $crate::opaque_res::Res::OK
            }

            panic_api! {
            #[doc = "Update the hasher, panicking under any failure."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = ""]
            #[doc = "If the length of `data` cannot be safely casted to a `u32`."]
            #[track_caller]
            pub fn update(&mut self, data: &[u8]) {
                if self.try_update(data).is_err() {
                    panic!(concat!("Failed to update hash in `", stringify!($name), "`"));
                }
            }
            }

            #[doc = "Write the `C` byte digest into `output`, consuming the hasher."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If `output` is smaller than `C`."]
            #[inline]
            pub fn finalize_into(self, output: &mut [u8]) -> $crate::opaque_res::Res {
                if !$crate::gte::<{ C }>(output.len()) { return $crate::opaque_res::Res::ERR }
                self.finish(output);
                $crate::opaque_res::Res::OK
            }

            #[doc = "Write the digest into a fixed size `output`, checked at compilation time."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If `OC` is smaller than `C`."]
            #[inline]
            pub fn finalize_into_sized<const OC: usize>(self, output: &mut [u8; OC]) -> $crate::opaque_res::Res {
                if !$crate::const_gte::<{ OC }, { C }>() { return $crate::opaque_res::Res::ERR }
                self.finish(output);
                $crate::opaque_res::Res::OK
            }

            /// Write the digest into `output`, which is exactly `C` bytes.
            #[inline]
            pub fn finalize_into_exact(self, output: &mut [u8; C]) {
                self.finish(output);
            }

            /// Return the `C` byte digest.
            ///
            /// # Errors
            ///
            /// This only fails for instances whose construction would already have failed, it
            /// is kept fallible for parity with the other hashers.
            #[inline]
            pub fn try_finalize(self) -> Result<[u8; C], $crate::error::Unspecified> {
                let mut out = [0u8; C];
                self.finish(&mut out);
                Ok(out)
            }

            panic_api! {
            /// Return the `C` byte digest.
            #[inline]
            pub fn finalize(self) -> [u8; C] {
                let mut out = [0u8; C];
                self.finish(&mut out);
                out
            }
            }

            /// Copy the digest of everything absorbed so far into `output` without consuming
            /// the hasher.
            ///
            /// # Errors
            ///
            /// If `output` is smaller than `C`.
            #[inline]
            pub fn get_hash_into(&self, output: &mut [u8]) -> $crate::opaque_res::Res {
                self.clone().finalize_into(output)
            }

            /// Unkeyed instance for a `C` the caller already knows to be valid.
            #[inline]
            pub(crate) fn unkeyed() -> Self {
                debug_assert!(C != 0 && C <= $max);
                Self { inner: <$core>::with_params(C, &[]) }
            }

            #[inline]
            pub(crate) fn ingest(&mut self, data: &[u8]) {
                self.inner.absorb(data);
            }

            /// Write the digest into `output[..C]` and reset to the unkeyed initial state.
            #[inline]
            pub(crate) fn emit(&mut self, output: &mut [u8]) {
                debug_assert!(output.len() >= C);
                let inner = ::core::mem::replace(&mut self.inner, <$core>::with_params(C, &[]));
                inner.squeeze(&mut output[..C]);
            }

            #[inline]
            fn finish(mut self, output: &mut [u8]) {
                let inner = ::core::mem::replace(&mut self.inner, <$core>::with_params(C, &[]));
                inner.squeeze(&mut output[..C]);
            }
        }

        impl<const C: usize> Drop for $name<C> {
            #[inline]
            fn drop(&mut self) {
                self.inner.wipe();
            }
        }


        #[cfg(test)]
        mod property_tests {
            use super::*;
            use digest::Digest;

            use $crate::aes::test_utils::{BoundList, Pieces};
            use proptest::prelude::*;

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(2_000))]

                #[test]
                fn rust_crypto_eq_wolf_single_update(
                    input in any::<BoundList<1024>>()
                ) {
                    many_blake!($name => |mut wolf, mut rc| {
                        prop_assert!(wolf.try_update(input.as_slice()).is_ok());
                        rc.update(input.as_slice());

                        let finalized = wolf.try_finalize().unwrap();
                        let rc_finalized = rc.finalize();

                        prop_assert_eq!(finalized.as_slice(), rc_finalized.as_slice());
                    });
                }
            }

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(500))]

                // slow, every digest size iterates over all inputs.
                #[test]
                fn rust_crypto_eq_wolf_arb_updates(
                    inputs in any::<Pieces<32, 512>>()
                ) {
                    many_blake!($name => |mut wolf, mut rc| {
                        for input in inputs.as_slice().iter() {
                            prop_assert!(wolf.try_update(input.as_slice()).is_ok());
                            rc.update(input.as_slice());
                        }

                        let finalized = wolf.try_finalize().unwrap();
                        let rc_finalized = rc.finalize();

                        prop_assert_eq!(finalized.as_slice(), rc_finalized.as_slice());
                    });
                }
            }
        }
    };
}

#[cfg(test)]
macro_rules! many_blake {
    (
        $blake:ident => |mut $wolf:ident, mut $rc:ident $(, $sz:ident)?| $do:expr
    ) => {{
        many_blake! { $blake => |mut $wolf is 64, mut $rc is U64 $(, $sz)?| $do }
        many_blake! { $blake => |mut $wolf is 48, mut $rc is U48 $(, $sz)?| $do }
        many_blake! { $blake => |mut $wolf is 32, mut $rc is U32 $(, $sz)?| $do }
        many_blake! { $blake => |mut $wolf is 28, mut $rc is U28 $(, $sz)?| $do }
        many_blake! { $blake => |mut $wolf is 20, mut $rc is U20 $(, $sz)?| $do }
        many_blake! { $blake => |mut $wolf is 9, mut $rc is U9 $(, $sz)?| $do }
        many_blake! { $blake => |mut $wolf is 1, mut $rc is U1 $(, $sz)?| $do }
    }};
    (
        $blake:ident => |mut $wolf:ident is $sz:literal, mut $rc:ident is $rSz:ident $(, $gS:ident)?|
        $do:expr
    ) => {{
        $(let $gS = $sz;)?
        let mut $wolf = $blake::<{ $sz }>::new().unwrap();
        let mut $rc   = blake2::$blake::<::digest::consts::$rSz>::new();
        $do
    }}
}

#[cfg(test)]
pub struct KeyedVector {
    pub input: &'static [u8],
    pub key: &'static [u8],
    pub hash: &'static [u8]
}

#[cfg(test)]
macro_rules! ingest_blake_vectors {
    (
        $(
            in: $input:literal
            key: $key:literal
            hash: $output:literal
        )*
    ) => {
        &[
            $(
                $crate::hash::blake_api::KeyedVector {
                    input: &hex_literal::hex!($input),
                    key: &hex_literal::hex!($key),
                    hash: &hex_literal::hex!($output)
                }
            ),*
        ]
    };
    ($ident:ident => $($tt:tt)*) => {
        const $ident: &'static [$crate::hash::blake_api::KeyedVector] = ingest_blake_vectors!(
            $($tt)*
        );
    }
}
