macro_rules! shake_api {
    (
        name: $name:ident,
        rate: $rate:literal,
        ds: $ds:literal $(,)?
    ) => {
        #[doc = concat!("The `", stringify!($name), "` extendable output function.")]
        #[doc = ""]
        #[doc = "Any non-zero output length may be requested, finalizing resets the state."]
        #[doc = ""]
        #[doc = "# Example"]
        #[doc = ""]
        #[doc = "```"]
        #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
        #[doc = ""]
        #[doc = concat!("let mut hasher = ", stringify!($name), "::new();")]
        #[doc = ""]
        #[doc = "let input = b\"hello world\";"]
        #[doc = "assert!(hasher.try_update(input.as_slice()).is_ok());"]
        #[doc = ""]
        #[doc = "let finalized = hasher.try_finalize::<64>().unwrap();"]
        #[doc = "assert_ne!(finalized.as_slice(), input.as_slice());"]
        #[doc = "assert_eq!(finalized.len(), 64);"]
        #[doc = "```"]
        #[derive(Clone)]
        #[repr(transparent)]
        pub struct $name {
            sponge: $crate::hash::keccak::Sponge<$rate>
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            #[doc = concat!(
                "The default output length of `", stringify!($name), "` (`", stringify!($ds), "`)."
            )]
            pub const DEFAULT_SIZE: usize = $ds;
            /// The rate of the underlying sponge in bytes.
            pub const BLOCK_SIZE: usize = $rate;

            #[doc = concat!("Create a new `", stringify!($name), "` instance.")]
            #[inline]
            pub const fn new() -> Self {
                Self { sponge: $crate::hash::keccak::Sponge::new() }
            }

            #[doc = "Update the XOF with `data`."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If the length of `data` cannot be safely casted to a `u32`."]
            #[inline]
            pub fn try_update(&mut self, data: &[u8]) -> $crate::opaque_res::Res {
                if !$crate::can_cast_u32(data.len()) {
                    return $crate::opaque_res::Res::ERR;
                }

                self.sponge.absorb(data);
                $crate::opaque_res::Res::OK
            }

            #[doc = "Update the XOF with `data`, with the safety checks performed at "]
            #[doc = "compilation time."]
            #[inline]
            pub fn update_sized<const C: usize>(&mut self, data: &[u8; C]) -> $crate::opaque_res::Res {
                if !$crate::const_can_cast_u32::<{ C }>() {
                    return $crate::opaque_res::Res::ERR;
                }

                self.sponge.absorb(data);
                $crate::opaque_res::Res::OK
            }

            panic_api! {
            #[doc = "Update the XOF, panicking under any failure."]
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

            #[doc = "Squeeze `output.len()` bytes and reset the XOF."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "- If `output` is empty."]
            #[doc = "- If the length of `output` cannot be safely casted to a `u32`."]
            #[doc = ""]
            #[doc = "# Example"]
            #[doc = ""]
            #[doc = "```"]
            #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
            #[doc = concat!("let mut hasher = ", stringify!($name), "::new();")]
            #[doc = "# assert!(hasher.update_sized(b\"hello world\").is_ok());"]
            #[doc = ""]
            #[doc = "let mut output = [0u8; 100];"]
            #[doc = "assert!(hasher.finalize_into(&mut output).is_ok());"]
            #[doc = "assert!(hasher.finalize_into(&mut []).is_err());"]
            #[doc = "```"]
            #[inline]
            pub fn finalize_into(&mut self, output: &mut [u8]) -> $crate::opaque_res::Res {
                if output.is_empty() || !$crate::can_cast_u32(output.len()) {
                    return $crate::opaque_res::Res::ERR;
                }

                let mut sponge = ::core::mem::replace(
                    &mut self.sponge, $crate::hash::keccak::Sponge::new()
                );
                sponge.pad($crate::hash::keccak::SHAKE_PAD);
                sponge.squeeze(output);
                sponge.wipe();

                $crate::opaque_res::Res::OK
            }

            #[doc = "Squeeze exactly `C` bytes into `output`, with the size checks performed at "]
            #[doc = "compilation time."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If `C` is zero or cannot be safely casted to a `u32`."]
            #[inline]
            pub fn finalize_into_sized<const C: usize>(&mut self, output: &mut [u8; C]) -> $crate::opaque_res::Res {
                if C == 0 || !$crate::const_can_cast_u32::<{ C }>() {
                    return $crate::opaque_res::Res::ERR;
                }
                self.finalize_into(output)
            }

            #[doc = "Squeeze `C` bytes, returning them as an array."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If `C` is zero or cannot be safely casted to a `u32`."]
            #[inline]
            pub fn try_finalize<const C: usize>(&mut self) -> Result<[u8; C], $crate::error::Unspecified> {
                let mut buf = [0u8; C];
                self.finalize_into_sized(&mut buf).unit_err(buf)
            }

            #[doc = concat!("Squeeze the default output length (`", stringify!($ds), "`).")]
            #[inline]
            pub fn finalize_default(&mut self) -> [u8; $ds] {
                let mut buf = [0u8; $ds];
                // non-zero length, cannot fail
                let _ = self.finalize_into(&mut buf);
                buf
            }

            panic_api! {
            #[doc = "Squeeze `C` bytes, panicking under any failure."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = ""]
            #[doc = "If `C` is zero or cannot be safely casted to a `u32`."]
            #[track_caller]
            pub fn finalize<const C: usize>(&mut self) -> [u8; C] {
                match self.try_finalize::<C>() {
                    Ok(out) => out,
                    Err(_) => panic!(concat!("Failed to finalize in `", stringify!($name), "`"))
                }
            }
            }
        }

        impl Drop for $name {
            #[inline]
            fn drop(&mut self) {
                self.sponge.wipe();
            }
        }


        #[cfg(test)]
        mod property_tests {
            use super::*;
            use digest::{ExtendableOutput, ExtendableOutputReset, XofReader, Update};
            use sha3::$name as RcShake;
            use proptest::prelude::*;

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(1000))]

                #[test]
                fn prop_single_update(
                    input in any::<Vec<u8>>(),
                    output_size in 1..2048usize
                ) {
                    let mut wolf = $name::new();
                    let mut rc = RcShake::default();

                    prop_assert!(wolf.try_update(&input).is_ok());
                    rc.update(&input);

                    let mut wolf_output = vec![0u8; output_size];
                    prop_assert!(wolf.finalize_into(&mut wolf_output).is_ok());

                    let mut rc_output = vec![0u8; output_size];
                    rc.finalize_xof().read(&mut rc_output);

                    prop_assert_eq!(wolf_output, rc_output);
                }

                #[test]
                fn prop_multiple_updates(
                    inputs in proptest::collection::vec(any::<Vec<u8>>(), 0..100),
                    output_size in 1..2048usize
                ) {
                    let mut wolf = $name::new();
                    let mut rc = RcShake::default();

                    for input in &inputs {
                        prop_assert!(wolf.try_update(input).is_ok());
                        rc.update(input);
                    }

                    let mut wolf_output = vec![0u8; output_size];
                    prop_assert!(wolf.finalize_into(&mut wolf_output).is_ok());

                    let mut rc_output = vec![0u8; output_size];
                    rc.finalize_xof().read(&mut rc_output);

                    prop_assert_eq!(wolf_output, rc_output);
                }

                #[test]
                fn prop_variable_output_sizes(
                    input in any::<Vec<u8>>(),
                    sizes in proptest::collection::vec(1..2048usize, 1..10)
                ) {
                    let mut wolf = $name::new();
                    let mut rc = RcShake::default();

                    for &size in &sizes {
                        prop_assert!(wolf.try_update(&input).is_ok());
                        rc.update(&input);

                        let mut wolf_output = vec![0u8; size];
                        prop_assert!(wolf.finalize_into(&mut wolf_output).is_ok());

                        let mut rc_output = vec![0u8; size];
                        rc.finalize_xof_reset().read(&mut rc_output);

                        prop_assert_eq!(wolf_output, rc_output);
                    }
                }
            }
        }
    };
}
