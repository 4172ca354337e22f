
/// Create an API for a hashing function
macro_rules! make_api {
    (
        $(sec_warning: [$($warning:literal),* $(,)?],)?
        $(anecdote: $anecdote:literal,)?
        name: $name:ident,
        engine: $engine:ty,
        ds: $ds:literal,
        bs: $bs:literal $(,)?
    ) => {
        #[doc = concat!("The `", stringify!($name), $($anecdote, )? "` hasher.")]
        #[doc = ""]
        $(
            #[doc = "# Security Warning"]
            #[doc = ""]
            $(#[doc = $warning])*
            #[doc = ""]
        )?
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
        #[doc = "let finalized = hasher.try_finalize().unwrap();"]
        #[doc = "assert_ne!(finalized.as_slice(), input.as_slice());"]
        #[doc = concat!("assert_eq!(finalized.len(), ", stringify!($ds), ");")]
        #[doc = "```"]
        const _: () = assert!(<$engine as $crate::hash::engine::Engine>::BLOCK == $bs);

        #[derive(Clone)]
        #[repr(transparent)]
        pub struct $name {
            inner: $engine
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            #[doc = concat!("The size of the `", stringify!($name), "` digest in bytes.")]
            pub const DIGEST_SIZE: usize = $ds;
            #[doc = concat!("The internal block size of `", stringify!($name), "` in bytes.")]
            pub const BLOCK_SIZE: usize = <$engine as $crate::hash::engine::Engine>::BLOCK;

            $(
                #[doc = "# Security Warning"]
                #[doc = ""]
                $(#[doc = $warning])*
                #[doc = ""]
            )?
            #[doc = concat!("Create a new `", stringify!($name), "` instance.")]
            #[inline]
            pub fn new() -> Self {
                Self { inner: <$engine as $crate::hash::engine::Engine>::init() }
            }

            /// Absorb `data` without any length checks.
            #[inline]
            pub(crate) fn ingest(&mut self, data: &[u8]) {
                <$engine as $crate::hash::engine::Engine>::absorb(&mut self.inner, data);
            }

            /// Write the digest into `output[..DIGEST_SIZE]` and reset.
            ///
            /// The caller guarantees `output` is large enough.
            #[inline]
            pub(crate) fn emit(&mut self, output: &mut [u8]) {
                debug_assert!(output.len() >= $ds);
                let engine = ::core::mem::replace(
                    &mut self.inner,
                    <$engine as $crate::hash::engine::Engine>::init()
                );
                <$engine as $crate::hash::engine::Engine>::squeeze(engine, output);
            }

            #[doc = "Update the hasher with `data`."]
            #[doc = ""]
            #[doc = "An empty `data` is a no-op, the output is independent of how the input is "]
            #[doc = "split across calls."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "If the length of `data` cannot be safely casted to a `u32`."]
            #[doc = ""]
            #[doc = "**Note**: if the size of the `data` is known at compile time, see "]
            #[doc = "[`update_sized`] for a slight optimization as the safety checks are done at "]
            #[doc = "compilation time."]
            #[doc = ""]
            #[doc = "[`update_sized`]: Self::update_sized"]
            #[inline]
            pub fn try_update(&mut self, data: &[u8]) -> $crate::opaque_res::Res {
                if !$crate::can_cast_u32(data.len()) {
                    return $crate::opaque_res::Res::ERR;
                }

                self.ingest(data);
                $crate::opaque_res::Res::OK
            }

            #[doc = "Update the hasher with `data`, with the safety checks performed at "]
            #[doc = "compilation time."]
            #[doc = ""]
            #[doc = "# Example"]
            #[doc = ""]
            #[doc = "```"]
            #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
            #[doc = ""]
            #[doc = concat!("let mut hasher = ", stringify!($name), "::new();")]
            #[doc = ""]
            #[doc = "let input = b\"hello world\";"]
            #[doc = "assert!(hasher.update_sized(input).is_ok());"]
            #[doc = "```"]
            #[inline]
            pub fn update_sized<const C: usize>(&mut self, data: &[u8; C]) -> $crate::opaque_res::Res {
                if !$crate::const_can_cast_u32::<{ C }>() {
                    return $crate::opaque_res::Res::ERR;
                }

                self.ingest(data);
                $crate::opaque_res::Res::OK
            }

            panic_api! {
            #[doc = "Update the hasher, panicking under any failure."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = ""]
            #[doc = "If the length of `data` cannot be safely casted to a `u32`. If a `panic` "]
            #[doc = "is not acceptable for your use case, see [`try_update`]."]
            #[doc = ""]
            #[doc = "[`try_update`]: Self::try_update"]
            #[track_caller]
            pub fn update(&mut self, data: &[u8]) {
                if self.try_update(data).is_err() {
                    panic!(concat!("Failed to update hash in `", stringify!($name), "`"));
                }
            }
            }

            #[inline]
            #[must_use]
            const fn finalize_predicate(len: usize) -> bool {
                len >= $ds
            }

            #[inline]
            #[must_use]
            const fn const_finalize_predicate<const S: usize>() -> bool {
                S >= $ds
            }

            #[doc = "Finalize the hashing of data, writing the digest into `output` and "]
            #[doc = "resetting the hasher to its freshly initialized state."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = concat!(
                "If the size of `output` is less than the digest size (`", stringify!($ds), "`)."
            )]
            #[doc = "In this case the hasher is left untouched."]
            #[doc = ""]
            #[doc = "# Example"]
            #[doc = ""]
            #[doc = "```"]
            #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
            #[doc = concat!("let mut hasher = ", stringify!($name), "::new();")]
            #[doc = "# assert!(hasher.update_sized(b\"hello world\").is_ok());"]
            #[doc = ""]
            #[doc = concat!("let mut output = [0u8; ", stringify!($ds), "];")]
            #[doc = "assert!(hasher.finalize_into(output.as_mut_slice()).is_ok());"]
            #[doc = ""]
            #[doc = concat!("let mut small = [0u8; ", stringify!($ds), " - 1];")]
            #[doc = "assert!(hasher.finalize_into(small.as_mut_slice()).is_err());"]
            #[doc = "```"]
            #[inline]
            pub fn finalize_into(&mut self, output: &mut [u8]) -> $crate::opaque_res::Res {
                if !Self::finalize_predicate(output.len()) { return $crate::opaque_res::Res::ERR }
                self.emit(output);
                $crate::opaque_res::Res::OK
            }

            #[doc = "Finalize into a fixed size buffer, with the size check performed at "]
            #[doc = "compilation time."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = concat!("If `C` is less than the digest size (`", stringify!($ds), "`).")]
            #[inline]
            pub fn finalize_into_sized<const C: usize>(&mut self, output: &mut [u8; C]) -> $crate::opaque_res::Res {
                if !Self::const_finalize_predicate::<{ C }>() { return $crate::opaque_res::Res::ERR }
                self.emit(output);
                $crate::opaque_res::Res::OK
            }

            #[doc = "Finalize into a buffer of exactly the digest size, this cannot fail."]
            #[inline]
            pub fn finalize_into_exact(&mut self, output: &mut [u8; $ds]) {
                self.emit(output);
            }

            #[doc = "Finalize, returning the digest and resetting the hasher."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = "This is infallible for native digests and kept for symmetry with the other "]
            #[doc = "`try_*` methods."]
            #[inline]
            pub fn try_finalize(&mut self) -> Result<[u8; $ds], $crate::error::Unspecified> {
                let mut buf = [0u8; $ds];
                self.finalize_into_exact(&mut buf);
                Ok(buf)
            }

            panic_api! {
            #[doc = "Finalize, returning the digest and resetting the hasher."]
            #[doc = ""]
            #[doc = "# Example"]
            #[doc = ""]
            #[doc = "```"]
            #[doc = concat!("use wolf_core::hash::", stringify!($name), ";")]
            #[doc = concat!("let mut hasher = ", stringify!($name), "::new();")]
            #[doc = "hasher.update(b\"hello world\");"]
            #[doc = concat!("assert_eq!(hasher.finalize().len(), ", stringify!($ds), ");")]
            #[doc = "```"]
            #[inline]
            pub fn finalize(&mut self) -> [u8; $ds] {
                let mut buf = [0u8; $ds];
                self.finalize_into_exact(&mut buf);
                buf
            }
            }

            #[doc = "Write the digest of everything absorbed so far into `output` without "]
            #[doc = "modifying the hasher."]
            #[doc = ""]
            #[doc = "# Errors"]
            #[doc = ""]
            #[doc = concat!(
                "If the size of `output` is less than the digest size (`", stringify!($ds), "`)."
            )]
            #[inline]
            pub fn get_hash_into(&self, output: &mut [u8]) -> $crate::opaque_res::Res {
                if !Self::finalize_predicate(output.len()) { return $crate::opaque_res::Res::ERR }
                self.clone().emit(output);
                $crate::opaque_res::Res::OK
            }

            #[doc = "The digest of everything absorbed so far, without modifying the hasher."]
            #[doc = ""]
            #[doc = "This equals what the next finalize would produce if no further data is "]
            #[doc = "absorbed."]
            #[inline]
            pub fn get_hash(&self) -> [u8; $ds] {
                let mut buf = [0u8; $ds];
                self.clone().emit(&mut buf);
                buf
            }
        }

        impl Drop for $name {
            #[inline]
            fn drop(&mut self) {
                <$engine as $crate::hash::engine::Engine>::wipe(&mut self.inner);
            }
        }


    };

    // rust-crypto to test against, convenient that the naming conventions line up.
    (@rc Sha3_224) => { sha3::Sha3_224 };
    (@rc Sha3_256) => { sha3::Sha3_256 };
    (@rc Sha3_384) => { sha3::Sha3_384 };
    (@rc Sha3_512) => { sha3::Sha3_512 };
    (@rc Sha) => { sha1::Sha1 };
    (@rc Md5) => { md5::Md5 };
    (@rc Md4) => { md4::Md4 };
    (@rc RipeMd) => { ripemd::Ripemd160 };
    (@rc $name:ident) => { sha2::$name };
}
