macro_rules! non_fips {
    ($($item:item)*) => {
        $(
            #[cfg_attr(docsrs, doc(cfg(feature = "allow-non-fips")))]
            #[cfg(feature = "allow-non-fips")]
            $item
        )*
    };
}

macro_rules! std {
    ($($item:item)*) => {
        $(
            #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
            #[cfg(feature = "std")]
            $item
        )*
    };
}

macro_rules! alloc {
    ($($item:item)*) => {
        $(
            #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
            #[cfg(feature = "alloc")]
            $item
        )*
    };
}

macro_rules! panic_api {
    ($($item:item)*) => {
        $(
            #[cfg_attr(docsrs, doc(cfg(feature = "can-panic")))]
            #[cfg(feature = "can-panic")]
            $item
        )*
    };
}

/// Debug implementation which never reveals the contents of the type.
macro_rules! opaque_dbg {
    ($ident:ident $(<$($lt:lifetime),*>)?) => {
        impl $(<$($lt),*>)? ::core::fmt::Debug for $ident $(<$($lt),*>)? {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(concat!(stringify!($ident), " { ... }"))
            }
        }
    };
    ($ident:ident <$($param:ty),*>) => {
        impl ::core::fmt::Debug for $ident<$($param),*> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(concat!(
                    stringify!($ident), "<", $(stringify!($param),)* "> { ... }"
                ))
            }
        }
    };
}

/// Zero sized type-state markers.
macro_rules! define_state {
    ($(
        $(#[$meta:meta])*
        $name:ident
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub struct $name;

            impl $crate::sealed::Sealed for $name {}
            impl State for $name {}
        )*
    };
}

/// `proptest::Arbitrary` for fixed size key types, test builds only.
#[cfg(feature = "allow-non-fips")]
macro_rules! arb_key {
    (struct $ident:ident :: $construct:ident ([u8; $sz:literal])) => {
        #[cfg(test)]
        impl ::proptest::arbitrary::Arbitrary for $ident {
            type Parameters = ();

            fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
                use ::proptest::strategy::Strategy as _;
                ::proptest::arbitrary::any::<[u8; $sz]>().prop_map($ident::$construct).boxed()
            }

            type Strategy = ::proptest::strategy::BoxedStrategy<Self>;
        }
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    }};
}
