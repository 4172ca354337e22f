//! Error Codes, Error Strings, and the Crate's Error Types
//!
//! Every failure in this crate is ultimately described by an [`ErrorCode`], a closed
//! enumeration of the wolfcrypt error numbers. [`get_error_string`] and
//! [`error_string_into`] provide the total code to string mapping, falling back to
//! [`UNKNOWN_ERROR`] for retired or out of range numbers.
//!
//! Fallible operations return [`Error`], which carries a payload where one is useful (for
//! example how large an output buffer needed to be). APIs which should not reveal why they
//! failed return [`Unspecified`].
use core::fmt;

/// The string returned for codes which do not map to a known error.
pub const UNKNOWN_ERROR: &str = "unknown error number";

/// Maximum number of bytes [`error_string_into`] will write, including the terminating nul.
pub const MAX_ERROR_SZ: usize = 80;

macro_rules! define_codes {
    ($(
        $(#[$meta:meta])*
        $name:ident = $code:literal => $desc:literal
    ),* $(,)?) => {
        /// The closed set of wolfcrypt error numbers.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(i32)]
        pub enum ErrorCode {
            $(
                $(#[$meta])*
                #[doc = concat!("`", stringify!($code), "`: ", $desc)]
                $name = $code
            ),*
        }

        impl ErrorCode {
            /// Every error code, ordered from `MAX_CODE_E - 1` down to `LAST_E`.
            pub const ALL: &'static [Self] = &[$(Self::$name),*];

            /// Looks up the error code for a raw error number.
            ///
            /// Returns `None` for numbers outside the valid range as well as for retired
            /// numbers.
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$name),)*
                    _ => None
                }
            }

            /// The human readable description of this error.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$name => $desc),*
                }
            }
        }
    };
}

define_codes! {
    OpenRan = -101 => "opening random device error",
    ReadRan = -102 => "reading random device error",
    WinCrypt = -103 => "windows crypt init error",
    CryptGen = -104 => "windows crypt generation error",
    RanBlock = -105 => "random device read would block error",
    BadMutex = -106 => "Bad mutex, operation failed",
    Timeout = -107 => "Timeout error",
    Pending = -108 => "wolfCrypt Operation Pending (would block / eagain) error",
    NotPending = -109 => "wolfCrypt operation not pending error",
    MpInit = -110 => "mp_init error state",
    MpRead = -111 => "mp_read error state",
    MpExptmod = -112 => "mp_exptmod error state",
    MpTo = -113 => "mp_to_xxx error state, can't convert",
    MpSub = -114 => "mp_sub error state, can't subtract",
    MpAdd = -115 => "mp_add error state, can't add",
    MpMul = -116 => "mp_mul error state, can't multiply",
    MpMulmod = -117 => "mp_mulmod error state, can't multiply mod",
    MpMod = -118 => "mp_mod error state, can't mod",
    MpInvmod = -119 => "mp_invmod error state, can't inv mod",
    MpCmp = -120 => "mp_cmp error state",
    MpZero = -121 => "mp zero result, not expected",
    Memory = -125 => "out of memory error",
    VarStateChange = -126 => "Variable state modified by different thread",
    FipsDegraded = -127 => "FIPS module in DEGRADED mode",
    RsaWrongType = -130 => "RSA wrong block type for RSA function",
    RsaBuffer = -131 => "RSA buffer error, output too small or input too big",
    Buffer = -132 => "Buffer error, output too small or input too big",
    AlgoId = -133 => "Setting Cert AlgoID error",
    PublicKey = -134 => "Setting Cert Public Key error",
    Date = -135 => "Setting Cert Date validity error",
    Subject = -136 => "Setting Cert Subject name error",
    Issuer = -137 => "Setting Cert Issuer name error",
    CaTrue = -138 => "Setting basic constraint CA true error",
    Extensions = -139 => "Setting extensions error",
    AsnParse = -140 => "ASN parsing error, invalid input",
    AsnVersion = -141 => "ASN version error, invalid number",
    AsnGetInt = -142 => "ASN get big int error, invalid data",
    AsnRsaKey = -143 => "ASN key init error, invalid input",
    AsnObjectId = -144 => "ASN object id error, invalid id",
    AsnTagNull = -145 => "ASN tag error, not null",
    AsnExpect0 = -146 => "ASN expect error, not zero",
    AsnBitStr = -147 => "ASN bit string error, wrong id",
    AsnUnknownOid = -148 => "ASN oid error, unknown sum id",
    AsnDateSz = -149 => "ASN date error, bad size",
    AsnBeforeDate = -150 => "ASN date error, current date before",
    AsnAfterDate = -151 => "ASN date error, current date after",
    AsnSigOid = -152 => "ASN signature error, mismatched oid",
    AsnTime = -153 => "ASN time error, unknown time type",
    AsnInput = -154 => "ASN input error, not enough data",
    AsnSigConfirm = -155 => "ASN sig error, confirm failure",
    AsnSigHash = -156 => "ASN sig error, unsupported hash type",
    AsnSigKey = -157 => "ASN sig error, unsupported key type",
    AsnDhKey = -158 => "ASN key init error, invalid input",
    KdfSrtpKatFips = -159 => "SRTP-KDF Known Answer Test Failure",
    AsnCritExt = -160 => "X.509 Critical extension ignored or invalid",
    AsnAltName = -161 => "ASN alternate name error",
    AsnNoPemHeader = -162 => "ASN no PEM Header Error",
    EccBadArg = -170 => "ECC input argument wrong type, invalid input",
    AsnEccKey = -171 => "ECC ASN1 bad key data, invalid input",
    EccCurveOid = -172 => "ECC curve sum OID unsupported, invalid input",
    BadFuncArg = -173 => "Bad function argument",
    NotCompiledIn = -174 => "Feature not compiled in",
    UnicodeSize = -175 => "Unicode password too big",
    NoPassword = -176 => "No password provided by user",
    AltName = -177 => "Alt Name problem, too big",
    BadOcspResponder = -178 => "Bad OCSP Responder, no auth SKID",
    CrlCertDate = -179 => "CRL date error",
    AesGcmAuth = -180 => "AES-GCM Authentication check fail",
    AesCcmAuth = -181 => "AES-CCM Authentication check fail",
    AsyncInit = -182 => "Async Init error",
    CompressInit = -183 => "Compress Init error",
    Compress = -184 => "Compress error",
    DecompressInit = -185 => "DeCompress Init error",
    Decompress = -186 => "DeCompress error",
    BadAlign = -187 => "Bad alignment error, no alloc help",
    AsnNoSigner = -188 => "ASN no signer error to confirm failure",
    AsnCrlConfirm = -189 => "ASN CRL sig error, confirm failure",
    AsnCrlNoSigner = -190 => "ASN CRL no signer error to confirm failure",
    AsnOcspConfirm = -191 => "ASN OCSP sig error, confirm failure",
    BadState = -192 => "Bad state operation",
    BadPadding = -193 => "Bad padding, message wrong length",
    ReqAttribute = -194 => "Setting cert request attributes error",
    Pkcs7Oid = -195 => "PKCS#7 error: mismatched OID value",
    Pkcs7Recip = -196 => "PKCS#7 error: no matching recipient found",
    FipsNotAllowed = -197 => "FIPS mode not allowed error",
    AsnNameInvalid = -198 => "Name Constraint error",
    RngFailure = -199 => "Random Number Generator failed",
    HmacMinKeylen = -200 => "FIPS Mode HMAC Minimum Key Length error",
    RsaPad = -201 => "Rsa Padding error",
    LengthOnly = -202 => "Output length only set, not for other use error",
    InCoreFips = -203 => "In Core Integrity check FIPS error",
    AesKatFips = -204 => "AES Known Answer Test check FIPS error",
    Des3KatFips = -205 => "DES3 Known Answer Test check FIPS error",
    HmacKatFips = -206 => "HMAC Known Answer Test check FIPS error",
    RsaKatFips = -207 => "RSA Known Answer Test check FIPS error",
    DrbgKatFips = -208 => "DRBG Known Answer Test check FIPS error",
    DrbgContFips = -209 => "DRBG Continuous Test FIPS error",
    AesGcmKatFips = -210 => "AESGCM Known Answer Test check FIPS error",
    ThreadStoreKey = -211 => "Thread Storage Key Create error",
    ThreadStoreSet = -212 => "Thread Storage Set error",
    MacCmpFailed = -213 => "MAC comparison failed",
    IsPoint = -214 => "ECC is point on curve failed",
    EccInf = -215 => "ECC point at infinity error",
    EccPrivKey = -216 => "ECC private key is not valid error",
    EccOutOfRange = -217 => "ECC Qx or Qy parameter greater than or equal to prime",
    SrpCallOrder = -218 => "SRP function called in the wrong order error",
    SrpVerify = -219 => "SRP proof verification error",
    SrpBadKey = -220 => "SRP bad key values error",
    AsnNoSkid = -221 => "ASN no Subject Key Identifier found error",
    AsnNoAkid = -222 => "ASN no Authority Key Identifier found error",
    AsnNoKeyUsage = -223 => "ASN no Key Usage found error",
    Skid = -224 => "Setting Subject Key Identifier error",
    Akid = -225 => "Setting Authority Key Identifier error",
    KeyUsage = -226 => "Key Usage value error",
    CertPolicies = -227 => "Setting Certificate Policies error",
    WcInit = -228 => "wolfCrypt Initialize Failure error",
    SigVerify = -229 => "Signature verify error",
    BadCond = -230 => "Bad condition variable operation error",
    SigType = -231 => "Signature type not enabled/available",
    HashType = -232 => "Hash type not enabled/available",
    KeySize = -234 => "Key size error, either too small or large",
    AsnCountrySize = -235 => "Country code size error, either too small or large",
    MissingRng = -236 => "RNG required but not provided",
    AsnPathLenSize = -237 => "ASN CA path length value too large error",
    AsnPathLenInv = -238 => "ASN CA path length larger than signer error",
    BadKeywrapAlg = -239 => "Unsupported key wrap algorithm error",
    BadKeywrapIv = -240 => "Decrypted AES key wrap IV does not match expected",
    WcCleanup = -241 => "wolfcrypt cleanup failed",
    EccCdhKatFips = -242 => "wolfcrypt FIPS ECC CDH Known Answer Test Failure",
    DhCheckPub = -243 => "DH Check Public Key failure",
    BadPath = -244 => "Bad path for opendir error",
    AsyncOp = -245 => "Async operation error",
}

impl ErrorCode {
    /// The first number below which error codes begin.
    pub const MAX_CODE_E: i32 = -100;
    /// The last (most negative) valid error number.
    pub const LAST_E: i32 = -245;
    /// Numbers within the valid range which have been retired.
    pub const MISSING: &'static [i32] = &[
        -122, -123, -124, -128, -129, -163, -164, -165, -166, -167, -168, -169, -233
    ];

    /// The raw (negative) error number.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = i32;

    /// Returns the input back if it is not a known error number.
    #[inline]
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or(value)
    }
}

impl fmt::Display for ErrorCode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps any error number to its description.
///
/// This is a total function: numbers which are retired or outside of
/// `[LAST_E, MAX_CODE_E)` produce [`UNKNOWN_ERROR`].
///
/// # Example
///
/// ```
/// use wolf_core::error::{get_error_string, UNKNOWN_ERROR};
///
/// assert_eq!(get_error_string(-173), "Bad function argument");
/// assert_eq!(get_error_string(-233), UNKNOWN_ERROR);
/// assert_eq!(get_error_string(0), UNKNOWN_ERROR);
/// ```
pub const fn get_error_string(code: i32) -> &'static str {
    match ErrorCode::from_code(code) {
        Some(code) => code.as_str(),
        None => UNKNOWN_ERROR
    }
}

/// Copies the description of `code` into `buf`, returning the number of string bytes written.
///
/// At most `min(buf.len(), MAX_ERROR_SZ) - 1` bytes of the description are copied, followed
/// by a nul terminator. The written bytes are therefore always a prefix of
/// [`get_error_string`]'s result. An empty `buf` is left untouched and `0` is returned.
///
/// # Example
///
/// ```
/// use wolf_core::error::{error_string_into, get_error_string, MAX_ERROR_SZ};
///
/// let mut buf = [0u8; MAX_ERROR_SZ];
/// let written = error_string_into(-132, &mut buf);
///
/// assert_eq!(&buf[..written], get_error_string(-132).as_bytes());
/// assert_eq!(buf[written], 0);
/// ```
pub fn error_string_into(code: i32, buf: &mut [u8]) -> usize {
    let cap = buf.len().min(MAX_ERROR_SZ);
    if cap == 0 { return 0 }

    let desc = get_error_string(code).as_bytes();
    let len = desc.len().min(cap - 1);

    buf[..len].copy_from_slice(&desc[..len]);
    buf[len] = 0;
    len
}

/// The error type for operations which report why they failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// A structurally invalid argument, detected before any cryptographic work.
    BadFuncArg,
    /// The output buffer was too small.
    Buffer {
        /// How many bytes the operation required.
        needed: usize,
        /// How many bytes were provided.
        had: usize
    },
    /// No output buffer was provided, `needed` is the required length.
    LengthOnly {
        /// How many bytes the operation requires.
        needed: usize
    },
    /// The hash algorithm is recognized but not available in this build.
    HashType,
    /// The requested functionality is not available in this build.
    NotCompiledIn,
    /// AES-GCM (or GMAC) tag verification failed.
    AesGcmAuth,
    /// AES-CCM tag verification failed.
    AesCcmAuth,
    /// A MAC (Poly1305) did not match.
    MacCmpFailed,
    /// The operation was invoked out of order.
    BadState,
    /// Padding was malformed.
    BadPadding,
    /// The key length is not supported by the algorithm.
    KeySize,
    /// The integrity check value of an unwrapped key did not match.
    BadKeywrapIv,
    /// HMAC keys must be at least 14 bytes outside of `allow-non-fips` builds.
    HmacMinKeylen,
    /// The encoded input was malformed.
    AsnInput,
    /// The operation has not completed yet, see [`Context::wait`].
    ///
    /// [`Context::wait`]: crate::context::Context::wait
    Pending,
    /// Waiting on a pending operation exceeded the configured budget.
    Timeout,
    /// The requested resources exceed what the operation may allocate.
    Memory,
}

impl Error {
    /// The [`ErrorCode`] this error corresponds to.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::BadFuncArg => ErrorCode::BadFuncArg,
            Self::Buffer { .. } => ErrorCode::Buffer,
            Self::LengthOnly { .. } => ErrorCode::LengthOnly,
            Self::HashType => ErrorCode::HashType,
            Self::NotCompiledIn => ErrorCode::NotCompiledIn,
            Self::AesGcmAuth => ErrorCode::AesGcmAuth,
            Self::AesCcmAuth => ErrorCode::AesCcmAuth,
            Self::MacCmpFailed => ErrorCode::MacCmpFailed,
            Self::BadState => ErrorCode::BadState,
            Self::BadPadding => ErrorCode::BadPadding,
            Self::KeySize => ErrorCode::KeySize,
            Self::BadKeywrapIv => ErrorCode::BadKeywrapIv,
            Self::HmacMinKeylen => ErrorCode::HmacMinKeylen,
            Self::AsnInput => ErrorCode::AsnInput,
            Self::Pending => ErrorCode::Pending,
            Self::Timeout => ErrorCode::Timeout,
            Self::Memory => ErrorCode::Memory,
        }
    }

    /// The raw (negative) error number.
    #[inline]
    pub const fn as_i32(&self) -> i32 {
        self.code().code()
    }

    /// The description of this error, without any payload.
    #[inline]
    pub const fn description(&self) -> &'static str {
        self.code().as_str()
    }

    /// `true` if this error reports a failed authentication check.
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AesGcmAuth | Self::AesCcmAuth | Self::MacCmpFailed | Self::BadKeywrapIv)
    }

    #[inline]
    pub(crate) const fn buffer(needed: usize, had: usize) -> Self {
        Self::Buffer { needed, had }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer { needed, had } => write!(
                f, "{} (needed {needed}, had {had})", self.description()
            ),
            Self::LengthOnly { needed } => write!(
                f, "{} (needed {needed})", self.description()
            ),
            _ => f.write_str(self.description())
        }
    }
}

impl From<Error> for ErrorCode {
    #[inline]
    fn from(value: Error) -> Self {
        value.code()
    }
}

impl From<Error> for i32 {
    #[inline]
    fn from(value: Error) -> Self {
        value.as_i32()
    }
}

std! { impl std::error::Error for Error {} }

/// A generic error type representing an unspecified failure in cryptographic operations.
///
/// In cryptographic contexts, it is often necessary to hide the specific reason for
/// an operation's failure to prevent leaking sensitive information to potential attackers.
/// `Unspecified` serves this purpose by providing a simple, non-descriptive error type
/// that can be used in situations where the cause of the failure should not be exposed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unspecified;

impl fmt::Display for Unspecified {
    /// Writes "Unspecified" to the formatter.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Unspecified")
    }
}

std! { impl std::error::Error for Unspecified {} }

impl From<Error> for Unspecified {
    #[inline]
    fn from(_value: Error) -> Self {
        Self
    }
}

/// Erase the reason behind a failure.
pub trait MakeOpaque<T> {
    /// Replace any error with [`Unspecified`].
    ///
    /// # Errors
    ///
    /// If `self` was an error.
    fn opaque(self) -> Result<T, Unspecified>;
}

impl<T, E> MakeOpaque<T> for Result<T, E> {
    #[inline]
    fn opaque(self) -> Result<T, Unspecified> {
        self.map_err(|_| Unspecified)
    }
}

/// Error returned when an iteration count is zero or too large.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidIters;

impl fmt::Display for InvalidIters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InvalidIters")
    }
}

std! { impl std::error::Error for InvalidIters {} }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_in_range_is_known_unless_retired() {
        for code in (ErrorCode::LAST_E..ErrorCode::MAX_CODE_E).rev() {
            let desc = get_error_string(code);
            if ErrorCode::MISSING.contains(&code) {
                assert_eq!(desc, UNKNOWN_ERROR, "{code}");
            } else {
                assert_ne!(desc, UNKNOWN_ERROR, "{code}");
                assert_eq!(ErrorCode::from_code(code).map(ErrorCode::code), Some(code));
            }
        }
    }

    #[test]
    fn all_is_complete() {
        let expected = (ErrorCode::MAX_CODE_E - ErrorCode::LAST_E) as usize
            - ErrorCode::MISSING.len();
        assert_eq!(ErrorCode::ALL.len(), expected);
        assert_eq!(ErrorCode::ALL.first().map(|c| c.code()), Some(ErrorCode::MAX_CODE_E - 1));
        assert_eq!(ErrorCode::ALL.last().map(|c| c.code()), Some(ErrorCode::LAST_E));
    }

    #[test]
    fn outside_range_is_unknown() {
        for code in [0, 1, -1, -100, -246, -1000, i32::MIN, i32::MAX] {
            assert_eq!(get_error_string(code), UNKNOWN_ERROR);
        }
    }

    #[test]
    fn buffer_form_is_prefix() {
        let mut buf = [0xAAu8; MAX_ERROR_SZ];
        for code in (ErrorCode::LAST_E - 5)..=0 {
            let written = error_string_into(code, &mut buf);
            let long = get_error_string(code);
            assert_eq!(&long.as_bytes()[..written], &buf[..written]);
            assert_eq!(buf[written], 0);
        }
    }

    #[test]
    fn buffer_form_truncates() {
        let mut small = [0u8; 4];
        assert_eq!(error_string_into(-173, &mut small), 3);
        assert_eq!(&small, b"Bad\0");
        assert_eq!(error_string_into(-173, &mut []), 0);
    }

    #[test]
    fn error_display_includes_payload() {
        let err = Error::buffer(32, 16);
        assert_eq!(err.as_i32(), -132);
        assert_eq!(
            err.to_string(),
            "Buffer error, output too small or input too big (needed 32, had 16)"
        );
        assert_eq!(Error::BadFuncArg.to_string(), "Bad function argument");
        assert_eq!(Error::LengthOnly { needed: 8 }.as_i32(), -202);
    }

    #[test]
    fn opaque_conversion() {
        let res: Result<(), Error> = Err(Error::AesGcmAuth);
        assert_eq!(res.opaque(), Err(Unspecified));
        assert!(Error::AesGcmAuth.is_auth_failure());
        assert!(!Error::BadFuncArg.is_auth_failure());
    }
}
