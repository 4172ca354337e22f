//! Constant-Time Programming Utilities
//!
//! Tag verification, conditional wiping of failed decryptions, and Base16 coding all go
//! through this module so that secret dependent branches are kept out of the rest of the
//! crate.
use core::hint::black_box;
use crate::opaque_res::Res;
use crate::buf::InvalidSize;
use zeroize::Zeroize;

macro_rules! smear {
    ($b:ident) => {{
        $b |= $b >> 1;
        $b |= $b >> 2;
        $b |= $b >> 4;
        $b |= $b >> 8;
        $b |= $b >> 16;
    }};
}

/// Performs a constant-time greater-than comparison.
///
/// # Returns
///
/// Returns `1` if `left > right`, otherwise `0`.
pub const fn gt(left: u32, right: u32) -> u32 {
    let gtb = left & !right;
    let mut ltb = !left & right;

    smear!(ltb);

    let mut bit = gtb & !ltb;
    // smear the highest set bit
    smear!(bit);

    bit & 1
}

#[inline(always)]
const fn create_mask(overflow: u32) -> u32 {
    !overflow.wrapping_neg()
}

#[inline(always)]
const fn mask_add(left: u32, right: u32, mask: u32) -> u32 {
    left.wrapping_add(right & mask)
}

/// Performs constant-time addition without wrapping on overflow.
///
/// On overflow the sum is `a` unchanged and the returned [`Res`] is an error. This is how
/// stream ciphers advance their 32 bit block counters without branching on the counter.
#[inline]
pub fn add_no_wrap(a: u32, b: u32) -> (u32, Res) {
    let overflow = gt(b, u32::MAX.wrapping_sub(a));
    // black_box keeps the mask from being lowered into a cmov.
    let sum = mask_add(a, b, black_box(create_mask(overflow)));
    (sum, Res::from(overflow as u8 == 0))
}

#[inline(always)]
fn volatile(byte: u8) -> u8 {
    // SAFETY: reading from a valid reference to a local.
    unsafe { core::ptr::read_volatile(&byte) }
}

#[inline(always)]
fn eq_hsb(xor: u8) -> u8 {
    volatile(xor | volatile(xor.wrapping_neg())) >> 7
}

/// Compares two bytes in constant time, returning `1` if they are equal and `0` otherwise.
#[inline(always)]
pub fn byte_eq(a: u8, b: u8) -> u8 {
    // the volatile read of the high bit keeps LLVM from turning this back into an icmp.
    eq_hsb(b ^ a) ^ volatile(1)
}

/// Compare two slices in constant-time.
///
/// # Note
///
/// If the length of slice `a` and slice `b` are not equivalent, this will exit early. In short,
/// there is variable timing on length comparisons.
///
/// # Warning
///
/// Constant-time programming is nuanced, this implementation provides a *best-effort*
/// constant-time equivalence check.
///
/// # Returns
///
/// * `0`: `a != b`
/// * `1`: `a == b`
#[must_use]
pub fn cmp_slice(a: &[u8], b: &[u8]) -> u8 {
    if a.len() != b.len() { return 0 }

    let mut res = volatile(1u8);

    for (l, r) in a.chunks_exact(4).zip(b.chunks_exact(4)) {
        res &= byte_eq(l[0], r[0]);
        res &= byte_eq(l[1], r[1]);
        res &= byte_eq(l[2], r[2]);
        res &= byte_eq(l[3], r[3]);
    }

    let tail = a.len() & !3;
    for (l, r) in a[tail..].iter().zip(&b[tail..]) {
        res &= byte_eq(*l, *r);
    }

    res
}

/// Compare two slices in constant-time.
///
/// # Arguments
///
/// The two arguments being compared in constant-time, both of these arguments must implement
/// `AsRef<[u8]>` (such as `&str`, `&[u8]` itself, etc.)
///
/// # Note
///
/// If the length of slice `a` and slice `b` are not equivalent, this will exit early. In short,
/// there is variable timing on length comparisons.
///
/// # Returns
///
/// `true` if `a == b`, `false` otherwise.
#[must_use]
pub fn ct_eq<A: AsRef<[u8]>, B: AsRef<[u8]>>(a: A, b: B) -> bool {
    cmp_slice(a.as_ref(), b.as_ref()) != 0
}

/// Wipe `buf` unless `keep` is `1`.
///
/// Every byte is rewritten regardless of `keep`, the mask decides whether the original value
/// or zero lands in it. Failed AEAD decryptions use this so callers never observe unauthenticated
/// plaintext.
pub fn zero_unless(keep: u8, buf: &mut [u8]) {
    let mask = black_box(0u8.wrapping_sub(keep & 1));
    for byte in buf.iter_mut() {
        *byte &= mask;
    }
    if keep & 1 == 0 {
        // make the wipe observable to the optimizer.
        buf.zeroize();
    }
}

/// Length of the Base16 encoding of `len` bytes.
#[must_use]
#[inline]
pub const fn hex_encode_len(len: usize) -> usize {
    len << 1
}

/// The lowercase digit for a nibble, `n < 16`.
#[inline(always)]
const fn hex_digit(n: u8) -> u8 {
    // top bit set iff n > 9
    let alpha = (9u8.wrapping_sub(n) >> 7).wrapping_neg();
    b'0' + n + (alpha & (b'a' - b'0' - 10))
}

#[inline]
fn encode_into(input: &[u8], output: &mut [u8]) {
    for (byte, pair) in input.iter().zip(output.chunks_exact_mut(2)) {
        pair[0] = hex_digit(byte >> 4);
        pair[1] = hex_digit(byte & 0x0f);
    }
}

/// Constant-time Base16 encoding, lowercase (`Base16_Encode`).
///
/// Returns the number of bytes written, always `input.len() * 2`.
///
/// # Errors
///
/// [`InvalidSize`] if `output` cannot hold the encoding.
///
/// # Example
///
/// ```
/// use wolf_core::ct::{hex_encode, ct_eq};
///
/// let mut output = [0u8; 10];
/// let len = hex_encode(b"\x00\x1f\xa0\xff\x42", &mut output).unwrap();
///
/// assert_eq!(len, 10);
/// assert!(ct_eq(&output, b"001fa0ff42"));
/// ```
pub fn hex_encode(input: &[u8], output: &mut [u8]) -> Result<usize, InvalidSize> {
    let len = hex_encode_len(input.len());
    if output.len() < len {
        return Err(InvalidSize);
    }
    encode_into(input, &mut output[..len]);
    Ok(len)
}

/// [`hex_encode`] returning the written digits as a `&str`.
///
/// # Errors
///
/// As [`hex_encode`].
///
/// # Example
///
/// ```
/// use wolf_core::ct::hex_encode_str;
///
/// let mut output = [0u8; 8];
/// assert_eq!(hex_encode_str(&[0xde, 0xad, 0xbe, 0xef], &mut output).unwrap(), "deadbeef");
/// ```
#[inline]
pub fn hex_encode_str<'o>(input: &[u8], output: &'o mut [u8]) -> Result<&'o str, InvalidSize> {
    let len = hex_encode(input, output)?;
    // SAFETY: `hex_digit` only yields ASCII `[0-9a-f]`.
    Ok(unsafe { core::str::from_utf8_unchecked(&output[..len]) })
}

alloc! {
    /// [`hex_encode`] into a new `String`.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::ct::{hex_encode_alloc, hex_decode_alloc};
    ///
    /// let encoded = hex_encode_alloc(b"wolf");
    /// assert_eq!(encoded, "776f6c66");
    /// assert_eq!(hex_decode_alloc(encoded.as_bytes()).unwrap(), b"wolf");
    /// ```
    pub fn hex_encode_alloc(input: &[u8]) -> alloc::string::String {
        let mut output = alloc::vec![0u8; hex_encode_len(input.len())];
        encode_into(input, &mut output);
        // SAFETY: every byte was written by `hex_digit`.
        unsafe { alloc::string::String::from_utf8_unchecked(output) }
    }
}

/// All ones when `lo <= c <= hi`, zero otherwise. `c` is a byte widened to `u16`.
#[inline(always)]
const fn in_range(c: u16, lo: u8, hi: u8) -> u16 {
    let below = c.wrapping_sub(lo as u16) >> 15;
    let above = (hi as u16).wrapping_sub(c) >> 15;
    ((below | above) ^ 1).wrapping_neg()
}

/// The value of a digit of either case, or `0x100` for anything else.
#[inline(always)]
const fn hex_value(c: u8) -> u16 {
    let c = c as u16;
    let digit = in_range(c, b'0', b'9');
    let lower = in_range(c, b'a', b'f');
    let upper = in_range(c, b'A', b'F');

    (digit & c.wrapping_sub(b'0' as u16))
        | (lower & c.wrapping_sub(b'a' as u16 - 10))
        | (upper & c.wrapping_sub(b'A' as u16 - 10))
        | (!(digit | lower | upper) & 0x100)
}

/// Why [`hex_decode`] failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HexError {
    /// A byte outside `[0-9a-fA-F]`.
    Encoding,
    /// An odd input length, or an output too short for the decoding.
    Size
}

impl From<InvalidSize> for HexError {
    fn from(_value: InvalidSize) -> Self {
        Self::Size
    }
}

impl From<HexError> for crate::Error {
    /// `Base16_Decode` reports bad digits as `ASN_INPUT_E` and bad lengths as `BAD_FUNC_ARG`.
    fn from(value: HexError) -> Self {
        match value {
            HexError::Encoding => Self::AsnInput,
            HexError::Size => Self::BadFuncArg
        }
    }
}

impl core::fmt::Display for HexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Encoding => "invalid hex digit",
            Self::Size => "invalid hex length or output size"
        })
    }
}

std! { impl std::error::Error for HexError {} }

/// Constant-time Base16 decoding of either case (`Base16_Decode`).
///
/// Every pair is decoded before the error, if any, is reported. Returns `input.len() / 2`.
///
/// # Errors
///
/// - [`HexError::Size`] if `input` has odd length or `output` is too short.
/// - [`HexError::Encoding`] if any byte is not a hex digit.
pub fn hex_decode(input: &[u8], output: &mut [u8]) -> Result<usize, HexError> {
    let len = input.len() >> 1;
    if input.len() & 1 != 0 || output.len() < len {
        return Err(HexError::Size);
    }

    let mut bad = 0u16;
    for (pair, out) in input.chunks_exact(2).zip(output.iter_mut()) {
        let hi = hex_value(pair[0]);
        let lo = hex_value(pair[1]);
        bad |= hi | lo;
        *out = ((hi << 4) | lo) as u8;
    }

    if bad & 0x100 == 0 {
        Ok(len)
    } else {
        Err(HexError::Encoding)
    }
}

alloc! {
    /// [`hex_decode`] into a new `Vec`.
    ///
    /// # Errors
    ///
    /// As [`hex_decode`], [`HexError::Size`] only for an odd length.
    pub fn hex_decode_alloc(input: &[u8]) -> Result<alloc::vec::Vec<u8>, HexError> {
        let mut output = alloc::vec![0u8; input.len() >> 1];
        hex_decode(input, &mut output)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmp_slice_eq_smoke() {
        let a = [3u8; 17];
        let mut b = [3u8; 17];

        assert_eq!(cmp_slice(a.as_slice(), b.as_slice()), 1);
        b[16] = 4;
        assert_eq!(cmp_slice(a.as_slice(), b.as_slice()), 0);
        assert_eq!(cmp_slice(&a[..3], &b[..4]), 0);
    }

    #[test]
    fn hex_digits() {
        let digits: [u8; 16] = core::array::from_fn(|n| hex_digit(n as u8));
        assert_eq!(&digits, b"0123456789abcdef");

        for c in 0..=255u8 {
            let expected = (c as char).to_digit(16).map_or(0x100, |d| d as u16);
            assert_eq!(hex_value(c), expected, "{c:#04x}");
        }
    }

    #[test]
    fn hex_decode_either_case() {
        let mut dec = [0u8; 4];
        assert_eq!(hex_decode(b"DEADbeef", &mut dec), Ok(4));
        assert_eq!(dec, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn hex_errors() {
        let mut out = [0u8; 8];
        // characters just outside each digit range
        for bad in [b"/0", b"0:", b"@0", b"0G", b"`0", b"0g"] {
            assert_eq!(hex_decode(bad, &mut out), Err(HexError::Encoding));
        }
        assert_eq!(hex_decode(b"abc", &mut out), Err(HexError::Size));
        assert_eq!(hex_decode(&[b'0'; 18], &mut out), Err(HexError::Size));
        assert_eq!(hex_encode(&[0u8; 5], &mut out), Err(InvalidSize));
        assert_eq!(crate::Error::from(HexError::Encoding), crate::Error::AsnInput);
    }

    #[test]
    fn zero_unless_wipes() {
        let mut buf = [0xAAu8; 33];
        zero_unless(1, &mut buf);
        assert_eq!(buf, [0xAA; 33]);
        zero_unless(0, &mut buf);
        assert_eq!(buf, [0; 33]);
    }
}
