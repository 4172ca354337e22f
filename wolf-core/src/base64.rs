//! Base64 (RFC 4648, standard alphabet) in the line broken PEM layout.
//!
//! [`encode`] inserts a `\n` after every 64 output characters and after the final partial
//! line, [`encode_no_nl`] produces a single unbroken line. [`decode`] accepts either, skipping
//! `\r`, `\n` and spaces.
//!
//! # Example
//!
//! ```
//! use wolf_core::base64;
//! use wolf_core::Error;
//!
//! let needed = match base64::encode(b"abc", None) {
//!     Err(Error::LengthOnly { needed }) => needed,
//!     _ => unreachable!()
//! };
//! assert_eq!(needed, 5);
//!
//! let mut buf = [0u8; 5];
//! assert_eq!(base64::encode(b"abc", Some(&mut buf)), Ok(5));
//! assert_eq!(&buf, b"YWJj\n");
//!
//! let mut plain = [0u8; 3];
//! assert_eq!(base64::decode(&buf, &mut plain), Ok(3));
//! assert_eq!(&plain, b"abc");
//! ```
use crate::error::Error;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: u8 = b'=';

/// Characters per line in the line broken form.
pub const LINE_SZ: usize = 64;

/// Length of the unbroken encoding of `len` bytes.
#[inline]
pub const fn encoded_len_no_nl(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Length of the line broken encoding of `len` bytes, including every `\n`.
#[inline]
pub const fn encoded_len(len: usize) -> usize {
    let chars = encoded_len_no_nl(len);
    chars + chars.div_ceil(LINE_SZ)
}

#[inline]
const fn sextet(v: u32) -> u8 {
    ALPHABET[(v & 0x3f) as usize]
}

fn encode_impl(input: &[u8], out: Option<&mut [u8]>, breaks: bool) -> Result<usize, Error> {
    let needed = if breaks { encoded_len(input.len()) } else { encoded_len_no_nl(input.len()) };

    let Some(out) = out else {
        return Err(Error::LengthOnly { needed });
    };
    if out.len() < needed {
        return Err(Error::buffer(needed, out.len()));
    }

    let mut pos = 0usize;
    let mut line = 0usize;

    let mut push = |out: &mut [u8], byte: u8| {
        out[pos] = byte;
        pos += 1;
        line += 1;
        if breaks && line == LINE_SZ {
            out[pos] = b'\n';
            pos += 1;
            line = 0;
        }
    };

    for chunk in input.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = chunk.get(1).map_or(0, |b| u32::from(*b));
        let b2 = chunk.get(2).map_or(0, |b| u32::from(*b));
        let n = (b0 << 16) | (b1 << 8) | b2;

        push(out, sextet(n >> 18));
        push(out, sextet(n >> 12));
        push(out, if chunk.len() > 1 { sextet(n >> 6) } else { PAD });
        push(out, if chunk.len() > 2 { sextet(n) } else { PAD });
    }

    if breaks && line != 0 {
        out[pos] = b'\n';
        pos += 1;
    }

    debug_assert_eq!(pos, needed);
    Ok(pos)
}

/// Encode `input`, breaking lines every 64 characters.
///
/// # Errors
///
/// - [`Error::LengthOnly`] if `out` is `None`, carrying the required length.
/// - [`Error::Buffer`] if `out` is too small.
#[inline]
pub fn encode(input: &[u8], out: Option<&mut [u8]>) -> Result<usize, Error> {
    encode_impl(input, out, true)
}

/// Encode `input` as a single line with no `\n`.
///
/// # Errors
///
/// See [`encode`].
#[inline]
pub fn encode_no_nl(input: &[u8], out: Option<&mut [u8]>) -> Result<usize, Error> {
    encode_impl(input, out, false)
}

#[inline]
const fn decode_char(c: u8) -> Option<u8> {
    match c {
        b'A'..=b'Z' => Some(c - b'A'),
        b'a'..=b'z' => Some(c - b'a' + 26),
        b'0'..=b'9' => Some(c - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None
    }
}

#[inline]
const fn is_skipped(c: u8) -> bool {
    matches!(c, b'\n' | b'\r' | b' ')
}

/// The number of bytes `input` decodes to.
///
/// # Errors
///
/// [`Error::AsnInput`] if `input` is not well formed.
pub fn decoded_len(input: &[u8]) -> Result<usize, Error> {
    let mut chars = 0usize;
    let mut pads = 0usize;

    for &c in input {
        if is_skipped(c) { continue }
        if c == PAD {
            pads += 1;
        } else if pads != 0 || decode_char(c).is_none() {
            // data after padding, or outside of the alphabet
            return Err(Error::AsnInput);
        }
        chars += 1;
    }

    if chars % 4 != 0 || pads > 2 {
        return Err(Error::AsnInput);
    }

    Ok(chars / 4 * 3 - pads)
}

/// Decode `input` into `out`, returning the number of bytes written.
///
/// # Errors
///
/// - [`Error::AsnInput`] for characters outside of the alphabet, misplaced padding, or a
///   length which is not a multiple of four once whitespace is removed.
/// - [`Error::Buffer`] if `out` is too small.
pub fn decode(input: &[u8], out: &mut [u8]) -> Result<usize, Error> {
    let needed = decoded_len(input)?;
    if out.len() < needed {
        return Err(Error::buffer(needed, out.len()));
    }

    let mut quad = [0u8; 4];
    let mut q = 0usize;
    let mut written = 0usize;

    for &c in input.iter().filter(|c| !is_skipped(**c)) {
        quad[q] = c;
        q += 1;
        if q < 4 { continue }
        q = 0;

        let mut n = 0u32;
        let mut valid = 0usize;
        for &ch in &quad {
            n <<= 6;
            if let Some(v) = decode_char(ch) {
                n |= u32::from(v);
                valid += 1;
            }
        }

        // decoded_len already rejected padding in the first two positions of a quad
        let bytes = n.to_be_bytes();
        let take = valid - 1;
        out[written..written + take].copy_from_slice(&bytes[1..=take]);
        written += take;
    }

    Ok(written)
}

alloc! {
    /// Encode `input` with line breaks into a freshly allocated `String`.
    pub fn encode_alloc(input: &[u8]) -> alloc::string::String {
        let mut out = alloc::vec![0u8; encoded_len(input.len())];
        // the buffer is exactly the required size
        let _ = encode(input, Some(&mut out));
        // the alphabet, padding and newline are all ASCII
        out.into_iter().map(char::from).collect()
    }

    /// Decode `input` into a freshly allocated `Vec`.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn decode_alloc(input: &[u8]) -> Result<alloc::vec::Vec<u8>, Error> {
        let mut out = alloc::vec![0u8; decoded_len(input)?];
        let len = decode(input, &mut out)?;
        out.truncate(len);
        Ok(out)
    }
}
