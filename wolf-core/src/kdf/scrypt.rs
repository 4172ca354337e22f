//! The `scrypt` memory hard password based key derivation function ([`RFC 7914`][1]).
//!
//! `scrypt` needs `128 * r * (N + p + 2)` bytes of scratch memory, which is allocated on the
//! heap for the duration of the call.
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc7914
use alloc::vec::Vec;
use core::num::NonZeroU32;
use zeroize::Zeroize;

use crate::Error;
use crate::kdf::{Iters, Salt, salt::Empty, Sha256};
use crate::kdf::pbkdf::pbkdf2_imp;

const WORDS_PER_SALSA: usize = 16;

#[inline(always)]
fn quarter(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

/// `Salsa20/8`, applied in place.
fn salsa20_8(b: &mut [u32; 16]) {
    let mut x = *b;
    for _ in 0..4 {
        quarter(&mut x, 0, 4, 8, 12);
        quarter(&mut x, 5, 9, 13, 1);
        quarter(&mut x, 10, 14, 2, 6);
        quarter(&mut x, 15, 3, 7, 11);

        quarter(&mut x, 0, 1, 2, 3);
        quarter(&mut x, 5, 6, 7, 4);
        quarter(&mut x, 10, 11, 8, 9);
        quarter(&mut x, 15, 12, 13, 14);
    }
    for (out, mixed) in b.iter_mut().zip(x) {
        *out = out.wrapping_add(mixed);
    }
    x.zeroize();
}

/// `scryptBlockMix` from `input` into `output`, both `2 * r` Salsa blocks.
fn block_mix(input: &[u32], output: &mut [u32], r: usize) {
    let mut x = [0u32; WORDS_PER_SALSA];
    x.copy_from_slice(&input[(2 * r - 1) * WORDS_PER_SALSA..]);

    for (i, block) in input.chunks_exact(WORDS_PER_SALSA).enumerate() {
        for (a, b) in x.iter_mut().zip(block) {
            *a ^= *b;
        }
        salsa20_8(&mut x);

        // even blocks fill the first half, odd blocks the second
        let at = (i / 2 + (i & 1) * r) * WORDS_PER_SALSA;
        output[at..at + WORDS_PER_SALSA].copy_from_slice(&x);
    }

    x.zeroize();
}

#[inline]
fn integerify(x: &[u32], r: usize) -> u64 {
    let k = (2 * r - 1) * WORDS_PER_SALSA;
    u64::from(x[k]) | (u64::from(x[k + 1]) << 32)
}

/// `scryptROMix` over one `128 * r` byte block of `B`.
fn ro_mix(block: &mut [u8], v: &mut [u32], xy: &mut [u32], r: usize, n: u64) {
    let words = 32 * r;
    let (mut x, mut y) = xy.split_at_mut(words);

    for (w, bytes) in x.iter_mut().zip(block.chunks_exact(4)) {
        *w = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    for v_i in v.chunks_exact_mut(words) {
        v_i.copy_from_slice(x);
        block_mix(x, y, r);
        core::mem::swap(&mut x, &mut y);
    }

    for _ in 0..n {
        // n is a power of two no larger than v, the index stays in bounds
        let j = (integerify(x, r) & (n - 1)) as usize;
        for (a, b) in x.iter_mut().zip(&v[j * words..(j + 1) * words]) {
            *a ^= *b;
        }
        block_mix(x, y, r);
        core::mem::swap(&mut x, &mut y);
    }

    for (bytes, w) in block.chunks_exact_mut(4).zip(x.iter()) {
        bytes.copy_from_slice(&w.to_le_bytes());
    }
}

fn zeroed_words(len: usize) -> Result<Vec<u32>, Error> {
    let mut words = Vec::new();
    words.try_reserve_exact(len).map_err(|_| {
        log_warn!(words = len, "scrypt scratch allocation refused");
        Error::Memory
    })?;
    words.resize(len, 0);
    Ok(words)
}

fn check_params(cost: u8, block_size: u32, parallel: u32, out_len: usize) -> Result<(), Error> {
    if block_size == 0 || parallel == 0 {
        return Err(Error::BadFuncArg);
    }
    // N < 2^(128 * r / 8)
    if cost == 0 || u64::from(cost) >= 16 * u64::from(block_size) {
        log_debug!(cost, block_size, "scrypt cost out of range");
        return Err(Error::BadFuncArg);
    }
    // p <= ((2^32 - 1) * 32) / (128 * r)
    if u64::from(parallel) * u64::from(block_size) > 0x3fff_ffff {
        return Err(Error::BadFuncArg);
    }
    if out_len as u64 > u64::from(u32::MAX) * 32 {
        return Err(Error::BadFuncArg);
    }
    Ok(())
}

/// Derive `out.len()` bytes with `N = 2^cost` (`wc_scrypt`).
///
/// # Arguments
///
/// * `password` - The password, may be empty.
/// * `salt` - The salt, may be empty.
/// * `cost` - `log2(N)`, the CPU/memory cost.
/// * `block_size` - `r`, the block size factor.
/// * `parallel` - `p`, the parallelization factor.
/// * `out` - The buffer to fill with derived key material.
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `block_size` or `parallel` is zero.
/// - [`Error::BadFuncArg`] if `cost` is zero or `N` is not below `2^(16 * r)`.
/// - [`Error::BadFuncArg`] if `p * r` exceeds `2^30 - 1` or `out` is longer than
///   `(2^32 - 1) * 32` bytes.
/// - [`Error::Memory`] if the scratch memory cannot be allocated.
///
/// # Example
///
/// ```
/// use wolf_core::kdf::scrypt;
///
/// let mut key = [0u8; 32];
/// scrypt(b"hunter2 is a bad password", b"NaCl", 10, 8, 1, &mut key).unwrap();
/// ```
pub fn scrypt(
    password: &[u8],
    salt: impl Salt<Empty>,
    cost: u8,
    block_size: u32,
    parallel: u32,
    out: &mut [u8]
) -> Result<(), Error> {
    check_params(cost, block_size, parallel, out.len())?;
    // cost < 64 as the scratch size would not be addressable otherwise
    let n = 1u64.checked_shl(u32::from(cost)).ok_or(Error::Memory)?;
    let r = block_size as usize;
    let p = parallel as usize;

    let v_words = usize::try_from(n).ok()
        .and_then(|n| n.checked_mul(32 * r))
        .ok_or(Error::Memory)?;
    let b_len = (128 * r).checked_mul(p).ok_or(Error::Memory)?;

    let mut b = Vec::new();
    b.try_reserve_exact(b_len).map_err(|_| Error::Memory)?;
    b.resize(b_len, 0u8);
    let mut v = zeroed_words(v_words)?;
    let mut xy = zeroed_words(64 * r)?;

    let one = Iters::from(NonZeroU32::MIN);
    let salt = salt.as_bytes();

    let res = pbkdf2_imp::<Sha256>(password, salt, one, &mut b)
        .map(|()| {
            for block in b.chunks_exact_mut(128 * r) {
                ro_mix(block, &mut v, &mut xy, r, n);
            }
        })
        .and_then(|()| pbkdf2_imp::<Sha256>(password, &b, one, out));

    b.zeroize();
    v.zeroize();
    xy.zeroize();
    res
}

/// [`scrypt`] taking `N` itself rather than its logarithm (`wc_scrypt_ex`).
///
/// # Errors
///
/// [`Error::BadFuncArg`] if `iterations` is not a power of two, otherwise see [`scrypt`].
pub fn scrypt_ex(
    password: &[u8],
    salt: impl Salt<Empty>,
    iterations: u32,
    block_size: u32,
    parallel: u32,
    out: &mut [u8]
) -> Result<(), Error> {
    if !iterations.is_power_of_two() {
        return Err(Error::BadFuncArg);
    }
    scrypt(password, salt, iterations.trailing_zeros() as u8, block_size, parallel, out)
}
