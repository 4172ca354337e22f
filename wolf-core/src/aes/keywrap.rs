//! AES Key Wrap (RFC 3394).
//!
//! Wraps key material of at least two 64 bit blocks under a key encryption key, adding one
//! 8 byte integrity block. Unwrapping verifies the integrity block against the default IV
//! `A6A6A6A6A6A6A6A6` or a caller provided one.
use zeroize::Zeroize;
use crate::aes::{Aes, Key};
use crate::ct;
use crate::Error;

/// The default initial value of RFC 3394 §2.2.3.1.
pub const DEFAULT_IV: [u8; 8] = [0xA6; 8];

/// The number of bytes wrapping adds to the input.
pub const OVERHEAD: usize = 8;

#[inline]
fn check_data(len: usize) -> Result<(), Error> {
    if len < 16 || len % 8 != 0 {
        Err(Error::BadFuncArg)
    } else {
        Ok(())
    }
}

/// Wrap `data` under `kek` into `out` (`wc_AesKeyWrap`), returning the `data.len() + 8` bytes
/// written.
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `data` is shorter than 16 bytes or not a multiple of 8.
/// - [`Error::Buffer`] if `out` is shorter than `data.len() + 8`.
///
/// # Example
///
/// ```
/// use wolf_core::aes::{Key, keywrap};
///
/// let kek = Key::Aes128([1u8; 16]);
/// let data = [7u8; 32];
///
/// let mut wrapped = [0u8; 40];
/// assert_eq!(keywrap::wrap(&kek, &data, &mut wrapped, None), Ok(40));
///
/// let mut unwrapped = [0u8; 32];
/// assert_eq!(keywrap::unwrap(&kek, &wrapped, &mut unwrapped, None), Ok(32));
/// assert_eq!(unwrapped, data);
/// ```
pub fn wrap(kek: &Key, data: &[u8], out: &mut [u8], iv: Option<&[u8; 8]>) -> Result<usize, Error> {
    check_data(data.len())?;
    let needed = data.len() + OVERHEAD;
    if out.len() < needed {
        return Err(Error::buffer(needed, out.len()));
    }

    let aes = Aes::new(kek);
    let n = data.len() / 8;
    let mut a = *iv.unwrap_or(&DEFAULT_IV);
    let out = &mut out[..needed];
    out[8..].copy_from_slice(data);

    let mut b = [0u8; 16];
    for j in 0..6u64 {
        for i in 1..=n {
            b[..8].copy_from_slice(&a);
            b[8..].copy_from_slice(&out[i * 8..i * 8 + 8]);
            aes.encrypt_block(&mut b);

            let t = (n as u64) * j + i as u64;
            a.copy_from_slice(&b[..8]);
            for (x, y) in a.iter_mut().zip(t.to_be_bytes()) {
                *x ^= y;
            }
            out[i * 8..i * 8 + 8].copy_from_slice(&b[8..]);
        }
    }

    out[..8].copy_from_slice(&a);
    b.zeroize();
    a.zeroize();
    Ok(needed)
}

/// Unwrap `wrapped` under `kek` into `out` (`wc_AesKeyUnWrap`), returning the
/// `wrapped.len() - 8` bytes written.
///
/// # Errors
///
/// - [`Error::BadFuncArg`] if `wrapped` is shorter than 24 bytes or not a multiple of 8.
/// - [`Error::Buffer`] if `out` is shorter than `wrapped.len() - 8`.
/// - [`Error::BadKeywrapIv`] if the integrity check fails, `out` is zeroed in this case.
pub fn unwrap(kek: &Key, wrapped: &[u8], out: &mut [u8], iv: Option<&[u8; 8]>) -> Result<usize, Error> {
    if wrapped.len() < OVERHEAD {
        return Err(Error::BadFuncArg);
    }
    let needed = wrapped.len() - OVERHEAD;
    check_data(needed)?;
    if out.len() < needed {
        return Err(Error::buffer(needed, out.len()));
    }

    let aes = Aes::new(kek);
    let n = needed / 8;
    let mut a = [0u8; 8];
    a.copy_from_slice(&wrapped[..8]);
    let out = &mut out[..needed];
    out.copy_from_slice(&wrapped[8..]);

    let mut b = [0u8; 16];
    for j in (0..6u64).rev() {
        for i in (1..=n).rev() {
            let t = (n as u64) * j + i as u64;
            for (x, y) in a.iter_mut().zip(t.to_be_bytes()) {
                *x ^= y;
            }
            b[..8].copy_from_slice(&a);
            b[8..].copy_from_slice(&out[(i - 1) * 8..i * 8]);
            aes.decrypt_block(&mut b);

            a.copy_from_slice(&b[..8]);
            out[(i - 1) * 8..i * 8].copy_from_slice(&b[8..]);
        }
    }
    b.zeroize();

    let ok = ct::ct_eq(a, iv.unwrap_or(&DEFAULT_IV));
    ct::zero_unless(u8::from(ok), out);
    a.zeroize();

    if ok {
        Ok(needed)
    } else {
        log_warn!(wrapped_len = wrapped.len(), "key unwrap integrity check failed");
        Err(Error::BadKeywrapIv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const DATA16: [u8; 16] = hex!("00112233445566778899aabbccddeeff");
    const DATA24: [u8; 24] = hex!("00112233445566778899aabbccddeeff0001020304050607");
    const DATA32: [u8; 32] = hex!("00112233445566778899aabbccddeeff000102030405060708090a0b0c0d0e0f");

    fn kek<const N: usize>() -> [u8; N] {
        core::array::from_fn(|i| i as u8)
    }

    fn check(kek: Key, data: &[u8], expected: &[u8]) {
        let mut wrapped = [0u8; 40];
        let n = wrap(&kek, data, &mut wrapped, None).unwrap();
        assert_eq!(n, data.len() + 8);
        assert_eq!(&wrapped[..n], expected);

        let mut plain = [0u8; 32];
        let m = unwrap(&kek, &wrapped[..n], &mut plain, None).unwrap();
        assert_eq!(&plain[..m], data);
    }

    #[test]
    fn rfc3394_4_1() {
        check(Key::Aes128(kek()), &DATA16, &hex!("1fa68b0a8112b447aef34bd8fb5a7b829d3e862371d2cfe5"));
    }

    #[test]
    fn rfc3394_4_2() {
        check(Key::Aes192(kek()), &DATA16, &hex!("96778b25ae6ca435f92b5b97c050aed2468ab8a17ad84e5d"));
    }

    #[test]
    fn rfc3394_4_3() {
        check(Key::Aes256(kek()), &DATA16, &hex!("64e8c3f9ce0f5ba263e9777905818a2a93c8191e7d6e8ae7"));
    }

    #[test]
    fn rfc3394_4_4() {
        check(
            Key::Aes192(kek()), &DATA24,
            &hex!("031d33264e15d33268f24ec260743edce1c6c7ddee725a936ba814915c6762d2")
        );
    }

    #[test]
    fn rfc3394_4_5() {
        check(
            Key::Aes256(kek()), &DATA24,
            &hex!("a8f9bc1612c68b3ff6e6f4fbe30e71e4769c8b80a32cb8958cd5d17d6b254da1")
        );
    }

    #[test]
    fn rfc3394_4_6() {
        check(
            Key::Aes256(kek()), &DATA32,
            &hex!("28c9f404c4b810f4cbccb35cfb87f8263f5786e2d80ed326cbc7f0e71a99f43bfb988b9b7a02dd21")
        );
    }

    #[test]
    fn tampered_is_rejected_and_zeroed() {
        let kek = Key::Aes128(kek());
        let mut wrapped = [0u8; 24];
        wrap(&kek, &DATA16, &mut wrapped, None).unwrap();
        wrapped[5] ^= 1;

        let mut out = [0xffu8; 16];
        assert_eq!(unwrap(&kek, &wrapped, &mut out, None), Err(Error::BadKeywrapIv));
        assert_eq!(out, [0u8; 16]);
    }

    #[test]
    fn custom_iv() {
        let kek = Key::Aes128(kek());
        let iv = [1u8; 8];
        let mut wrapped = [0u8; 24];
        wrap(&kek, &DATA16, &mut wrapped, Some(&iv)).unwrap();

        let mut out = [0u8; 16];
        assert_eq!(unwrap(&kek, &wrapped, &mut out, None), Err(Error::BadKeywrapIv));
        assert_eq!(unwrap(&kek, &wrapped, &mut out, Some(&iv)), Ok(16));
        assert_eq!(out, DATA16);
    }

    #[test]
    fn argument_errors() {
        let kek = Key::Aes128(kek());
        let mut out = [0u8; 40];
        assert_eq!(wrap(&kek, &[0u8; 8], &mut out, None), Err(Error::BadFuncArg));
        assert_eq!(wrap(&kek, &[0u8; 20], &mut out, None), Err(Error::BadFuncArg));
        assert_eq!(wrap(&kek, &[0u8; 16], &mut out[..23], None), Err(Error::buffer(24, 23)));
        assert_eq!(unwrap(&kek, &[0u8; 16], &mut out, None), Err(Error::BadFuncArg));
        assert_eq!(unwrap(&kek, &[0u8; 24], &mut out[..8], None), Err(Error::buffer(16, 8)));
    }
}

#[cfg(all(test, not(miri)))]
mod property_tests {
    use super::*;
    use crate::aes::test_utils::BoundList;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn round_trip(key in any::<Key>(), data in BoundList::<64>::with_len(2..=8)) {
            // with_len counts 8 byte blocks here
            let len = data.len() * 8;
            let mut input = [0u8; 64];
            for (i, b) in input[..len].iter_mut().enumerate() {
                *b = data.as_slice()[i % data.len()] ^ i as u8;
            }

            let mut wrapped = [0u8; 72];
            prop_assert_eq!(wrap(&key, &input[..len], &mut wrapped, None), Ok(len + 8));

            let mut plain = [0u8; 64];
            prop_assert_eq!(unwrap(&key, &wrapped[..len + 8], &mut plain, None), Ok(len));
            prop_assert_eq!(&plain[..len], &input[..len]);
        }
    }
}
