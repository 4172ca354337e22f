use zeroize::Zeroize;
use crate::aead::{Aad, Tag};
use crate::aes::cmac::{dbl, CmacKey, CmacRun};
use crate::aes::ctr::Keystream;
use crate::aes::{Aes, Key, BLOCK_SIZE};
use crate::{ct, Error};

/// The most header components S2V accepts alongside the plaintext.
pub const MAX_HEADERS: usize = 126;

/// A double length SIV key. The first half keys S2V, the second half keys CTR.
#[cfg_attr(test, derive(Debug, Clone, PartialEq))]
pub enum SivKey {
    Aes128([u8; 32]),
    Aes192([u8; 48]),
    Aes256([u8; 64])
}

impl SivKey {
    #[inline]
    pub const fn capacity(&self) -> usize {
        match self {
            Self::Aes128(_) => 32,
            Self::Aes192(_) => 48,
            Self::Aes256(_) => 64
        }
    }

    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        match self {
            Self::Aes128(buf) => buf.as_slice(),
            Self::Aes192(buf) => buf.as_slice(),
            Self::Aes256(buf) => buf.as_slice()
        }
    }

    /// Split into the S2V key and the CTR key.
    fn halves(&self) -> (Key, Key) {
        fn split<const N: usize>(s: &[u8]) -> ([u8; N], [u8; N]) {
            let mut a = [0u8; N];
            let mut b = [0u8; N];
            a.copy_from_slice(&s[..N]);
            b.copy_from_slice(&s[N..]);
            (a, b)
        }

        match self {
            Self::Aes128(buf) => {
                let (a, b) = split::<16>(buf);
                (Key::Aes128(a), Key::Aes128(b))
            }
            Self::Aes192(buf) => {
                let (a, b) = split::<24>(buf);
                (Key::Aes192(a), Key::Aes192(b))
            }
            Self::Aes256(buf) => {
                let (a, b) = split::<32>(buf);
                (Key::Aes256(a), Key::Aes256(b))
            }
        }
    }

    #[inline]
    pub fn zero(&mut self) {
        match self {
            Self::Aes128(buf) => buf.zeroize(),
            Self::Aes192(buf) => buf.zeroize(),
            Self::Aes256(buf) => buf.zeroize()
        }
    }
}

impl Drop for SivKey {
    fn drop(&mut self) {
        self.zero();
    }
}

impl From<[u8; 32]> for SivKey {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self::Aes128(value)
    }
}

impl From<[u8; 48]> for SivKey {
    #[inline]
    fn from(value: [u8; 48]) -> Self {
        Self::Aes192(value)
    }
}

impl From<[u8; 64]> for SivKey {
    #[inline]
    fn from(value: [u8; 64]) -> Self {
        Self::Aes256(value)
    }
}

impl TryFrom<&[u8]> for SivKey {
    type Error = Error;

    /// # Errors
    ///
    /// [`Error::KeySize`] unless `value` is 32, 48 or 64 bytes.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if let Ok(k) = <[u8; 32]>::try_from(value) {
            Ok(Self::Aes128(k))
        } else if let Ok(k) = <[u8; 48]>::try_from(value) {
            Ok(Self::Aes192(k))
        } else if let Ok(k) = <[u8; 64]>::try_from(value) {
            Ok(Self::Aes256(k))
        } else {
            Err(Error::KeySize)
        }
    }
}

#[inline]
fn xor_in(acc: &mut [u8; BLOCK_SIZE], other: &[u8]) {
    for (a, o) in acc.iter_mut().zip(other) {
        *a ^= *o;
    }
}

/// S2V over the header components and then `data`.
fn s2v<'h, I>(mac: &CmacKey, headers: I, data: &[u8]) -> [u8; BLOCK_SIZE]
    where I: IntoIterator<Item = &'h [u8]>
{
    let mut d = mac.mac(&[0u8; BLOCK_SIZE]);
    for header in headers {
        d = dbl(&d);
        xor_in(&mut d, &mac.mac(header));
    }

    let mut run = CmacRun::new();
    let mut last = if data.len() >= BLOCK_SIZE {
        let (head, tail) = data.split_at(data.len() - BLOCK_SIZE);
        run.update(mac, head);
        xor_in(&mut d, tail);
        d
    } else {
        let mut t = dbl(&d);
        xor_in(&mut t, data);
        t[data.len()] ^= 0x80;
        d.zeroize();
        t
    };
    run.update(mac, &last);
    last.zeroize();
    run.finish(mac)
}

/// The CTR counter derived from the synthetic IV, bits 63 and 31 cleared.
#[inline]
fn counter(v: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut q = *v;
    q[8] &= 0x7f;
    q[12] &= 0x7f;
    q
}

fn check_args<'h, I>(in_len: usize, out_len: usize, headers: I) -> Result<(), Error>
    where I: IntoIterator<Item = &'h [u8]>
{
    let mut count = 0usize;
    for header in headers {
        count += 1;
        if count > MAX_HEADERS || !crate::can_cast_u32(header.len()) {
            return Err(Error::BadFuncArg);
        }
    }
    if !crate::can_cast_u32(in_len) {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

/// AES-SIV (RFC 5297), deterministic authenticated encryption.
///
/// The 16 byte tag is the synthetic IV which also seeds CTR, so encrypting the same inputs
/// twice yields the same output. A repeated nonce only reveals that the messages were equal.
///
/// [`encrypt`](Self::encrypt) authenticates the associated data and, when it is non-empty, the
/// nonce as two S2V components (`wc_AesSivEncrypt`). The `_with_headers` forms take the
/// component list directly.
///
/// # Example
///
/// ```
/// use wolf_core::aead::{AesSiv, SivKey};
///
/// let siv = AesSiv::new(&SivKey::Aes256([0x5au8; 64]));
///
/// let mut cipher = [0u8; 6];
/// let tag = siv.encrypt("assoc", &[1u8; 16], b"secret", &mut cipher).unwrap();
///
/// let mut again = [0u8; 6];
/// assert_eq!(siv.encrypt("assoc", &[1u8; 16], b"secret", &mut again).unwrap(), tag);
/// assert_eq!(again, cipher);
///
/// let mut plain = [0u8; 6];
/// siv.decrypt("assoc", &[1u8; 16], &cipher, &mut plain, &tag).unwrap();
/// assert_eq!(&plain, b"secret");
/// ```
pub struct AesSiv {
    mac: CmacKey,
    ctr: Aes
}

opaque_dbg! { AesSiv }

impl AesSiv {
    /// Key the S2V and CTR ciphers from the two halves of `key`.
    pub fn new(key: &SivKey) -> Self {
        let (k1, k2) = key.halves();
        Self { mac: CmacKey::new(&k1), ctr: Aes::new(&k2) }
    }

    fn seal<'h, I>(&self, headers: I, buf: &mut [u8]) -> Tag
        where I: IntoIterator<Item = &'h [u8]>
    {
        let v = s2v(&self.mac, headers, buf);
        Keystream::new(counter(&v)).apply(&self.ctr, buf);
        Tag::new(v)
    }

    fn open<'h, I>(&self, headers: I, buf: &mut [u8], tag: &Tag) -> Result<(), Error>
        where I: IntoIterator<Item = &'h [u8]>
    {
        let mut v = [0u8; BLOCK_SIZE];
        v.copy_from_slice(tag.as_slice());
        Keystream::new(counter(&v)).apply(&self.ctr, buf);

        let ok = tag.matches_prefix(&s2v(&self.mac, headers, buf));
        ct::zero_unless(u8::from(ok), buf);

        if ok {
            Ok(())
        } else {
            log_warn!(input_len = buf.len(), "AES-SIV authentication failed");
            Err(Error::MacCmpFailed)
        }
    }

    /// Encrypt `input` into `output` under the associated data and nonce, returning the
    /// synthetic IV.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `input`, the AAD or the nonce is longer than [`u32::MAX`]
    ///   bytes.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt<A: Aad>(
        &self, aad: A, nonce: &[u8], input: &[u8], output: &mut [u8]
    ) -> Result<Tag, Error> {
        let headers = components(aad.as_bytes(), nonce);
        check_args(input.len(), output.len(), headers.clone())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        Ok(self.seal(headers, out))
    }

    /// Decrypt `input` into `output` and verify the synthetic IV `tag` (`wc_AesSivDecrypt`).
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for the argument errors of [`encrypt`](Self::encrypt), or a tag
    ///   shorter than 16 bytes.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    /// - [`Error::MacCmpFailed`] if the tag does not match, the written output is zeroed.
    pub fn decrypt<A: Aad>(
        &self, aad: A, nonce: &[u8], input: &[u8], output: &mut [u8], tag: &Tag
    ) -> Result<(), Error> {
        let headers = components(aad.as_bytes(), nonce);
        check_args(input.len(), output.len(), headers.clone())?;
        if tag.len() != Tag::CAPACITY {
            return Err(Error::BadFuncArg);
        }
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.open(headers, out, tag)
    }

    /// Encrypt `input` into `output` authenticating each of `headers` as its own S2V
    /// component (`wc_AesSivEncrypt_ex`).
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if there are more than [`MAX_HEADERS`] headers, or `input` or a
    ///   header is longer than [`u32::MAX`] bytes.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt_with_headers(
        &self, headers: &[&[u8]], input: &[u8], output: &mut [u8]
    ) -> Result<Tag, Error> {
        check_args(input.len(), output.len(), headers.iter().copied())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        Ok(self.seal(headers.iter().copied(), out))
    }

    /// Decrypt `input` into `output` under the header components (`wc_AesSivDecrypt_ex`).
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt), with the header checks of
    /// [`encrypt_with_headers`](Self::encrypt_with_headers).
    pub fn decrypt_with_headers(
        &self, headers: &[&[u8]], input: &[u8], output: &mut [u8], tag: &Tag
    ) -> Result<(), Error> {
        check_args(input.len(), output.len(), headers.iter().copied())?;
        if tag.len() != Tag::CAPACITY {
            return Err(Error::BadFuncArg);
        }
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.open(headers.iter().copied(), out, tag)
    }
}

/// The associated data, then the nonce when one is given.
#[inline]
fn components<'a>(aad: &'a [u8], nonce: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + Clone {
    core::iter::once(aad).chain((!nonce.is_empty()).then_some(nonce))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn rfc5297_deterministic() {
        // RFC 5297, A.1
        let siv = AesSiv::new(&SivKey::Aes128(hex!(
            "fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"
        )));
        let ad = hex!("101112131415161718191a1b1c1d1e1f2021222324252627");
        let plain = hex!("112233445566778899aabbccddee");

        let mut cipher = [0u8; 14];
        let tag = siv.encrypt(&ad, &[], &plain, &mut cipher).unwrap();
        assert_eq!(tag, hex!("85632d07c6e8f37f950acd320a2ecc93"));
        assert_eq!(cipher, hex!("40c02b9690c4dc04daef7f6afe5c"));

        let mut back = [0u8; 14];
        siv.decrypt(&ad, &[], &cipher, &mut back, &tag).unwrap();
        assert_eq!(back, plain);
    }

    #[test]
    fn rfc5297_nonce_based() {
        // RFC 5297, A.2
        let siv = AesSiv::new(&SivKey::Aes128(hex!(
            "7f7e7d7c7b7a79787776757473727170404142434445464748494a4b4c4d4e4f"
        )));
        let ad1 = hex!(
            "00112233445566778899aabbccddeeffdeaddadadeaddadaffeeddccbbaa99887766554433221100"
        );
        let ad2 = hex!("102030405060708090a0");
        let nonce = hex!("09f911029d74e35bd84156c5635688c0");
        let plain = hex!(
            "7468697320697320736f6d6520706c61696e7465787420746f20656e6372797074207573696e67"
            "205349562d414553"
        );
        let expected = hex!(
            "cb900f2fddbe404326601965c889bf17dba77ceb094fa663b7a3f748ba8af829ea64ad544a272e9c"
            "485b62a3fd5c0d"
        );

        let headers: [&[u8]; 3] = [&ad1, &ad2, &nonce];
        let mut cipher = [0u8; 47];
        let tag = siv.encrypt_with_headers(&headers, &plain, &mut cipher).unwrap();
        assert_eq!(tag, hex!("7bdb6e3b432667eb06f4d14bff2fbd0f"));
        assert_eq!(cipher, expected);

        let mut back = [0u8; 47];
        siv.decrypt_with_headers(&headers, &cipher, &mut back, &tag).unwrap();
        assert_eq!(back, plain);
    }

    #[test]
    fn assoc_and_nonce_components() {
        let siv = AesSiv::new(&SivKey::Aes256(core::array::from_fn(|i| i as u8)));
        let nonce: [u8; 12] = core::array::from_fn(|i| i as u8);

        let mut cipher = [0u8; 18];
        let tag = siv.encrypt("assoc", &nonce, b"deterministic aead", &mut cipher).unwrap();
        assert_eq!(tag, hex!("153ee8f55dc2828e834fe5b46ad39d26"));
        assert_eq!(cipher, hex!("5fb88ade1d6cfb558343739da94195e27921"));

        // empty associated data is still a component
        let mut cipher = [0u8; 33];
        let tag = siv.encrypt((), &[0u8; 16], &[b'x'; 33], &mut cipher).unwrap();
        assert_eq!(tag, hex!("9ad95fb9316d3d9033c82639751a00d6"));
        assert_eq!(
            cipher,
            hex!("f5fc2dbea7e42e6c102a9b36bcbdf1eb1e5292e0dad9186c65e447afa5886ece4e")
        );

        let tag = siv.encrypt((), &[], &[], &mut []).unwrap();
        assert_eq!(tag, hex!("6ff5b8ef53fc365606cd3ea047374885"));
        assert_eq!(siv.decrypt((), &[], &[], &mut [], &tag), Ok(()));
    }

    #[test]
    fn argument_errors_leave_output_alone() {
        let siv = AesSiv::new(&SivKey::Aes128([1u8; 32]));
        let mut out = [0xa5u8; 8];

        assert_eq!(siv.encrypt((), &[], &[1u8; 9], &mut out), Err(Error::buffer(9, 8)));

        let many = [&[][..]; MAX_HEADERS + 1];
        assert_eq!(siv.encrypt_with_headers(&many, &[1u8; 8], &mut out), Err(Error::BadFuncArg));
        assert!(siv.encrypt_with_headers(&many[..MAX_HEADERS], &[1u8; 8], &mut out).is_ok());
        out = [0xa5u8; 8];

        let short = Tag::from_slice(&[0u8; 12]).unwrap();
        assert_eq!(siv.decrypt((), &[], &[1u8; 8], &mut out, &short), Err(Error::BadFuncArg));
        assert_eq!(out, [0xa5u8; 8]);
    }

    #[test]
    fn tamper_rejection_zeroes_output() {
        let siv = AesSiv::new(&SivKey::Aes192([9u8; 48]));
        let plain = [0x42u8; 37];
        let mut cipher = [0u8; 37];
        let tag = siv.encrypt(b"aad", b"nonce", &plain, &mut cipher).unwrap();

        let mut flipped = cipher;
        flipped[0] ^= 1;
        let mut out = [0xffu8; 37];
        assert_eq!(siv.decrypt(b"aad", b"nonce", &flipped, &mut out, &tag), Err(Error::MacCmpFailed));
        assert_eq!(out, [0u8; 37]);

        let mut out = [0xffu8; 37];
        assert_eq!(siv.decrypt(b"aad", b"nonce!", &cipher, &mut out, &tag), Err(Error::MacCmpFailed));
        assert_eq!(out, [0u8; 37]);

        let mut bad = tag.take();
        bad[15] ^= 0x80;
        let mut out = [0xffu8; 37];
        assert_eq!(
            siv.decrypt(b"aad", b"nonce", &cipher, &mut out, &Tag::new(bad)),
            Err(Error::MacCmpFailed)
        );
        assert_eq!(out, [0u8; 37]);
    }

    #[test]
    fn key_from_slice() {
        assert_eq!(SivKey::try_from([0u8; 48].as_slice()), Ok(SivKey::Aes192([0u8; 48])));
        assert_eq!(SivKey::try_from([0u8; 16].as_slice()), Err(Error::KeySize));
        assert_eq!(SivKey::Aes256([0u8; 64]).capacity(), 64);
    }
}
