use zeroize::Zeroize;
use crate::aead::{Aad, Tag};
use crate::aes::cmac::{CmacKey, CmacRun};
use crate::aes::ctr::Keystream;
use crate::aes::{Direction, Key, BLOCK_SIZE};
use crate::{ct, Error};

/// The shortest tag [`AesEax`] produces or accepts.
pub const MIN_TAG_LEN: usize = 4;

/// `OMAC^t`, CMAC over a block holding the tweak `t` followed by the data.
struct Omac(CmacRun);

impl Omac {
    fn new(key: &CmacKey, tweak: u8) -> Self {
        let mut prefix = [0u8; BLOCK_SIZE];
        prefix[BLOCK_SIZE - 1] = tweak;
        let mut run = CmacRun::new();
        run.update(key, &prefix);
        Self(run)
    }

    fn of(key: &CmacKey, tweak: u8, data: &[u8]) -> [u8; BLOCK_SIZE] {
        let mut omac = Self::new(key, tweak);
        omac.0.update(key, data);
        omac.0.finish(key)
    }
}

#[inline]
fn xor3(n: &[u8; BLOCK_SIZE], h: &[u8; BLOCK_SIZE], c: &[u8; BLOCK_SIZE]) -> Tag {
    let mut tag = Tag::new_zeroed();
    for (((t, n), h), c) in tag.as_mut_array().iter_mut().zip(n).zip(h).zip(c) {
        *t = n ^ h ^ c;
    }
    tag
}

#[inline]
fn valid_tag_len(len: usize) -> bool {
    (MIN_TAG_LEN..=Tag::CAPACITY).contains(&len)
}

fn check_args<A: Aad>(in_len: usize, out_len: usize, aad: &A, tag_len: usize) -> Result<(), Error> {
    if !crate::can_cast_u32(in_len) || !aad.is_valid_size() || !valid_tag_len(tag_len) {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

/// AES-EAX (Bellare, Rogaway and Wagner), built from CMAC and CTR under one key.
///
/// The nonce may be any length. Tags are 4 to 16 bytes.
///
/// # Example
///
/// ```
/// use wolf_core::{aead::AesEax, aes::Key};
///
/// let eax = AesEax::new(&Key::Aes256([0x0fu8; 32]));
/// let nonce = [1u8; 16];
///
/// let mut cipher = [0u8; 5];
/// let tag = eax.encrypt(&nonce, b"hello", &mut cipher, (), 16).unwrap();
///
/// let mut plain = [0u8; 5];
/// eax.decrypt(&nonce, &cipher, &mut plain, (), &tag).unwrap();
/// assert_eq!(&plain, b"hello");
/// ```
pub struct AesEax {
    key: CmacKey
}

opaque_dbg! { AesEax }

impl AesEax {
    /// Key a new AES-EAX instance.
    pub fn new(key: &Key) -> Self {
        Self { key: CmacKey::new(key) }
    }

    fn seal(&self, nonce: &[u8], aad: &[u8], buf: &mut [u8], tag_len: usize) -> Tag {
        let n = Omac::of(&self.key, 0, nonce);
        let h = Omac::of(&self.key, 1, aad);
        Keystream::new(n).apply(&self.key.aes, buf);
        let c = Omac::of(&self.key, 2, buf);

        let mut tag = xor3(&n, &h, &c);
        tag.truncate(tag_len);
        tag
    }

    fn open(&self, nonce: &[u8], aad: &[u8], buf: &mut [u8], tag: &Tag) -> Result<(), Error> {
        let n = Omac::of(&self.key, 0, nonce);
        let h = Omac::of(&self.key, 1, aad);
        let c = Omac::of(&self.key, 2, buf);
        Keystream::new(n).apply(&self.key.aes, buf);

        let ok = tag.matches_prefix(&xor3(&n, &h, &c).take());
        ct::zero_unless(u8::from(ok), buf);

        if ok {
            Ok(())
        } else {
            log_warn!(
                input_len = buf.len(), aad_len = aad.len(), tag_len = tag.len(),
                "AES-EAX authentication failed"
            );
            Err(Error::MacCmpFailed)
        }
    }

    /// Encrypt `input` into `output` (`wc_AesEaxEncryptAuth`), returning a `tag_len` byte tag.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `tag_len` is not 4..=16, or `input` or the AAD is longer than
    ///   [`u32::MAX`] bytes.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn encrypt<A: Aad>(
        &self, nonce: &[u8], input: &[u8], output: &mut [u8], aad: A, tag_len: usize
    ) -> Result<Tag, Error> {
        check_args(input.len(), output.len(), &aad, tag_len)?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        Ok(self.seal(nonce, aad.as_bytes(), out, tag_len))
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt), minus the buffer check.
    pub fn encrypt_in_place<A: Aad>(
        &self, nonce: &[u8], buf: &mut [u8], aad: A, tag_len: usize
    ) -> Result<Tag, Error> {
        check_args(buf.len(), buf.len(), &aad, tag_len)?;
        Ok(self.seal(nonce, aad.as_bytes(), buf, tag_len))
    }

    /// Decrypt `input` into `output` and verify `tag` (`wc_AesEaxDecryptAuth`).
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for the argument errors of [`encrypt`](Self::encrypt), with the
    ///   tag length taken from `tag`.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    /// - [`Error::MacCmpFailed`] if the tag does not match, the written output is zeroed.
    pub fn decrypt<A: Aad>(
        &self, nonce: &[u8], input: &[u8], output: &mut [u8], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        check_args(input.len(), output.len(), &aad, tag.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.open(nonce, aad.as_bytes(), out, tag)
    }

    /// Decrypt `buf` in place and verify `tag`.
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt), `buf` is zeroed on authentication failure.
    pub fn decrypt_in_place<A: Aad>(
        &self, nonce: &[u8], buf: &mut [u8], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        check_args(buf.len(), buf.len(), &aad, tag.len())?;
        self.open(nonce, aad.as_bytes(), buf, tag)
    }
}

/// Incremental AES-EAX (`wc_AesEaxInit` / `EncryptUpdate` / `DecryptUpdate` / `EncryptFinal` /
/// `DecryptFinal`).
///
/// EAX authenticates the AAD independently of the data, so AAD may be added at any point
/// before the final call. The first data call fixes the direction, a later call in the other
/// direction is refused with [`Error::BadState`].
///
/// # Warning
///
/// Decrypted data is released before the tag is checked. Do not act on it until
/// [`decrypt_final`](Self::decrypt_final) succeeds.
///
/// # Example
///
/// ```
/// use wolf_core::{aead::{AesEax, AesEaxStream}, aes::Key};
///
/// let key = Key::Aes128([3u8; 16]);
/// let mut data = *b"streamed in two parts";
///
/// let mut enc = AesEaxStream::new(&key, &[9u8; 16], "hdr").unwrap();
/// enc.encrypt_update_in_place(&mut data[..10]).unwrap();
/// enc.encrypt_update_in_place(&mut data[10..]).unwrap();
/// let tag = enc.encrypt_final(16).unwrap();
///
/// let mut plain = [0u8; 21];
/// AesEax::new(&key).decrypt(&[9u8; 16], &data, &mut plain, "hdr", &tag).unwrap();
/// assert_eq!(&plain, b"streamed in two parts");
/// ```
pub struct AesEaxStream {
    key: CmacKey,
    n: [u8; BLOCK_SIZE],
    ks: Keystream,
    header: Omac,
    cipher: Omac,
    aad_len: u64,
    data_len: u64,
    direction: Option<Direction>
}

opaque_dbg! { AesEaxStream }

impl AesEaxStream {
    /// Key a stream for `nonce` with an initial piece of AAD.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if the AAD is longer than [`u32::MAX`] bytes.
    pub fn new<A: Aad>(key: &Key, nonce: &[u8], aad: A) -> Result<Self, Error> {
        if !aad.is_valid_size() {
            return Err(Error::BadFuncArg);
        }
        let key = CmacKey::new(key);
        let n = Omac::of(&key, 0, nonce);
        let mut header = Omac::new(&key, 1);
        header.0.update(&key, aad.as_bytes());
        let cipher = Omac::new(&key, 2);

        Ok(Self {
            ks: Keystream::new(n),
            key,
            n,
            header,
            cipher,
            aad_len: aad.as_bytes().len() as u64,
            data_len: 0,
            direction: None
        })
    }

    /// Absorb more AAD.
    ///
    /// # Errors
    ///
    /// [`Error::BadFuncArg`] if the total AAD would exceed [`u32::MAX`] bytes.
    pub fn update_aad<A: Aad>(&mut self, aad: A) -> Result<(), Error> {
        let aad = aad.as_bytes();
        match self.aad_len.checked_add(aad.len() as u64) {
            Some(total) if total <= u64::from(u32::MAX) => {
                self.header.0.update(&self.key, aad);
                self.aad_len = total;
                Ok(())
            },
            _ => Err(Error::BadFuncArg)
        }
    }

    fn enter(&mut self, dir: Direction, len: usize) -> Result<(), Error> {
        match self.direction {
            Some(current) if current != dir => {
                log_debug!(?current, requested = ?dir, "EAX stream direction mismatch");
                return Err(Error::BadState);
            },
            _ => {}
        }
        match self.data_len.checked_add(len as u64) {
            Some(total) if total <= u64::from(u32::MAX) => {
                self.direction = Some(dir);
                self.data_len = total;
                Ok(())
            },
            _ => Err(Error::BadFuncArg)
        }
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// - [`Error::BadState`] if the stream is decrypting.
    /// - [`Error::BadFuncArg`] if the total data would exceed [`u32::MAX`] bytes.
    pub fn encrypt_update_in_place(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.enter(Direction::Encrypt, buf.len())?;
        self.ks.apply(&self.key.aes, buf);
        self.cipher.0.update(&self.key, buf);
        Ok(())
    }

    /// Encrypt `input` into the leading bytes of `output`.
    ///
    /// # Errors
    ///
    /// As [`encrypt_update_in_place`](Self::encrypt_update_in_place), plus [`Error::Buffer`]
    /// if `output` is shorter than `input`.
    pub fn encrypt_update(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if output.len() < input.len() {
            return Err(Error::buffer(input.len(), output.len()));
        }
        self.enter(Direction::Encrypt, input.len())?;
        let out = &mut output[..input.len()];
        self.ks.xor_into(&self.key.aes, input, out);
        self.cipher.0.update(&self.key, out);
        Ok(())
    }

    /// Decrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// - [`Error::BadState`] if the stream is encrypting.
    /// - [`Error::BadFuncArg`] if the total data would exceed [`u32::MAX`] bytes.
    pub fn decrypt_update_in_place(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.enter(Direction::Decrypt, buf.len())?;
        self.cipher.0.update(&self.key, buf);
        self.ks.apply(&self.key.aes, buf);
        Ok(())
    }

    /// Decrypt `input` into the leading bytes of `output`.
    ///
    /// # Errors
    ///
    /// As [`decrypt_update_in_place`](Self::decrypt_update_in_place), plus
    /// [`Error::Buffer`] if `output` is shorter than `input`.
    pub fn decrypt_update(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), Error> {
        if output.len() < input.len() {
            return Err(Error::buffer(input.len(), output.len()));
        }
        self.enter(Direction::Decrypt, input.len())?;
        self.cipher.0.update(&self.key, input);
        self.ks.xor_into(&self.key.aes, input, &mut output[..input.len()]);
        Ok(())
    }

    fn tag(&mut self) -> Tag {
        let h = self.header.0.finish(&self.key);
        let c = self.cipher.0.finish(&self.key);
        xor3(&self.n, &h, &c)
    }

    /// Compute the tag truncated to `tag_len` bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::BadState`] if the stream is decrypting.
    /// - [`Error::BadFuncArg`] unless `4 <= tag_len <= 16`.
    pub fn encrypt_final(mut self, tag_len: usize) -> Result<Tag, Error> {
        if self.direction == Some(Direction::Decrypt) {
            return Err(Error::BadState);
        }
        if !valid_tag_len(tag_len) {
            return Err(Error::BadFuncArg);
        }
        let mut tag = self.tag();
        tag.truncate(tag_len);
        Ok(tag)
    }

    /// Verify `tag` over everything processed, truncated tags are checked over their length.
    ///
    /// # Errors
    ///
    /// - [`Error::BadState`] if the stream is encrypting.
    /// - [`Error::BadFuncArg`] if `tag` is shorter than 4 bytes.
    /// - [`Error::MacCmpFailed`] if the tag does not match.
    pub fn decrypt_final(mut self, tag: &Tag) -> Result<(), Error> {
        if self.direction == Some(Direction::Encrypt) {
            return Err(Error::BadState);
        }
        if !valid_tag_len(tag.len()) {
            return Err(Error::BadFuncArg);
        }
        if tag.matches_prefix(&self.tag().take()) {
            Ok(())
        } else {
            log_warn!(
                aad_len = self.aad_len, data_len = self.data_len, tag_len = tag.len(),
                "AES-EAX stream authentication failed"
            );
            Err(Error::MacCmpFailed)
        }
    }
}

impl Drop for AesEaxStream {
    fn drop(&mut self) {
        self.n.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    struct Vector {
        key: [u8; 16],
        nonce: &'static [u8],
        header: &'static [u8],
        msg: &'static [u8],
        cipher: &'static [u8],
        tag: [u8; 16]
    }

    // from the EAX paper, appendix
    const PAPER: [Vector; 3] = [
        Vector {
            key: hex!("233952dee4d5ed5f9b9c6d6ff80ff478"),
            nonce: &hex!("62ec67f9c3a4a407fcb2a8c49031a8b3"),
            header: &hex!("6bfb914fd07eae6b"),
            msg: &[],
            cipher: &[],
            tag: hex!("e037830e8389f27b025a2d6527e79d01")
        },
        Vector {
            key: hex!("91945d3f4dcbee0bf45ef52255f095a4"),
            nonce: &hex!("becaf043b0a23d843194ba972c66debd"),
            header: &hex!("fa3bfd4806eb53fa"),
            msg: &hex!("f7fb"),
            cipher: &hex!("19dd"),
            tag: hex!("5c4c9331049d0bdab0277408f67967e5")
        },
        Vector {
            key: hex!("8395fcf1e95bebd697bd010bc766aac3"),
            nonce: &hex!("22e7add93cfc6393c57ec0b3c17d6b44"),
            header: &hex!("126735fcc320d25a"),
            msg: &hex!("ca40d7446e545ffaed3bd12a740a659ffbbb3ceab7"),
            cipher: &hex!("cb8920f87a6c75cff39627b56e3ed197c552d295a7"),
            tag: hex!("cfc46afc253b4652b1af3795b124ab6e")
        }
    ];

    #[test]
    fn paper_vectors() {
        for v in &PAPER {
            let eax = AesEax::new(&Key::Aes128(v.key));
            let mut out = [0u8; 32];
            let tag = eax.encrypt(v.nonce, v.msg, &mut out, v.header, 16).unwrap();
            assert_eq!(&out[..v.msg.len()], v.cipher);
            assert_eq!(tag, v.tag);

            let mut back = [0xffu8; 32];
            eax.decrypt(v.nonce, v.cipher, &mut back, v.header, &tag).unwrap();
            assert_eq!(&back[..v.msg.len()], v.msg);
        }
    }

    #[test]
    fn stream_in_pieces() {
        let key = Key::Aes128(hex!("000102030405060708090a0b0c0d0e0f"));
        let nonce = hex!("6465666768696a6b6c6d6e6f");
        let msg: [u8; 40] = core::array::from_fn(|i| (i * 5) as u8);
        let cipher = hex!(
            "6bffd0409ba223bdef1b52970056ca734b2e8508847d3b4047b1d073d5af1deb"
            "8397d930b148b539"
        );
        let tag = hex!("85f0655370baf9c676269bfef72bffff");

        let mut enc = AesEaxStream::new(&key, &nonce, b"eax ").unwrap();
        let mut out = [0u8; 40];
        enc.encrypt_update(&msg[..3], &mut out[..3]).unwrap();
        enc.update_aad(b"header").unwrap();
        enc.encrypt_update(&msg[3..20], &mut out[3..20]).unwrap();
        enc.encrypt_update(&msg[20..], &mut out[20..]).unwrap();
        assert_eq!(out, cipher);
        assert_eq!(enc.encrypt_final(16).unwrap(), tag);

        let mut dec = AesEaxStream::new(&key, &nonce, ()).unwrap();
        dec.update_aad(b"eax header").unwrap();
        let mut back = out;
        dec.decrypt_update_in_place(&mut back[..33]).unwrap();
        dec.decrypt_update_in_place(&mut back[33..]).unwrap();
        assert_eq!(dec.decrypt_final(&Tag::new(tag)), Ok(()));
        assert_eq!(back, msg);
    }

    #[test]
    fn direction_is_fixed_by_first_use() {
        let key = Key::Aes128([1u8; 16]);
        let mut s = AesEaxStream::new(&key, &[0u8; 16], ()).unwrap();
        s.encrypt_update_in_place(&mut [0u8; 4]).unwrap();
        assert_eq!(s.decrypt_update_in_place(&mut [0u8; 4]), Err(Error::BadState));
        assert_eq!(s.decrypt_final(&Tag::new([0u8; 16])), Err(Error::BadState));

        let mut s = AesEaxStream::new(&key, &[0u8; 16], ()).unwrap();
        s.decrypt_update(&[0u8; 4], &mut [0u8; 4]).unwrap();
        assert_eq!(s.encrypt_update(&[0u8; 4], &mut [0u8; 4]), Err(Error::BadState));
        assert_eq!(s.encrypt_final(16).unwrap_err(), Error::BadState);
    }

    #[test]
    fn argument_errors_leave_output_alone() {
        let eax = AesEax::new(&Key::Aes128([1u8; 16]));
        let mut out = [0xa5u8; 8];

        for bad in [0, 3, 17] {
            assert_eq!(eax.encrypt(&[0u8; 16], &[1u8; 8], &mut out, (), bad), Err(Error::BadFuncArg));
        }
        assert_eq!(eax.encrypt(&[0u8; 16], &[1u8; 9], &mut out, (), 16), Err(Error::buffer(9, 8)));

        let short = Tag::from_slice(&[0u8; 3]).unwrap();
        assert_eq!(eax.decrypt(&[0u8; 16], &[1u8; 8], &mut out, (), &short), Err(Error::BadFuncArg));
        assert_eq!(out, [0xa5u8; 8]);

        let mut s = AesEaxStream::new(&Key::Aes128([1u8; 16]), &[], ()).unwrap();
        assert_eq!(s.encrypt_update(&[1u8; 9], &mut out), Err(Error::buffer(9, 8)));
        assert_eq!(out, [0xa5u8; 8]);
    }

    #[test]
    fn tamper_rejection_zeroes_output() {
        let eax = AesEax::new(&Key::Aes256([4u8; 32]));
        let nonce = [7u8; 12];
        let plain = [0x42u8; 37];
        let mut cipher = [0u8; 37];
        let tag = eax.encrypt(&nonce, &plain, &mut cipher, b"aad", 12).unwrap();

        let mut flipped = cipher;
        flipped[36] ^= 1;
        let mut out = [0xffu8; 37];
        assert_eq!(eax.decrypt(&nonce, &flipped, &mut out, b"aad", &tag), Err(Error::MacCmpFailed));
        assert_eq!(out, [0u8; 37]);

        let mut out = [0xffu8; 37];
        assert_eq!(eax.decrypt(&nonce, &cipher, &mut out, b"aae", &tag), Err(Error::MacCmpFailed));
        assert_eq!(out, [0u8; 37]);

        let mut bad = tag.take();
        bad[11] ^= 0x40;
        let bad = Tag::from_slice(&bad[..12]).unwrap();
        assert_eq!(eax.decrypt_in_place(&nonce, &mut cipher, b"aad", &bad), Err(Error::MacCmpFailed));
        assert_eq!(cipher, [0u8; 37]);
    }
}

#[cfg(all(test, not(miri)))]
mod property_tests {
    use super::*;
    use crate::aes::test_utils::BoundList;
    use proptest::prelude::*;
    use eax::aead::{AeadInPlace, KeyInit, generic_array::GenericArray};

    type RustCryptoEax = eax::Eax<aes::Aes128>;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1_000))]

        #[test]
        fn matches_rust_crypto(
            key in any::<[u8; 16]>(),
            nonce in any::<[u8; 16]>(),
            input in any::<BoundList<256>>(),
            aad in any::<BoundList<64>>()
        ) {
            let mut ours = input;
            let tag = AesEax::new(&Key::Aes128(key))
                .encrypt_in_place(&nonce, ours.as_mut_slice(), aad.as_slice(), 16)
                .unwrap();

            let mut theirs = input;
            let their_tag = RustCryptoEax::new_from_slice(&key)
                .unwrap()
                .encrypt_in_place_detached(
                    GenericArray::from_slice(&nonce), aad.as_slice(), theirs.as_mut_slice()
                )
                .unwrap();

            prop_assert_eq!(ours.as_slice(), theirs.as_slice());
            prop_assert_eq!(tag.as_slice(), their_tag.as_slice());
        }

        #[test]
        fn stream_matches_oneshot(
            key in any::<Key>(),
            nonce in any::<BoundList<20>>(),
            input in any::<BoundList<128>>(),
            aad in any::<BoundList<32>>(),
            split in any::<prop::sample::Index>()
        ) {
            let eax = AesEax::new(&key);
            let mut expected = input;
            let tag = eax.encrypt_in_place(nonce.as_slice(), expected.as_mut_slice(), aad.as_slice(), 16)
                .unwrap();

            let at = split.index(input.len() + 1);
            let mut buf = input;
            let mut s = AesEaxStream::new(&key, nonce.as_slice(), aad.as_slice()).unwrap();
            s.encrypt_update_in_place(&mut buf.as_mut_slice()[..at]).unwrap();
            s.encrypt_update_in_place(&mut buf.as_mut_slice()[at..]).unwrap();
            let stream_tag = s.encrypt_final(16).unwrap();

            prop_assert_eq!(buf.as_slice(), expected.as_slice());
            prop_assert_eq!(stream_tag, tag);
        }
    }
}
