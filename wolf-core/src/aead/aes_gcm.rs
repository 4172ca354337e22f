use crate::buf::GenericIv;
use crate::aead::{Aad, Tag};
use crate::aes::{gcm::Gcm, Key};
use crate::{ct, Error};

/// The shortest tag [`AesGcm`] produces or accepts.
pub const MIN_TAG_LEN: usize = 4;

/// Largest plaintext GCM may process under one IV, `2^39 - 256` bits.
pub(crate) const MAX_INPUT: u64 = (1 << 36) - 32;

/// AES-GCM (Galois/Counter Mode), NIST SP 800-38D.
///
/// The IV may be any non-empty length. 12 bytes is the recommended (and fastest) size, other
/// lengths are compressed through GHASH.
pub struct AesGcm {
    gcm: Gcm
}

opaque_dbg! { AesGcm }

#[inline]
fn check_args<A: Aad>(
    iv: &[u8], in_len: usize, out_len: usize, aad: &A, tag_len: usize
) -> Result<(), Error> {
    if iv.is_empty() || in_len as u64 > MAX_INPUT || !aad.is_valid_size()
        || !(MIN_TAG_LEN..=Tag::CAPACITY).contains(&tag_len)
    {
        return Err(Error::BadFuncArg);
    }
    if out_len < in_len {
        return Err(Error::buffer(in_len, out_len));
    }
    Ok(())
}

impl AesGcm {
    /// Create a new AES-GCM instance (`wc_AesGcmSetKey`).
    pub fn new(key: &Key) -> Self {
        Self { gcm: Gcm::new(key) }
    }

    /// Encrypt data using AES-GCM with compile-time known sizes.
    ///
    /// # Errors
    ///
    /// If the AAD's length is greater than [`u32::MAX`].
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{aead::{AesGcm, AadSlice}, aes::Key, buf::Nonce};
    ///
    /// let key = Key::Aes256([1u8; 32]);
    /// let nonce: Nonce = [2u8; 12].into();
    ///
    /// let input = [3u8; 32];
    /// let mut output = [0u8; 32];
    ///
    /// let gcm = AesGcm::new(&key);
    /// let tag = gcm.encrypt_sized(nonce, &input, &mut output, AadSlice::EMPTY).unwrap();
    ///
    /// assert_ne!(input, output);
    /// ```
    #[inline]
    pub fn encrypt_sized<const C: usize, N: GenericIv, A: Aad>(
        &self, nonce: N, input: &[u8; C], output: &mut [u8; C], aad: A
    ) -> Result<Tag, Error> {
        self.encrypt(nonce.as_slice(), input, output, aad)
    }

    /// Encrypt `input` into `output` (`wc_AesGcmEncrypt`), returning the full 16 byte tag.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] if `iv` is empty, `input` exceeds the GCM limit, or the AAD's
    ///   length is greater than [`u32::MAX`].
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    ///
    /// # Example
    ///
    /// ```
    /// use wolf_core::{aead::AesGcm, aes::Key};
    ///
    /// let gcm = AesGcm::new(&Key::Aes128([1u8; 16]));
    ///
    /// let mut cipher = [0u8; 11];
    /// let tag = gcm.encrypt(&[2u8; 12], b"hello world", &mut cipher, "header").unwrap();
    ///
    /// let mut plain = [0u8; 11];
    /// gcm.decrypt(&[2u8; 12], &cipher, &mut plain, "header", &tag).unwrap();
    /// assert_eq!(&plain, b"hello world");
    /// ```
    pub fn encrypt<A: Aad>(
        &self, iv: &[u8], input: &[u8], output: &mut [u8], aad: A
    ) -> Result<Tag, Error> {
        self.encrypt_with_tag_len(iv, input, output, aad, Tag::CAPACITY)
    }

    /// [`encrypt`](Self::encrypt) with the tag truncated to `tag_len` bytes.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt), plus [`Error::BadFuncArg`] unless `4 <= tag_len <= 16`.
    pub fn encrypt_with_tag_len<A: Aad>(
        &self, iv: &[u8], input: &[u8], output: &mut [u8], aad: A, tag_len: usize
    ) -> Result<Tag, Error> {
        check_args(iv, input.len(), output.len(), &aad, tag_len)?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);

        let mut tag = Tag::new(self.gcm.seal(iv, aad.as_bytes(), out));
        tag.truncate(tag_len);
        Ok(tag)
    }

    /// Encrypt `buf` in place.
    ///
    /// # Errors
    ///
    /// As [`encrypt`](Self::encrypt), minus the buffer check.
    pub fn encrypt_in_place<A: Aad>(&self, iv: &[u8], buf: &mut [u8], aad: A) -> Result<Tag, Error> {
        check_args(iv, buf.len(), buf.len(), &aad, Tag::CAPACITY)?;
        Ok(Tag::new(self.gcm.seal(iv, aad.as_bytes(), buf)))
    }

    /// Decrypt data using AES-GCM with compile-time known sizes.
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt).
    #[inline]
    pub fn decrypt_sized<const C: usize, N: GenericIv, A: Aad>(
        &self, nonce: N, input: &[u8; C], output: &mut [u8; C], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        self.decrypt(nonce.as_slice(), input, output, aad, tag)
    }

    /// Decrypt `input` into `output` and verify `tag` (`wc_AesGcmDecrypt`).
    ///
    /// A truncated tag is verified over its own length.
    ///
    /// # Errors
    ///
    /// - [`Error::BadFuncArg`] for the argument errors of [`encrypt`](Self::encrypt), or a tag
    ///   shorter than 4 bytes.
    /// - [`Error::Buffer`] if `output` is shorter than `input`.
    /// - [`Error::AesGcmAuth`] if the tag does not match, the written output is zeroed.
    pub fn decrypt<A: Aad>(
        &self, iv: &[u8], input: &[u8], output: &mut [u8], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        check_args(iv, input.len(), output.len(), &aad, tag.len())?;
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.open(iv, out, aad.as_bytes(), tag)
    }

    /// Decrypt `buf` in place and verify `tag`.
    ///
    /// # Errors
    ///
    /// As [`decrypt`](Self::decrypt), `buf` is zeroed on authentication failure.
    pub fn decrypt_in_place<A: Aad>(
        &self, iv: &[u8], buf: &mut [u8], aad: A, tag: &Tag
    ) -> Result<(), Error> {
        check_args(iv, buf.len(), buf.len(), &aad, tag.len())?;
        self.open(iv, buf, aad.as_bytes(), tag)
    }

    fn open(&self, iv: &[u8], buf: &mut [u8], aad: &[u8], tag: &Tag) -> Result<(), Error> {
        let expected = self.gcm.open(iv, aad, buf);
        let ok = tag.matches_prefix(&expected);
        ct::zero_unless(u8::from(ok), buf);

        if ok {
            Ok(())
        } else {
            log_warn!(
                input_len = buf.len(), aad_len = aad.len(), tag_len = tag.len(),
                "AES-GCM authentication failed"
            );
            Err(Error::AesGcmAuth)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use crate::aead::AadSlice;
    use crate::buf::{Iv, Nonce};

    const P: [u8; 60] = hex!(
        "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72"
        "1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39"
    );
    const A: [u8; 20] = hex!("feedfacedeadbeeffeedfacedeadbeefabaddad2");
    const IV: [u8; 12] = hex!("cafebabefacedbaddecaf888");

    #[test]
    fn test_case_2() {
        let gcm = AesGcm::new(&Key::Aes128([0u8; 16]));
        let mut out = [0u8; 16];
        let tag = gcm.encrypt(&[0u8; 12], &[0u8; 16], &mut out, ()).unwrap();
        assert_eq!(out, hex!("0388dace60b6a392f328c2b971b2fe78"));
        assert_eq!(tag, hex!("ab6e47d42cec13bdf53a67b21257bddf"));
    }

    #[test]
    fn test_case_4() {
        let gcm = AesGcm::new(&Key::Aes128(hex!("feffe9928665731c6d6a8f9467308308")));
        let mut out = [0u8; 60];
        let tag = gcm.encrypt(&IV, &P, &mut out, A).unwrap();
        assert_eq!(out, hex!(
            "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e"
            "21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091"
        ));
        assert_eq!(tag, hex!("5bc94fbc3221a5db94fae95ae7121a47"));
    }

    #[test]
    fn test_case_12_long_iv() {
        let gcm = AesGcm::new(&Key::Aes192(hex!("feffe9928665731c6d6a8f9467308308feffe9928665731c")));
        let iv = hex!(
            "9313225df88406e555909c5aff5269aa6a7a9538534f7da1e4c303d2a318a728"
            "c3c0c95156809539fcf0e2429a6b525416aedbf5a0de6a57a637b39b"
        );
        let mut out = [0u8; 60];
        let tag = gcm.encrypt(&iv, &P, &mut out, A).unwrap();
        assert_eq!(out, hex!(
            "d27e88681ce3243c4830165a8fdcf9ff1de9a1d8e6b447ef6ef7b79828666e45"
            "81e79012af34ddd9e2f037589b292db3e67c036745fa22e7e9b7373b"
        ));
        assert_eq!(tag, hex!("dcf566ff291c25bbb8568fc3d376a6d9"));

        let mut plain = [0u8; 60];
        assert!(gcm.decrypt(&iv, &out, &mut plain, A, &tag).is_ok());
        assert_eq!(plain, P);
    }

    #[test]
    fn test_case_16_aes256() {
        let gcm = AesGcm::new(&Key::Aes256(hex!(
            "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308"
        )));
        let mut out = [0u8; 60];
        let tag = gcm.encrypt(&IV, &P, &mut out, A).unwrap();
        assert_eq!(out, hex!(
            "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1aa"
            "8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f662"
        ));
        assert_eq!(tag, hex!("76fc6ece0f4e1768cddf8853bb2d551b"));
    }

    #[test]
    fn self_bijective_smoke() {
        let plain = b"hello world";
        let mut out_buf = [0u8; 11];

        let key = Key::Aes256([7; 32]);
        let nonce = Nonce::new([3; 12]);
        let aad = AadSlice::EMPTY;

        let aes = AesGcm::new(&key);

        let tag = aes
            .encrypt_sized(nonce.copy(), plain, &mut out_buf, aad)
            .unwrap();

        let mut de_out = [0u8; 11];

        assert!(aes.decrypt_sized(nonce.copy(), &out_buf, &mut de_out, aad, &tag).is_ok());
        assert_eq!(&de_out, plain);

        assert_eq!(
            aes.decrypt_sized(nonce, &out_buf, &mut de_out, aad, &Tag::new_zeroed()),
            Err(Error::AesGcmAuth)
        );
        assert_eq!(de_out, [0u8; 11]);
    }

    #[test]
    fn nonce_16_byte_smoke() {
        let plain = b"hello world";
        let mut buf = *plain;

        let key = Key::Aes256([7; 32]);
        let nonce = Iv::new([3; 16]);

        let aes = AesGcm::new(&key);
        let tag = aes.encrypt_in_place(nonce.slice(), &mut buf, ()).unwrap();
        assert_ne!(&buf, plain);

        assert!(aes.decrypt_in_place(nonce.slice(), &mut buf, (), &tag).is_ok());
        assert_eq!(&buf, plain);
    }

    #[test]
    fn truncated_tags() {
        let gcm = AesGcm::new(&Key::Aes128([5u8; 16]));
        let mut out = [0u8; 60];
        let full = gcm.encrypt(&IV, &P, &mut out, A).unwrap();
        let short = gcm.encrypt_with_tag_len(&IV, &P, &mut out, A, 12).unwrap();
        assert_eq!(short.as_slice(), &full.as_slice()[..12]);

        let mut plain = [0u8; 60];
        assert!(gcm.decrypt(&IV, &out, &mut plain, A, &short).is_ok());

        assert_eq!(gcm.encrypt_with_tag_len(&IV, &P, &mut out, A, 3), Err(Error::BadFuncArg));
        assert_eq!(gcm.encrypt_with_tag_len(&IV, &P, &mut out, A, 17), Err(Error::BadFuncArg));
    }

    #[test]
    fn argument_errors() {
        let gcm = AesGcm::new(&Key::Aes128([5u8; 16]));
        let mut out = [0u8; 8];
        assert_eq!(gcm.encrypt(&[], &[0u8; 8], &mut out, ()), Err(Error::BadFuncArg));
        assert_eq!(gcm.encrypt(&IV, &[0u8; 9], &mut out, ()), Err(Error::buffer(9, 8)));

        let tag = Tag::from_slice(&[0u8; 3]).unwrap();
        assert_eq!(gcm.decrypt(&IV, &[0u8; 8], &mut out, (), &tag), Err(Error::BadFuncArg));
    }

    #[test]
    fn rejected_tag_len_leaves_output_alone() {
        let gcm = AesGcm::new(&Key::Aes128([5u8; 16]));

        let mut out = [0xa5u8; 60];
        assert_eq!(gcm.encrypt_with_tag_len(&IV, &P, &mut out, A, 2), Err(Error::BadFuncArg));
        assert_eq!(out, [0xa5u8; 60]);

        let short = Tag::from_slice(&[0u8; 3]).unwrap();
        assert_eq!(gcm.decrypt(&IV, &P, &mut out, A, &short), Err(Error::BadFuncArg));
        assert_eq!(out, [0xa5u8; 60]);

        let mut buf = P;
        assert_eq!(gcm.decrypt_in_place(&IV, &mut buf, A, &short), Err(Error::BadFuncArg));
        assert_eq!(buf, P);
    }

    #[test]
    fn tamper_rejection_zeroes_output() {
        let gcm = AesGcm::new(&Key::Aes128([5u8; 16]));
        let mut cipher = [0u8; 60];
        let tag = gcm.encrypt(&IV, &P, &mut cipher, A).unwrap();

        let mut flipped = cipher;
        flipped[30] ^= 4;
        let mut out = [0xaau8; 60];
        assert_eq!(gcm.decrypt(&IV, &flipped, &mut out, A, &tag), Err(Error::AesGcmAuth));
        assert_eq!(out, [0u8; 60]);

        let mut aad = A;
        aad[0] ^= 1;
        let mut out = [0xaau8; 60];
        assert_eq!(gcm.decrypt(&IV, &cipher, &mut out, aad, &tag), Err(Error::AesGcmAuth));
        assert_eq!(out, [0u8; 60]);
    }
}
