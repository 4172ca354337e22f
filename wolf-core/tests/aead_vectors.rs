pub mod common;

use common::{pattern, unhex, unhex_array, sweep::around_blocks};
use wolf_core::Error;
use wolf_core::aead::{AesCcm, AesGcm, Tag};
use wolf_core::aes::Key;
use wolf_core::mac::gmac::Gmac;

const GCM_PLAIN: &str = "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72
                         1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39";
const GCM_AAD: &str = "feedfacedeadbeeffeedfacedeadbeefabaddad2";

fn gcm_round_trip(key: &Key, iv: &[u8], plain: &[u8], aad: &[u8], cipher: &[u8], tag: &[u8]) {
    let gcm = AesGcm::new(key);

    let mut out = vec![0u8; plain.len()];
    let got = gcm.encrypt(iv, plain, &mut out, aad).unwrap();
    assert_eq!(out, cipher);
    assert_eq!(got.as_slice(), tag);

    let mut back = vec![0u8; plain.len()];
    gcm.decrypt(iv, &out, &mut back, aad, &got).unwrap();
    assert_eq!(back, plain);
}

#[test]
fn gcm_test_case_12_long_iv() {
    let key = Key::Aes192(unhex_array("feffe9928665731c6d6a8f9467308308feffe9928665731c"));
    gcm_round_trip(
        &key,
        &unhex(
            "9313225df88406e555909c5aff5269aa6a7a9538534f7da1e4c303d2a318a728
             c3c0c95156809539fcf0e2429a6b525416aedbf5a0de6a57a637b39b"
        ),
        &unhex(GCM_PLAIN),
        &unhex(GCM_AAD),
        &unhex(
            "d27e88681ce3243c4830165a8fdcf9ff1de9a1d8e6b447ef6ef7b79828666e45
             81e79012af34ddd9e2f037589b292db3e67c036745fa22e7e9b7373b"
        ),
        &unhex("dcf566ff291c25bbb8568fc3d376a6d9")
    );
}

#[test]
fn gcm_test_case_16() {
    let key = Key::Aes256(unhex_array(
        "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308"
    ));
    gcm_round_trip(
        &key,
        &unhex("cafebabefacedbaddecaf888"),
        &unhex(GCM_PLAIN),
        &unhex(GCM_AAD),
        &unhex(
            "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1aa
             8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f662"
        ),
        &unhex("76fc6ece0f4e1768cddf8853bb2d551b")
    );
}

#[test]
fn gcm_boundaries_against_rust_crypto() {
    use aes_gcm::aead::{AeadInPlace, KeyInit};

    let key = [0x5a; 16];
    let iv = [0x01; 12];
    let gcm = AesGcm::new(&Key::Aes128(key));
    let oracle = aes_gcm::Aes128Gcm::new_from_slice(&key).unwrap();

    for len in around_blocks(16, 80) {
        for aad_len in [0, 1, len, len + 17] {
            let plain = pattern(len);
            let aad = pattern(aad_len);

            let mut ours = plain.clone();
            let tag = gcm.encrypt_in_place(&iv, &mut ours, aad.as_slice()).unwrap();

            let mut theirs = plain.clone();
            let their_tag = oracle
                .encrypt_in_place_detached((&iv).into(), &aad, &mut theirs)
                .unwrap();

            assert_eq!(ours, theirs, "len {len} aad {aad_len}");
            assert_eq!(tag.as_slice(), their_tag.as_slice(), "len {len} aad {aad_len}");
        }
    }
}

#[test]
fn gcm_tamper_zeroes_output() {
    let gcm = AesGcm::new(&Key::Aes128([3; 16]));
    let iv = [9u8; 12];
    let plain = pattern(40);

    let mut cipher = vec![0u8; 40];
    let tag = gcm.encrypt(&iv, &plain, &mut cipher, "aad").unwrap();

    for bit in [0, 7, 100, 319] {
        let mut bad = cipher.clone();
        bad[bit / 8] ^= 1 << (bit % 8);
        let mut out = vec![0xffu8; 40];
        assert_eq!(gcm.decrypt(&iv, &bad, &mut out, "aad", &tag), Err(Error::AesGcmAuth));
        assert!(out.iter().all(|b| *b == 0));
    }

    let mut out = vec![0xffu8; 40];
    assert_eq!(gcm.decrypt(&iv, &cipher, &mut out, "AAD", &tag), Err(Error::AesGcmAuth));
    assert!(out.iter().all(|b| *b == 0));

    let mut bad_tag = tag.take();
    bad_tag[15] ^= 0x80;
    let mut out = vec![0xffu8; 40];
    assert_eq!(
        gcm.decrypt(&iv, &cipher, &mut out, "aad", &Tag::new(bad_tag)),
        Err(Error::AesGcmAuth)
    );
    assert!(out.iter().all(|b| *b == 0));
}

#[test]
fn gcm_exhaustive_round_trip() {
    let gcm = AesGcm::new(&Key::Aes256([0x11; 32]));
    let iv = [0x22u8; 12];

    for len in 0..=48 {
        for aad_len in 0..=48 {
            let plain = pattern(len);
            let aad = pattern(aad_len);

            let mut cipher = vec![0u8; len];
            let tag = gcm.encrypt(&iv, &plain, &mut cipher, aad.as_slice()).unwrap();

            let mut back = vec![0xffu8; len];
            gcm.decrypt(&iv, &cipher, &mut back, aad.as_slice(), &tag)
                .unwrap_or_else(|e| panic!("len {len} aad {aad_len}: {e:?}"));
            assert_eq!(back, plain, "len {len} aad {aad_len}");
        }
    }
}

#[test]
fn gcm_truncated_tags() {
    let gcm = AesGcm::new(&Key::Aes256([8; 32]));
    let iv = [4u8; 12];
    let mut cipher = [0u8; 20];

    let full = gcm.encrypt(&iv, &[1; 20], &mut cipher, ()).unwrap();
    let short = gcm.encrypt_with_tag_len(&iv, &[1; 20], &mut cipher, (), 8).unwrap();
    assert_eq!(short.len(), 8);
    assert_eq!(short.as_slice(), &full.as_slice()[..8]);

    let mut plain = [0u8; 20];
    gcm.decrypt(&iv, &cipher, &mut plain, (), &short).unwrap();
    assert_eq!(plain, [1; 20]);

    assert_eq!(
        gcm.encrypt_with_tag_len(&iv, &[1; 20], &mut cipher, (), 3).unwrap_err(),
        Error::BadFuncArg
    );
    assert_eq!(gcm.encrypt(&[], &[1; 20], &mut cipher, ()).unwrap_err(), Error::BadFuncArg);
    assert_eq!(
        gcm.encrypt(&iv, &[1; 20], &mut [0u8; 19], ()).unwrap_err(),
        Error::Buffer { needed: 20, had: 19 }
    );
}

#[test]
fn gmac_vector() {
    let gmac = Gmac::new(&Key::Aes128(unhex_array("89c949e9c804af014d5604b39459f2c8")));
    let iv: [u8; 12] = unhex_array("d1b104c815bf1e94e28c8f16");
    let aad = unhex("82adcd638d3fa9d9f3e84100d61e0777");

    let tag = gmac.mac(iv, aad.as_slice());
    assert_eq!(tag, unhex_array::<16>("88db9d62172ed043aa10f16d227dc41b"));
    assert!(gmac.verify(iv, aad.as_slice(), &tag).is_ok());
    assert_eq!(gmac.verify(iv, &aad[1..], &tag), Err(Error::AesGcmAuth));
}

#[test]
fn ccm_rfc3610_packet_1() {
    let ccm = AesCcm::new(&Key::Aes128(unhex_array("c0c1c2c3c4c5c6c7c8c9cacbcccdcecf")));
    let nonce = unhex("00000003020100a0a1a2a3a4a5");
    let aad = unhex("0001020304050607");
    let plain = unhex("08090a0b0c0d0e0f101112131415161718191a1b1c1d1e");

    let mut cipher = vec![0u8; plain.len()];
    let tag = ccm.encrypt(&nonce, &plain, &mut cipher, aad.as_slice(), 8).unwrap();
    assert_eq!(cipher, unhex("588c979a61c663d2f066d0c2c0f989806d5f6b61dac384"));
    assert_eq!(tag.as_slice(), unhex("17e8d12cfdf926e0"));

    let mut back = vec![0u8; plain.len()];
    ccm.decrypt(&nonce, &cipher, &mut back, aad.as_slice(), &tag).unwrap();
    assert_eq!(back, plain);

    cipher[0] ^= 1;
    assert_eq!(
        ccm.decrypt(&nonce, &cipher, &mut back, aad.as_slice(), &tag),
        Err(Error::AesCcmAuth)
    );
    assert!(back.iter().all(|b| *b == 0));
}

#[test]
fn ccm_tamper_zeroes_output() {
    let ccm = AesCcm::new(&Key::Aes192([6; 24]));
    let nonce = [2u8; 12];
    let plain = pattern(40);

    let mut cipher = vec![0u8; 40];
    let tag = ccm.encrypt(&nonce, &plain, &mut cipher, "aad", 12).unwrap();

    for bit in [0, 9, 200, 319] {
        let mut bad = cipher.clone();
        bad[bit / 8] ^= 1 << (bit % 8);
        let mut out = vec![0xffu8; 40];
        assert_eq!(ccm.decrypt(&nonce, &bad, &mut out, "aad", &tag), Err(Error::AesCcmAuth));
        assert!(out.iter().all(|b| *b == 0), "bit {bit}");
    }

    let mut out = vec![0xffu8; 40];
    assert_eq!(ccm.decrypt(&nonce, &cipher, &mut out, "aaD", &tag), Err(Error::AesCcmAuth));
    assert!(out.iter().all(|b| *b == 0));

    let mut bad_tag = tag.take();
    bad_tag[0] ^= 1;
    let bad_tag = Tag::from_slice(&bad_tag[..12]).unwrap();
    let mut out = vec![0xffu8; 40];
    assert_eq!(ccm.decrypt(&nonce, &cipher, &mut out, "aad", &bad_tag), Err(Error::AesCcmAuth));
    assert!(out.iter().all(|b| *b == 0));
}

#[test]
fn ccm_boundaries_against_rust_crypto() {
    use ccm::aead::{AeadInPlace, KeyInit};
    use ccm::consts::{U13, U8};

    let key = [0x3c; 16];
    let nonce = [0x07; 13];
    let ccm = AesCcm::new(&Key::Aes128(key));
    let oracle = ccm::Ccm::<aes::Aes128, U8, U13>::new_from_slice(&key).unwrap();

    // 0xff00 is where the AAD length encoding grows from two to six bytes
    let aad_lens = around_blocks(16, 80).into_iter().chain([0xfeff, 0xff00]);
    for aad_len in aad_lens {
        for len in around_blocks(16, 80) {
            let plain = pattern(len);
            let aad = pattern(aad_len);

            let mut ours = plain.clone();
            let tag = ccm.encrypt_in_place(&nonce, &mut ours, aad.as_slice(), 8).unwrap();

            let mut theirs = plain.clone();
            let their_tag = oracle
                .encrypt_in_place_detached((&nonce).into(), &aad, &mut theirs)
                .unwrap();

            assert_eq!(ours, theirs, "len {len} aad {aad_len}");
            assert_eq!(tag.as_slice(), their_tag.as_slice(), "len {len} aad {aad_len}");
        }
    }
}

#[test]
fn ccm_exhaustive_round_trip() {
    let ccm = AesCcm::new(&Key::Aes128([0x44; 16]));
    let nonce = [0x55u8; 11];

    for len in 0..=48 {
        for aad_len in 0..=48 {
            let plain = pattern(len);
            let aad = pattern(aad_len);

            let mut cipher = vec![0u8; len];
            let tag = ccm.encrypt(&nonce, &plain, &mut cipher, aad.as_slice(), 16).unwrap();

            let mut back = vec![0xffu8; len];
            ccm.decrypt(&nonce, &cipher, &mut back, aad.as_slice(), &tag)
                .unwrap_or_else(|e| panic!("len {len} aad {aad_len}: {e:?}"));
            assert_eq!(back, plain, "len {len} aad {aad_len}");
        }
    }
}

#[test]
fn ccm_argument_checks() {
    let ccm = AesCcm::new(&Key::Aes128([0; 16]));
    let mut out = [0u8; 4];

    assert_eq!(ccm.encrypt(&[0; 6], &[0; 4], &mut out, (), 8).unwrap_err(), Error::BadFuncArg);
    assert_eq!(ccm.encrypt(&[0; 14], &[0; 4], &mut out, (), 8).unwrap_err(), Error::BadFuncArg);
    assert_eq!(ccm.encrypt(&[0; 13], &[0; 4], &mut out, (), 5).unwrap_err(), Error::BadFuncArg);
    for tag_len in [4, 6, 8, 10, 12, 14, 16] {
        assert!(ccm.encrypt(&[0; 13], &[0; 4], &mut out, (), tag_len).is_ok(), "{tag_len}");
    }
}

#[cfg(feature = "allow-non-fips")]
mod chacha20_poly1305 {
    use super::*;
    use wolf_core::aead::chacha20_poly1305::{decrypt, encrypt, ChaCha20Poly1305, Decrypt, Encrypt};
    use wolf_core::mac::poly1305::Key;

    const SUNSCREEN: &[u8] = b"Ladies and Gentlemen of the class of '99: If I could offer you \
                               only one tip for the future, sunscreen would be it.";

    fn key() -> Key {
        Key::new(unhex_array("808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9f"))
    }

    #[test]
    fn rfc8439_2_8_2() {
        let key = key();
        let iv: [u8; 12] = unhex_array("070000004041424344454647");
        let aad = unhex("50515253c0c1c2c3c4c5c6c7");

        let mut cipher = vec![0u8; SUNSCREEN.len()];
        let tag = encrypt(key.as_ref(), iv, SUNSCREEN, &mut cipher, aad.as_slice()).unwrap();

        assert_eq!(cipher, unhex(
            "d31a8d34648e60db7b86afbc53ef7ec2a4aded51296e08fea9e2b5a736ee62d6
             3dbea45e8ca9671282fafb69da92728b1a71de0a9e060b2905d6a5b67ecd3b36
             92ddbd7f2d778b8c9803aee328091b58fab324e4fad675945585808b4831d7bc
             3ff4def08e4b7a9de576d26586cec64b6116"
        ));
        assert_eq!(tag, unhex_array::<16>("1ae10b594f09e26a7e902ecbd0600691"));

        let mut plain = vec![0u8; cipher.len()];
        decrypt(key.as_ref(), iv, &cipher, &mut plain, aad.as_slice(), tag).unwrap();
        assert_eq!(plain, SUNSCREEN);

        plain.fill(0xee);
        assert_eq!(
            decrypt(key.as_ref(), iv, &cipher, &mut plain, &aad[1..], tag),
            Err(Error::MacCmpFailed)
        );
        assert!(plain.iter().all(|b| *b == 0));
    }

    #[test]
    fn rfc8439_a_5_decryption() {
        let key = Key::new(unhex_array(
            "1c9240a5eb55d38af333888604f6b5f0473917c1402b80099dca5cbc207075c0"
        ));
        let iv: [u8; 12] = unhex_array("000000000102030405060708");
        let aad = unhex("f33388860000000000004e91");
        let cipher = unhex(
            "64a0861575861af460f062c79be643bd5e805cfd345cf389f108670ac76c8cb2
             4c6cfc18755d43eea09ee94e382d26b0bdb7b73c321b0100d4f03b7f355894cf
             332f830e710b97ce98c8a84abd0b948114ad176e008d33bd60f982b1ff37c855
             9797a06ef4f0ef61c186324e2b3506383606907b6a7c02b0f9f6157b53c867e4
             b9166c767b804d46a59b5216cde7a4e99040c5a40433225ee282a1b0a06c523e
             af4534d7f83fa1155b0047718cbc546a0d072b04b3564eea1b422273f548271a
             0bb2316053fa76991955ebd63159434ecebb4e466dae5a1073a6727627097a10
             49e617d91d361094fa68f0ff77987130305beaba2eda04df997b714d6c6f2c29
             a6ad5cb4022b02709b"
        );
        let tag: [u8; 16] = unhex_array("eead9d67890cbb22392336fea1851f38");

        let mut plain = vec![0u8; cipher.len()];
        decrypt(key.as_ref(), iv, &cipher, &mut plain, aad.as_slice(), Tag::new(tag)).unwrap();

        assert_eq!(plain.len(), 265);
        assert!(plain.starts_with(b"Internet-Drafts are draft documents valid for a maximum"));
        assert!(plain.ends_with("/\u{201c}work in progress./\u{201d}".as_bytes()));
    }

    #[test]
    fn streaming_matches_one_shot() {
        let key = key();
        let iv = [3u8; 12];
        let data = pattern(150);

        let mut one_shot = data.clone();
        let expected = wolf_core::aead::chacha20_poly1305::encrypt_in_place(
            key.as_ref(), iv, &mut one_shot, "hdr"
        ).unwrap();

        for cut in around_blocks(64, 150) {
            let mut buf = data.clone();
            let (a, b) = buf.split_at_mut(cut);
            let tag = ChaCha20Poly1305::new::<Encrypt>(key.as_ref(), iv)
                .set_aad("hdr").unwrap()
                .update_in_place(a).unwrap()
                .update_in_place(b).unwrap()
                .finalize();

            assert_eq!(buf, one_shot, "cut {cut}");
            assert_eq!(tag, expected, "cut {cut}");

            assert!(ChaCha20Poly1305::new::<Decrypt>(key.as_ref(), iv)
                .set_aad("hdr").unwrap()
                .update_in_place(&mut buf).unwrap()
                .verify(&tag)
                .is_ok());
            assert_eq!(buf, data);
        }
    }
}
