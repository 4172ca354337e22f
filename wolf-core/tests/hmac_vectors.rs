pub mod common;

use common::{pattern, unhex, sweep::pieces};
use wolf_core::Error;
use wolf_core::hash::HashType;
use wolf_core::mac::hmac::Hmac;

struct Case {
    key: Vec<u8>,
    data: Vec<u8>,
    sha1: &'static str,
    sha224: &'static str,
    sha256: &'static str,
    sha384: &'static str,
    sha512: &'static str
}

fn rfc4231() -> Vec<Case> {
    vec![
        Case {
            key: vec![0x0b; 20],
            data: b"Hi There".to_vec(),
            sha1: "b617318655057264e28bc0b6fb378c8ef146be00",
            sha224: "896fb1128abbdf196832107cd49df33f47b4b1169912ba4f53684b22",
            sha256: "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7",
            sha384: "afd03944d84895626b0825f4ab46907f15f9dadbe4101ec682aa034c7cebc59c
                     faea9ea9076ede7f4af152e8b2fa9cb6",
            sha512: "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde
                     daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        },
        Case {
            key: vec![0xaa; 20],
            data: vec![0xdd; 50],
            sha1: "125d7342b9ac11cd91a39af48aa17b4f63f175d3",
            sha224: "7fb3cb3588c6c1f6ffa9694d7d6ad2649365b0c1f65d69d1ec8333ea",
            sha256: "773ea91e36800e46854db8ebd09181a72959098b3ef8c122d9635514ced565fe",
            sha384: "88062608d3e6ad8a0aa2ace014c8a86f0aa635d947ac9febe83ef4e55966144b
                     2a5ab39dc13814b94e3ab6e101a34f27",
            sha512: "fa73b0089d56a284efb0f0756c890be9b1b5dbdd8ee81a3655f83e33b2279d39
                     bf3e848279a722c806b485a47e67c807b946a337bee8942674278859e13292fb"
        },
        Case {
            key: (1..=25).collect(),
            data: vec![0xcd; 50],
            sha1: "4c9007f4026250c6bc8414f9bf50c86c2d7235da",
            sha224: "6c11506874013cac6a2abc1bb382627cec6a90d86efc012de7afec5a",
            sha256: "82558a389a443c0ea4cc819899f2083a85f0faa3e578f8077a2e3ff46729665b",
            sha384: "3e8a69b7783c25851933ab6290af6ca77a9981480850009cc5577c6e1f573b4e
                     6801dd23c4a7d679ccf8a386c674cffb",
            sha512: "b0ba465637458c6990e5a8c5f61d4af7e576d97ff94b872de76f8050361ee3db
                     a91ca5c11aa25eb4d679275cc5788063a5f19741120c4f2de2adebeb10a298dd"
        },
        Case {
            key: vec![0xaa; 131],
            data: b"Test Using Larger Than Block-Size Key - Hash Key First".to_vec(),
            sha1: "90d0dace1c1bdc957339307803160335bde6df2b",
            sha224: "95e9a0db962095adaebe9b2d6f0dbce2d499f112f2d2b7273fa6870e",
            sha256: "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54",
            sha384: "4ece084485813e9088d2c63a041bc5b44f9ef1012a2b588f3cd11f05033ac4c6
                     0c2ef6ab4030fe8296248df163f44952",
            sha512: "80b24263c7c1a3ebb71493c1dd7be8b49b46d1f41b4aeec1121b013783f8f352
                     6b56d037e05f2598bd0fd2215d6a1e5295e64f73f63f0aec8b915a985d786598"
        },
        Case {
            key: vec![0xaa; 131],
            data: b"This is a test using a larger than block-size key and a larger than \
                    block-size data. The key needs to be hashed before being used by the \
                    HMAC algorithm.".to_vec(),
            sha1: "217e44bb08b6e06a2d6c30f3cb9f537f97c63356",
            sha224: "3a854166ac5d9f023f54d517d0b39dbd946770db9c2b95c9f6f565d1",
            sha256: "9b09ffa71b942fcb27635fbcd5b0e944bfdc63644f0713938a7f51535c3a35e2",
            sha384: "6617178e941f020d351e2f254e8fd32c602420feb0b8fb9adccebb82461e99c5
                     a678cc31e799176d3860e6110c46523e",
            sha512: "e37b6a775dc87dbaa4dfa9f96e5e3ffddebd71f8867289865df5a32d20cdc944
                     b6022cac3c4982b10d5eeb55c3e4de15134676fb6de0446065c97440fa8c6a58"
        }
    ]
}

fn mac(ty: HashType, key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut hmac = Hmac::new(ty, key).unwrap();
    hmac.update(data).unwrap();
    hmac.finalize().as_slice().to_vec()
}

#[test]
fn rfc4231_and_rfc2202() {
    for (i, case) in rfc4231().iter().enumerate() {
        for (ty, expected) in [
            (HashType::Sha, case.sha1),
            (HashType::Sha224, case.sha224),
            (HashType::Sha256, case.sha256),
            (HashType::Sha384, case.sha384),
            (HashType::Sha512, case.sha512)
        ] {
            assert_eq!(mac(ty, &case.key, &case.data), unhex(expected), "case {i} {ty}");
        }
    }
}

#[test]
#[cfg(feature = "allow-non-fips")]
fn short_key_jefe() {
    let data = b"what do ya want for nothing?";
    assert_eq!(mac(HashType::Md5, b"Jefe", data), unhex("750c783e6ab0b503eaa86e310a5db738"));
    assert_eq!(
        mac(HashType::Sha256, b"Jefe", data),
        unhex("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
    );
    assert_eq!(
        mac(HashType::Sha512, b"Jefe", data),
        unhex("164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554
               9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737")
    );
}

#[test]
#[cfg(feature = "allow-non-fips")]
fn md5_rfc2104() {
    assert_eq!(
        mac(HashType::Md5, &[0x0b; 16], b"Hi There"),
        unhex("9294727a3638bb1c13f48ef8158bfc9d")
    );
    assert_eq!(
        mac(HashType::Md5, &[0xaa; 16], &[0xdd; 50]),
        unhex("56be34521d144c88dbb8c733f0e8b3f6")
    );
}

#[test]
#[cfg(feature = "allow-non-fips")]
fn blake2b() {
    let key: Vec<u8> = (0..16).collect();
    assert_eq!(
        mac(HashType::Blake2b, &key, b"abc"),
        unhex("415c8ef35da1e63df6b02172cbd73e0e9fac869701f9838786dfd58f020e68e1
               3a39e1ef1cc4241fad5630c00ca4e0a16da3ac1bd6fcb47a4b6af3b27ef2ffe5")
    );

    let key: Vec<u8> = (0..32).collect();
    assert_eq!(
        mac(HashType::Blake2b, &key, b"abc"),
        unhex("af6aef48e9a5a5e6a63b9f4703f032b5e42905477afec4d14f45d2d85e43dd19
               3e96ba6432d7f7be1186083a09e71894f83dcf65fcf5a88b585529ef4928833d")
    );

    assert_eq!(
        mac(HashType::Blake2b, b"this is my key!!", b"what do ya want for nothing?"),
        unhex("1ac5a7a537e08619f4469f6008fadf66297ff521073fd564d74bc86096200c0c
               6fcaf95fb232888b5734218cec9fb899f9add0c8699933b7256a22d22a29ac73")
    );
}

#[test]
#[cfg(not(feature = "allow-non-fips"))]
fn fips_minimum_key() {
    assert_eq!(Hmac::new(HashType::Sha256, b"Jefe").unwrap_err(), Error::HmacMinKeylen);
    assert_eq!(Hmac::new(HashType::Sha256, &[1; 13]).unwrap_err(), Error::HmacMinKeylen);
    assert!(Hmac::new(HashType::Sha256, &[1; 14]).is_ok());
    assert_eq!(Hmac::new(HashType::Md5, &[1; 16]).unwrap_err(), Error::BadFuncArg);
}

#[test]
fn streaming_matches_one_shot() {
    let key = pattern(40);
    let data = pattern(777);

    for ty in [HashType::Sha256, HashType::Sha512, HashType::Sha3_256] {
        let expected = mac(ty, &key, &data);
        for step in [1, 13, 64, 128, 500] {
            let mut hmac = Hmac::new(ty, &key).unwrap();
            for piece in pieces(&data, step) {
                hmac.update(piece).unwrap();
            }
            assert_eq!(hmac.finalize().as_slice(), expected.as_slice(), "{ty} step {step}");
        }
    }
}

#[test]
fn finalize_resets_to_keyed_state() {
    let key = [0x42; 32];
    let mut hmac = Hmac::new(HashType::Sha384, &key).unwrap();

    hmac.update(b"first").unwrap();
    let mut first = [0u8; 48];
    assert_eq!(hmac.finalize_into(&mut first), Ok(48));

    hmac.update(b"second").unwrap();
    let second = hmac.finalize();

    assert_eq!(first.as_slice(), mac(HashType::Sha384, &key, b"first").as_slice());
    assert_eq!(second.as_slice(), mac(HashType::Sha384, &key, b"second").as_slice());
}

#[test]
fn rekey_and_compare() {
    let mut hmac = Hmac::new(HashType::Sha256, &[1; 20]).unwrap();
    hmac.set_key(HashType::Sha512, &[2; 20]).unwrap();
    assert_eq!(hmac.digest_size(), 64);
    assert_eq!(hmac.hash_type(), HashType::Sha512);

    let expected = mac(HashType::Sha512, &[2; 20], b"data");
    hmac.update(b"data").unwrap();
    assert!(hmac.compare_digest(&expected));

    hmac.update(b"data").unwrap();
    assert!(!hmac.compare_digest(&expected[..63]));
}

#[test]
fn output_too_small() {
    let mut hmac = Hmac::new(HashType::Sha256, &[7; 32]).unwrap();
    let mut out = [0u8; 16];
    assert_eq!(hmac.finalize_into(&mut out), Err(Error::Buffer { needed: 32, had: 16 }));
}

#[test]
fn unsupported_types() {
    for ty in [HashType::None, HashType::Md2, HashType::Shake256, HashType::Blake2s] {
        assert!(Hmac::new(ty, &[1; 32]).is_err(), "{ty}");
    }
}
