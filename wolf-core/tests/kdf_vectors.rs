pub mod common;

use common::{pattern, unhex};
use wolf_core::Error;
use wolf_core::kdf::{
    hkdf, hkdf_into, pbkdf2, pbkdf2_into, pkcs12_pbkdf, x963_kdf,
    Iters, PbkdfSalt, SaltSlice, Sha, Sha256, Sha384, Sha512
};
use wolf_core::kdf::pkcs12::Purpose;

const LONG_PASSWORD: &[u8] = b"passwordPASSWORDpassword";
const LONG_SALT: &[u8] = b"saltSALTsaltSALTsaltSALTsaltSALTsalt";

fn salt(bytes: &[u8]) -> SaltSlice<'_, PbkdfSalt> {
    SaltSlice::<PbkdfSalt>::try_from(bytes).unwrap()
}

#[test]
fn pbkdf2_rfc6070_long_inputs() {
    let iters = Iters::new(4096).unwrap();

    let key = pbkdf2::<25, Sha>(LONG_PASSWORD, salt(LONG_SALT), iters).unwrap();
    assert_eq!(key.as_slice(), unhex("3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038"));

    let mut key = [0u8; 40];
    pbkdf2_into::<Sha256>(LONG_PASSWORD, salt(LONG_SALT), iters, &mut key).unwrap();
    assert_eq!(key.as_slice(), unhex(
        "348c89dbcbd32b2f32d814b8116e84cf2b17347ebc1800181c4e2a1fb8dd53e1
         c635518c7dac47e9"
    ));
}

#[test]
fn pbkdf2_matches_rust_crypto() {
    let password = pattern(32);
    let salt_bytes = pattern(16);

    for len in [1, 31, 32, 33, 64, 100] {
        let mut ours = vec![0u8; len];
        pbkdf2_into::<Sha512>(&password, salt(&salt_bytes), Iters::new(3).unwrap(), &mut ours)
            .unwrap();

        let mut theirs = vec![0u8; len];
        ::pbkdf2::pbkdf2_hmac::<sha2::Sha512>(&password, &salt_bytes, 3, &mut theirs);
        assert_eq!(ours, theirs, "len {len}");
    }
}

#[test]
fn pbkdf_salt_constraint() {
    assert!(SaltSlice::<PbkdfSalt>::try_from(&[0u8; 0][..]).is_err());
    #[cfg(not(feature = "allow-non-fips"))]
    assert!(SaltSlice::<PbkdfSalt>::try_from(&[0u8; 15][..]).is_err());
    assert!(SaltSlice::<PbkdfSalt>::try_from(&[0u8; 16][..]).is_ok());
}

#[test]
fn hkdf_rfc5869_case_2() {
    let ikm: Vec<u8> = (0x00..=0x4f).collect();
    let salt: Vec<u8> = (0x60..=0xaf).collect();
    let info: Vec<u8> = (0xb0..=0xff).collect();

    let okm = hkdf::<Sha256, 82>(&ikm, salt.as_slice(), info.as_slice()).unwrap();
    assert_eq!(okm.as_slice(), unhex(
        "b11e398dc80327a1c8e7f78c596a49344f012eda2d4efad8a050cc4c19afa97c
         59045a99cac7827271cb41c65e590e09da3275600c2f09b8367793a9aca3db71
         cc30c58179ec3e87c14c01d5c1f3434f1d87"
    ));
}

#[test]
fn hkdf_output_limit() {
    let mut max = vec![0u8; 255 * 48];
    assert!(hkdf_into::<Sha384>(&[1; 48], (), (), &mut max).is_ok());

    let mut over = vec![0u8; 255 * 48 + 1];
    assert_eq!(hkdf_into::<Sha384>(&[1; 48], (), (), &mut over), Err(Error::BadFuncArg));
}

#[test]
fn x963_is_a_prefix_function() {
    let secret = pattern(24);
    let mut long = [0u8; 100];
    x963_kdf::<Sha384>(&secret, "info", &mut long).unwrap();

    for len in [1, 47, 48, 49, 96] {
        let mut short = vec![0u8; len];
        x963_kdf::<Sha384>(&secret, "info", &mut short).unwrap();
        assert_eq!(short, long[..len]);
    }
    assert_eq!(x963_kdf::<Sha384>(&[], "info", &mut long), Err(Error::BadFuncArg));
}

#[test]
fn pkcs12_openssl_vectors() {
    let smeg = [0, b's', 0, b'm', 0, b'e', 0, b'g', 0, 0];
    let salt = unhex("0a58cf64530d823f");

    let mut key = [0u8; 24];
    pkcs12_pbkdf::<Sha>(&smeg, &salt, Iters::new(1).unwrap(), Purpose::Key, &mut key).unwrap();
    assert_eq!(key.as_slice(), unhex("8aaae6297b6cb04642ab5b077851284eb7128f1a2a7fbca3"));

    let queeg = [0, b'q', 0, b'u', 0, b'e', 0, b'e', 0, b'g', 0, 0];
    let salt = unhex("1682c0fc5b3f7ec5");
    pkcs12_pbkdf::<Sha>(&queeg, &salt, Iters::new(1000).unwrap(), Purpose::Key, &mut key)
        .unwrap();
    assert_eq!(key.as_slice(), unhex("483dd6e919d7de2e8e648ba8f862f3fbfbdc2bcb2c02957f"));
}

#[cfg(all(feature = "alloc", feature = "allow-non-fips"))]
mod scrypt {
    use super::*;
    use wolf_core::kdf::{scrypt, scrypt_ex};

    #[test]
    fn rfc7914_first_two() {
        let mut out = [0u8; 64];
        scrypt(b"", (), 4, 1, 1, &mut out).unwrap();
        assert_eq!(out.as_slice(), unhex(
            "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442
             fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
        ));

        scrypt_ex(b"password", b"NaCl", 1024, 8, 16, &mut out).unwrap();
        assert_eq!(out.as_slice(), unhex(
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162
             2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640"
        ));
    }

    #[test]
    #[ignore = "expensive"]
    fn rfc7914_sodium_chloride() {
        let mut out = [0u8; 64];
        scrypt_ex(b"pleaseletmein", b"SodiumChloride", 16384, 8, 1, &mut out).unwrap();
        assert_eq!(out.as_slice(), unhex(
            "7023bdcb3afd7348461c06cd81fd38ebfda8fbba904f8e3ea9b543f6545da1f2
             d5432955613f0fcf62d49705242a9af9e61e85dc0d651e40dfcf017b45575887"
        ));
    }

    #[test]
    fn cost_bounds() {
        let mut out = [0u8; 16];
        assert_eq!(scrypt(b"pw", (), 16, 1, 1, &mut out), Err(Error::BadFuncArg));
        assert!(scrypt(b"pw", (), 15, 1, 1, &mut out).is_ok());
    }
}
