pub mod common;

use common::{pattern, unhex, sweep::{around_blocks, splits}};
use digest::Digest;
use wolf_core::Error;
use wolf_core::hash::{self, Hash, HashType, MAX_DIGEST_SIZE};

const FIPS_DIGESTS: [HashType; 11] = [
    HashType::Sha, HashType::Sha224, HashType::Sha256, HashType::Sha384, HashType::Sha512,
    HashType::Sha512_224, HashType::Sha512_256,
    HashType::Sha3_224, HashType::Sha3_256, HashType::Sha3_384, HashType::Sha3_512
];

fn digest_of(ty: HashType, data: &[u8]) -> Vec<u8> {
    let mut out = [0u8; MAX_DIGEST_SIZE];
    let len = hash::hash(ty, data, &mut out).unwrap();
    out[..len].to_vec()
}

fn oracle(ty: HashType, data: &[u8]) -> Vec<u8> {
    match ty {
        HashType::Sha => sha1::Sha1::digest(data).to_vec(),
        HashType::Sha224 => sha2::Sha224::digest(data).to_vec(),
        HashType::Sha256 => sha2::Sha256::digest(data).to_vec(),
        HashType::Sha384 => sha2::Sha384::digest(data).to_vec(),
        HashType::Sha512 => sha2::Sha512::digest(data).to_vec(),
        HashType::Sha512_224 => sha2::Sha512_224::digest(data).to_vec(),
        HashType::Sha512_256 => sha2::Sha512_256::digest(data).to_vec(),
        HashType::Sha3_224 => sha3::Sha3_224::digest(data).to_vec(),
        HashType::Sha3_256 => sha3::Sha3_256::digest(data).to_vec(),
        HashType::Sha3_384 => sha3::Sha3_384::digest(data).to_vec(),
        HashType::Sha3_512 => sha3::Sha3_512::digest(data).to_vec(),
        HashType::Md5 => md5::Md5::digest(data).to_vec(),
        HashType::Blake2b => blake2::Blake2b512::digest(data).to_vec(),
        HashType::Ripemd160 => ripemd::Ripemd160::digest(data).to_vec(),
        other => panic!("no oracle for {other}")
    }
}

#[test]
fn sha256_empty() {
    assert_eq!(
        digest_of(HashType::Sha256, b""),
        unhex("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
    );
}

#[test]
fn sha3_published_vectors() {
    const MSG_448: &[u8] = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";

    let cases: [(HashType, [&str; 3]); 4] = [
        (HashType::Sha3_224, [
            "6b4e03423667dbb73b6e15454f0eb1abd4597f9a1b078e3f5b5a6bc7",
            "e642824c3f8cf24ad09234ee7d3c766fc9a3a5168d0c94ad73b46fdf",
            "8a24108b154ada21c9fd5574494479ba5c7e7ab76ef264ead0fcce33"
        ]),
        (HashType::Sha3_256, [
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a",
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532",
            "41c0dba2a9d6240849100376a8235e2c82e1b9998a999e21db32dd97496d3376"
        ]),
        (HashType::Sha3_384, [
            "0c63a75b845e4f7d01107d852e4c2485c51a50aaaa94fc61995e71bbee983a2a
             c3713831264adb47fb6bd1e058d5f004",
            "ec01498288516fc926459f58e2c6ad8df9b473cb0fc08c2596da7cf0e49be4b2
             98d88cea927ac7f539f1edf228376d25",
            "991c665755eb3a4b6bbdfb75c78a492e8c56a22c5c4d7e429bfdbc32b9d4ad5a
             a04a1f076e62fea19eef51acd0657c22"
        ]),
        (HashType::Sha3_512, [
            "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6
             15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26",
            "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e
             10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0",
            "04a371e84ecfb5b8b77cb48610fca8182dd457ce6f326a0fd3d7ec2f1e91636d
             ee691fbe0c985302ba1b0d8dc78c086346b533b49c030d99a27daf1139d6e75e"
        ])
    ];

    for (ty, [empty, abc, long]) in cases {
        assert_eq!(digest_of(ty, b""), unhex(empty), "{ty} empty");
        assert_eq!(digest_of(ty, b"abc"), unhex(abc), "{ty} abc");
        assert_eq!(digest_of(ty, MSG_448), unhex(long), "{ty} 448 bit");
    }
}

#[test]
fn large_hash() {
    let block: Vec<u8> = (0..1024).map(|i| i as u8).collect();
    let whole = block.repeat(100);

    for ty in FIPS_DIGESTS {
        let mut h = Hash::new(ty).unwrap();
        for _ in 0..100 {
            h.update(ty, &block).unwrap();
        }
        let mut out = [0u8; MAX_DIGEST_SIZE];
        let len = h.finalize_into(ty, &mut out).unwrap();
        assert_eq!(out[..len], oracle(ty, &whole), "{ty}");
    }
}

#[test]
fn block_boundaries_match_oracles() {
    for ty in FIPS_DIGESTS {
        let bs = ty.block_size().unwrap();
        for len in around_blocks(bs, 3 * bs) {
            let data = pattern(len);
            assert_eq!(digest_of(ty, &data), oracle(ty, &data), "{ty} len {len}");
        }
    }
}

#[test]
#[cfg(feature = "allow-non-fips")]
fn non_fips_digests_match_oracles() {
    for ty in [HashType::Md5, HashType::Blake2b, HashType::Ripemd160] {
        let bs = ty.block_size().unwrap();
        for len in around_blocks(bs, 2 * bs) {
            let data = pattern(len);
            assert_eq!(digest_of(ty, &data), oracle(ty, &data), "{ty} len {len}");
        }
    }
}

#[test]
fn split_updates_equal_one_shot() {
    let data = pattern(300);
    for ty in FIPS_DIGESTS {
        let expected = digest_of(ty, &data);
        for (a, b) in splits(&data).step_by(7) {
            let mut h = Hash::new(ty).unwrap();
            h.update(ty, a).unwrap();
            h.update(ty, b).unwrap();

            let mut out = [0u8; MAX_DIGEST_SIZE];
            let len = h.finalize_into(ty, &mut out).unwrap();
            assert_eq!(out[..len], expected[..], "{ty} split at {}", a.len());
        }
    }
}

#[test]
fn finalize_reinitializes() {
    let ty = HashType::Sha384;
    let mut h = Hash::new(ty).unwrap();
    let mut first = [0u8; 48];
    let mut second = [0u8; 48];

    h.update(ty, b"abc").unwrap();
    h.finalize_into(ty, &mut first).unwrap();
    h.update(ty, b"abc").unwrap();
    h.finalize_into(ty, &mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn get_hash_leaves_state() {
    let ty = HashType::Sha256;
    let mut h = Hash::new(ty).unwrap();
    h.update(ty, b"ab").unwrap();

    let mut peek = [0u8; 32];
    h.get_hash(ty, &mut peek).unwrap();
    assert_eq!(peek[..], digest_of(ty, b"ab")[..]);

    h.update(ty, b"c").unwrap();
    let mut out = [0u8; 32];
    h.finalize_into(ty, &mut out).unwrap();
    assert_eq!(out[..], digest_of(ty, b"abc")[..]);
}

#[test]
fn typed_hashers_agree_with_dispatch() {
    let data = pattern(200);

    let mut sha256 = hash::Sha256::new();
    assert!(sha256.try_update(&data).is_ok());
    assert_eq!(sha256.try_finalize().unwrap()[..], digest_of(HashType::Sha256, &data)[..]);

    let mut sha3 = hash::Sha3_512::new();
    assert!(sha3.try_update(&data).is_ok());
    assert_eq!(sha3.try_finalize().unwrap()[..], digest_of(HashType::Sha3_512, &data)[..]);
}

#[test]
fn misuse_is_reported() {
    let mut h = Hash::new(HashType::Sha256).unwrap();
    assert_eq!(h.update(HashType::Sha512, b"x"), Err(Error::BadFuncArg));

    let mut short = [0u8; 31];
    assert_eq!(
        h.finalize_into(HashType::Sha256, &mut short),
        Err(Error::Buffer { needed: 32, had: 31 })
    );

    for ty in [HashType::None, HashType::Md2, HashType::Md5Sha, HashType::Shake128] {
        assert_eq!(Hash::new(ty).unwrap_err(), Error::BadFuncArg, "{ty}");
    }
    assert_eq!(Hash::new(HashType::Blake2s).unwrap_err(), Error::HashType);
}

#[test]
fn sizes_by_name() {
    for (name, ds, bs) in [
        ("sha1", 20, 64), ("SHA256", 32, 64), ("sha512", 64, 128), ("sha3-224", 28, 144),
        ("SHA3-512", 64, 72), ("sha512-256", 32, 128)
    ] {
        let ty = HashType::from_name(name);
        assert_eq!(hash::digest_size(ty), Ok(ds), "{name}");
        assert_eq!(hash::block_size(ty), Ok(bs), "{name}");
    }
    assert_eq!(HashType::from_name("whirlpool"), HashType::None);
}
