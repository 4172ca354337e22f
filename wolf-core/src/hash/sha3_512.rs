use crate::hash::keccak::Sha3Core;

make_api! {
    name: Sha3_512,
    engine: Sha3Core<64, 72>,
    ds: 64,
    bs: 72
}
