use crate::hash::keccak::Sha3Core;

make_api! {
    name: Sha3_384,
    engine: Sha3Core<48, 104>,
    ds: 48,
    bs: 104
}
