use crate::hash::keccak::Sha3Core;

make_api! {
    name: Sha3_256,
    engine: Sha3Core<32, 136>,
    ds: 32,
    bs: 136
}
