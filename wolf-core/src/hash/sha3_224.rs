use crate::hash::keccak::Sha3Core;

make_api! {
    name: Sha3_224,
    engine: Sha3Core<28, 144>,
    ds: 28,
    bs: 144
}
