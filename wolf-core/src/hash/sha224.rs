use crate::hash::sha256::Sha256Core;

make_api! {
    name: Sha224,
    engine: Sha256Core<28>,
    ds: 28,
    bs: 64
}
