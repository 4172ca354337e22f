use crate::hash::sha512::Sha512Core;

make_api! {
    name: Sha512_224,
    engine: Sha512Core<28>,
    ds: 28,
    bs: 128
}
