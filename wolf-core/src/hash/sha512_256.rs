use crate::hash::sha512::Sha512Core;

make_api! {
    name: Sha512_256,
    engine: Sha512Core<32>,
    ds: 32,
    bs: 128
}
