use crate::hash::sha512::Sha512Core;

make_api! {
    name: Sha384,
    engine: Sha512Core<48>,
    ds: 48,
    bs: 128
}
