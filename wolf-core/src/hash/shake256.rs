shake_api! {
    name: Shake256,
    rate: 136,
    ds: 64
}
