shake_api! {
    name: Shake128,
    rate: 168,
    ds: 32
}
