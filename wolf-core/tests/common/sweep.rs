//! Length sweeps around block boundaries.

/// Every length in `0..=max` which sits within one byte of a multiple of `block`.
pub fn around_blocks(block: usize, max: usize) -> Vec<usize> {
    let mut lens: Vec<usize> = (0..=max / block + 1)
        .flat_map(|n| {
            let at = n * block;
            [at.saturating_sub(1), at, at + 1]
        })
        .filter(|len| *len <= max)
        .collect();
    lens.dedup();
    lens
}

/// Every way to cut `data` in two.
pub fn splits(data: &[u8]) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
    (0..=data.len()).map(move |at| data.split_at(at))
}

/// Feed `data` in pieces of `step` bytes.
pub fn pieces(data: &[u8], step: usize) -> impl Iterator<Item = &[u8]> + '_ {
    data.chunks(step.max(1))
}

