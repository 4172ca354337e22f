//! The AES block function (FIPS 197) over a byte oriented state.
use zeroize::Zeroize;
use super::Key;

const fn build_sboxes() -> ([u8; 256], [u8; 256]) {
    let mut sbox = [0u8; 256];
    let mut inv = [0u8; 256];

    // p walks the multiplicative group by powers of 3, q tracks its inverse.
    let mut p: u8 = 1;
    let mut q: u8 = 1;
    loop {
        p = p ^ (p << 1) ^ if p & 0x80 != 0 { 0x1b } else { 0 };

        q ^= q << 1;
        q ^= q << 2;
        q ^= q << 4;
        if q & 0x80 != 0 {
            q ^= 0x09;
        }

        let x = q ^ q.rotate_left(1) ^ q.rotate_left(2) ^ q.rotate_left(3) ^ q.rotate_left(4);
        sbox[p as usize] = x ^ 0x63;

        if p == 1 {
            break;
        }
    }
    sbox[0] = 0x63;

    let mut i = 0;
    while i < 256 {
        inv[sbox[i] as usize] = i as u8;
        i += 1;
    }

    (sbox, inv)
}

const SBOXES: ([u8; 256], [u8; 256]) = build_sboxes();
const SBOX: [u8; 256] = SBOXES.0;
const INV_SBOX: [u8; 256] = SBOXES.1;

const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

const MAX_ROUND_KEYS: usize = 16 * 15;

#[inline(always)]
const fn xtime(b: u8) -> u8 {
    (b << 1) ^ (0x1b & 0u8.wrapping_sub(b >> 7))
}

#[inline(always)]
const fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut p = 0u8;
    let mut i = 0;
    while i < 8 {
        p ^= a & 0u8.wrapping_sub(b & 1);
        a = xtime(a);
        b >>= 1;
        i += 1;
    }
    p
}

/// An expanded AES key.
///
/// The same schedule serves both directions, [`encrypt_block`](Self::encrypt_block) runs the
/// cipher and [`decrypt_block`](Self::decrypt_block) the inverse cipher.
///
/// # Example
///
/// ```
/// use wolf_core::aes::{Aes, Key};
///
/// let aes = Aes::new(&Key::Aes128([7u8; 16]));
///
/// let mut block = *b"sixteen byte msg";
/// aes.encrypt_block(&mut block);
/// assert_ne!(&block, b"sixteen byte msg");
///
/// aes.decrypt_block(&mut block);
/// assert_eq!(&block, b"sixteen byte msg");
/// ```
#[derive(Clone)]
pub struct Aes {
    rk: [u8; MAX_ROUND_KEYS],
    rounds: usize
}

opaque_dbg! { Aes }

impl Aes {
    /// Expand `key`.
    pub fn new(key: &Key) -> Self {
        let key = key.as_slice();
        let nk = key.len() / 4;
        let rounds = nk + 6;
        let words = 4 * (rounds + 1);

        let mut rk = [0u8; MAX_ROUND_KEYS];
        rk[..key.len()].copy_from_slice(key);

        for i in nk..words {
            let mut temp = [rk[4 * i - 4], rk[4 * i - 3], rk[4 * i - 2], rk[4 * i - 1]];

            if i % nk == 0 {
                temp = [
                    SBOX[temp[1] as usize] ^ RCON[i / nk - 1],
                    SBOX[temp[2] as usize],
                    SBOX[temp[3] as usize],
                    SBOX[temp[0] as usize]
                ];
            } else if nk > 6 && i % nk == 4 {
                for b in &mut temp {
                    *b = SBOX[*b as usize];
                }
            }

            for j in 0..4 {
                rk[4 * i + j] = rk[4 * (i - nk) + j] ^ temp[j];
            }
        }

        Self { rk, rounds }
    }

    /// Expand a raw key of 16, 24 or 32 bytes.
    ///
    /// # Errors
    ///
    /// [`Error::KeySize`](crate::Error::KeySize) for any other length.
    pub fn new_from_slice(key: &[u8]) -> Result<Self, crate::Error> {
        let mut key = Key::try_from(key)?;
        let aes = Self::new(&key);
        key.zero();
        Ok(aes)
    }

    /// The number of rounds, 10, 12 or 14.
    #[inline]
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    #[inline(always)]
    fn add_round_key(&self, state: &mut [u8; 16], round: usize) {
        for (s, k) in state.iter_mut().zip(&self.rk[round * 16..round * 16 + 16]) {
            *s ^= *k;
        }
    }

    /// Encrypt one block in place.
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.add_round_key(block, 0);

        for round in 1..self.rounds {
            sub_bytes(block, &SBOX);
            shift_rows(block);
            mix_columns(block);
            self.add_round_key(block, round);
        }

        sub_bytes(block, &SBOX);
        shift_rows(block);
        self.add_round_key(block, self.rounds);
    }

    /// Decrypt one block in place.
    pub fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        self.add_round_key(block, self.rounds);

        for round in (1..self.rounds).rev() {
            inv_shift_rows(block);
            sub_bytes(block, &INV_SBOX);
            self.add_round_key(block, round);
            inv_mix_columns(block);
        }

        inv_shift_rows(block);
        sub_bytes(block, &INV_SBOX);
        self.add_round_key(block, 0);
    }

    /// Encrypt `input` into `output`.
    #[inline]
    pub fn encrypt_block_b2b(&self, input: &[u8; BLOCK_SIZE], output: &mut [u8; BLOCK_SIZE]) {
        *output = *input;
        self.encrypt_block(output);
    }

    /// Decrypt `input` into `output`.
    #[inline]
    pub fn decrypt_block_b2b(&self, input: &[u8; BLOCK_SIZE], output: &mut [u8; BLOCK_SIZE]) {
        *output = *input;
        self.decrypt_block(output);
    }

    /// Encrypt a block which is not necessarily aligned to an array.
    ///
    /// `block` must be exactly [`BLOCK_SIZE`] bytes.
    #[inline]
    pub(crate) fn encrypt_slice(&self, block: &mut [u8]) {
        let mut tmp = [0u8; BLOCK_SIZE];
        tmp.copy_from_slice(block);
        self.encrypt_block(&mut tmp);
        block.copy_from_slice(&tmp);
        tmp.zeroize();
    }

    /// See [`encrypt_slice`](Self::encrypt_slice).
    #[inline]
    pub(crate) fn decrypt_slice(&self, block: &mut [u8]) {
        let mut tmp = [0u8; BLOCK_SIZE];
        tmp.copy_from_slice(block);
        self.decrypt_block(&mut tmp);
        block.copy_from_slice(&tmp);
        tmp.zeroize();
    }
}

impl Drop for Aes {
    #[inline]
    fn drop(&mut self) {
        self.rk.zeroize();
    }
}

#[inline(always)]
fn sub_bytes(state: &mut [u8; 16], table: &[u8; 256]) {
    for b in state.iter_mut() {
        *b = table[*b as usize];
    }
}

// the state is column major, byte `r + 4c` is row `r` column `c`
#[inline(always)]
fn shift_rows(s: &mut [u8; 16]) {
    let t = *s;
    for c in 0..4 {
        for r in 1..4 {
            s[r + 4 * c] = t[r + 4 * ((c + r) % 4)];
        }
    }
}

#[inline(always)]
fn inv_shift_rows(s: &mut [u8; 16]) {
    let t = *s;
    for c in 0..4 {
        for r in 1..4 {
            s[r + 4 * ((c + r) % 4)] = t[r + 4 * c];
        }
    }
}

#[inline(always)]
fn mix_columns(s: &mut [u8; 16]) {
    for col in s.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        let all = a0 ^ a1 ^ a2 ^ a3;
        col[0] ^= all ^ xtime(a0 ^ a1);
        col[1] ^= all ^ xtime(a1 ^ a2);
        col[2] ^= all ^ xtime(a2 ^ a3);
        col[3] ^= all ^ xtime(a3 ^ a0);
    }
}

#[inline(always)]
fn inv_mix_columns(s: &mut [u8; 16]) {
    for col in s.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        col[0] = gmul(a0, 14) ^ gmul(a1, 11) ^ gmul(a2, 13) ^ gmul(a3, 9);
        col[1] = gmul(a0, 9) ^ gmul(a1, 14) ^ gmul(a2, 11) ^ gmul(a3, 13);
        col[2] = gmul(a0, 13) ^ gmul(a1, 9) ^ gmul(a2, 14) ^ gmul(a3, 11);
        col[3] = gmul(a0, 11) ^ gmul(a1, 13) ^ gmul(a2, 9) ^ gmul(a3, 14);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const PLAIN: [u8; 16] = hex!("00112233445566778899aabbccddeeff");

    fn counting<const N: usize>() -> [u8; N] {
        core::array::from_fn(|i| i as u8)
    }

    #[test]
    fn sbox_spot_checks() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x01], 0x7c);
        assert_eq!(SBOX[0x53], 0xed);
        assert_eq!(SBOX[0xff], 0x16);
        assert_eq!(INV_SBOX[0x63], 0x00);
    }

    #[test]
    fn fips197_appendix_c() {
        let cases: [(Key, [u8; 16]); 3] = [
            (Key::Aes128(counting()), hex!("69c4e0d86a7b0430d8cdb78070b4c55a")),
            (Key::Aes192(counting()), hex!("dda97ca4864cdfe06eaf70a0ec0d7191")),
            (Key::Aes256(counting()), hex!("8ea2b7ca516745bfeafc49904b496089"))
        ];

        for (key, expected) in cases {
            let aes = Aes::new(&key);
            let mut block = PLAIN;
            aes.encrypt_block(&mut block);
            assert_eq!(block, expected);
            aes.decrypt_block(&mut block);
            assert_eq!(block, PLAIN);
        }
    }

    #[test]
    fn bad_key_length() {
        assert_eq!(Aes::new_from_slice(&[0u8; 15]).unwrap_err(), crate::Error::KeySize);
        assert_eq!(Aes::new_from_slice(&[0u8; 24]).map(|a| a.rounds()), Ok(12));
    }
}
