//! CMAC (RFC 4493 / NIST SP 800-38B), the core under [`Cmac`], EAX and SIV.
//!
//! [`Cmac`]: crate::mac::cmac::Cmac
use zeroize::Zeroize;
use crate::aes::{Aes, Key, BLOCK_SIZE};

/// Multiply by `x` in GF(2^128), the `dbl` of RFC 5297.
#[inline]
pub(crate) fn dbl(block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let v = u128::from_be_bytes(*block);
    let carry = 0u128.wrapping_sub(v >> 127);
    ((v << 1) ^ (carry & 0x87)).to_be_bytes()
}

/// The block cipher and the two derived subkeys.
pub(crate) struct CmacKey {
    pub(crate) aes: Aes,
    k1: [u8; BLOCK_SIZE],
    k2: [u8; BLOCK_SIZE]
}

impl CmacKey {
    pub(crate) fn new(key: &Key) -> Self {
        Self::from_aes(Aes::new(key))
    }

    pub(crate) fn from_aes(aes: Aes) -> Self {
        let mut l = [0u8; BLOCK_SIZE];
        aes.encrypt_block(&mut l);
        let k1 = dbl(&l);
        let k2 = dbl(&k1);
        l.zeroize();
        Self { aes, k1, k2 }
    }

    /// CMAC of `data` in one call.
    pub(crate) fn mac(&self, data: &[u8]) -> [u8; BLOCK_SIZE] {
        let mut run = CmacRun::new();
        run.update(self, data);
        run.finish(self)
    }
}

impl Drop for CmacKey {
    fn drop(&mut self) {
        self.k1.zeroize();
        self.k2.zeroize();
    }
}

/// The chaining value of one CMAC computation.
///
/// The last block is held back until [`finish`](Self::finish) since only then is it known
/// whether it is complete.
pub(crate) struct CmacRun {
    x: [u8; BLOCK_SIZE],
    buf: [u8; BLOCK_SIZE],
    buf_len: usize
}

impl CmacRun {
    pub(crate) const fn new() -> Self {
        Self { x: [0u8; BLOCK_SIZE], buf: [0u8; BLOCK_SIZE], buf_len: 0 }
    }

    #[inline]
    fn chain(&mut self, key: &CmacKey) {
        for (x, b) in self.x.iter_mut().zip(self.buf.iter()) {
            *x ^= *b;
        }
        key.aes.encrypt_block(&mut self.x);
        self.buf_len = 0;
    }

    pub(crate) fn update(&mut self, key: &CmacKey, mut data: &[u8]) {
        while !data.is_empty() {
            if self.buf_len == BLOCK_SIZE {
                self.chain(key);
            }
            let take = (BLOCK_SIZE - self.buf_len).min(data.len());
            self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&data[..take]);
            self.buf_len += take;
            data = &data[take..];
        }
    }

    /// The full 16 byte MAC, the run must not be used afterwards.
    pub(crate) fn finish(&mut self, key: &CmacKey) -> [u8; BLOCK_SIZE] {
        let subkey = if self.buf_len == BLOCK_SIZE {
            &key.k1
        } else {
            self.buf[self.buf_len] = 0x80;
            self.buf[self.buf_len + 1..].fill(0);
            &key.k2
        };
        for (b, k) in self.buf.iter_mut().zip(subkey.iter()) {
            *b ^= *k;
        }
        self.chain(key);
        self.x
    }
}

impl Drop for CmacRun {
    fn drop(&mut self) {
        self.x.zeroize();
        self.buf.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const KEY: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");
    const MSG: [u8; 64] = hex!(
        "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"
        "30c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710"
    );

    #[test]
    fn rfc4493_subkeys() {
        let key = CmacKey::new(&Key::Aes128(KEY));
        assert_eq!(key.k1, hex!("fbeed618357133667c85e08f7236a8de"));
        assert_eq!(key.k2, hex!("f7ddac306ae266ccf90bc11ee46d513b"));
    }

    #[test]
    fn rfc4493_examples() {
        let key = CmacKey::new(&Key::Aes128(KEY));
        assert_eq!(key.mac(&[]), hex!("bb1d6929e95937287fa37d129b756746"));
        assert_eq!(key.mac(&MSG[..16]), hex!("070a16b46b4d4144f79bdd9dd04a287c"));
        assert_eq!(key.mac(&MSG[..40]), hex!("dfa66747de9ae63030ca32611497c827"));
        assert_eq!(key.mac(&MSG), hex!("51f0bebf7e3b9d92fc49741779363cfe"));
    }

    #[test]
    fn pieces_match_whole() {
        let key = CmacKey::new(&Key::Aes128(KEY));
        for split in 0..=MSG.len() {
            let mut run = CmacRun::new();
            run.update(&key, &MSG[..split]);
            run.update(&key, &[]);
            run.update(&key, &MSG[split..]);
            assert_eq!(run.finish(&key), key.mac(&MSG), "split {split}");
        }
    }

    #[test]
    fn dbl_reduces() {
        assert_eq!(dbl(&[0u8; 16]), [0u8; 16]);
        let mut top = [0u8; 16];
        top[0] = 0x80;
        let mut expected = [0u8; 16];
        expected[15] = 0x87;
        assert_eq!(dbl(&top), expected);
    }
}
