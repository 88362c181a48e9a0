//! Blowfish with the two key expansion variants bcrypt needs.
//!
//! The state is a plain value: every hash owns one, mutates it through
//! `&mut self` during the key schedule and drops it (wiped) afterwards.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::tables::{INIT_P, INIT_S};

pub(crate) const ROUNDS: usize = 16;
pub(crate) const P_WORDS: usize = ROUNDS + 2;

/// Cyclically reads `bytes` into `N` big-endian words, widening each byte
/// with `widen` before it is OR-ed into the word.
pub(crate) fn cycle_words<const N: usize>(bytes: &[u8], widen: fn(u8) -> u32) -> [u32; N] {
    let mut words = [0u32; N];
    if bytes.is_empty() {
        return words;
    }

    let mut j = 0;
    for word in words.iter_mut() {
        for _ in 0..4 {
            *word = (*word << 8) | widen(bytes[j]);
            j = (j + 1) % bytes.len();
        }
    }
    words
}

pub(crate) fn unsigned_byte(b: u8) -> u32 {
    b as u32
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct Blowfish {
    p: [u32; P_WORDS],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    pub(crate) fn init_state() -> Self {
        Blowfish {
            p: INIT_P,
            s: INIT_S,
        }
    }

    #[inline(always)]
    fn f(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        let h = self.s[0][a as usize].wrapping_add(self.s[1][b as usize]);
        (h ^ self.s[2][c as usize]).wrapping_add(self.s[3][d as usize])
    }

    /// Encrypts one 64-bit block given as its two 32-bit halves.
    pub(crate) fn encrypt_block(&self, mut left: u32, mut right: u32) -> (u32, u32) {
        for i in (0..ROUNDS).step_by(2) {
            left ^= self.p[i];
            right ^= self.f(left);
            right ^= self.p[i + 1];
            left ^= self.f(right);
        }
        left ^= self.p[ROUNDS];
        right ^= self.p[ROUNDS + 1];

        (right, left)
    }

    /// Standard Blowfish key expansion: XOR the subkeys with the key words,
    /// then refill every subkey and S-box entry by chaining encryptions of
    /// an all-zero block.
    pub(crate) fn expand_key(&mut self, key: &[u32; P_WORDS]) {
        self.xor_subkeys(key);

        let mut block = (0u32, 0u32);
        for i in (0..P_WORDS).step_by(2) {
            block = self.encrypt_block(block.0, block.1);
            self.p[i] = block.0;
            self.p[i + 1] = block.1;
        }

        for sbox in 0..4 {
            for i in (0..256).step_by(2) {
                block = self.encrypt_block(block.0, block.1);
                self.s[sbox][i] = block.0;
                self.s[sbox][i + 1] = block.1;
            }
        }
    }

    /// Like [`expand_key`](Self::expand_key) but the running block is XOR-ed
    /// with the next two salt words before every encryption.
    pub(crate) fn expand_key_with_salt(&mut self, key: &[u32; P_WORDS], salt: &[u32; 4]) {
        self.xor_subkeys(key);

        let mut block = (0u32, 0u32);
        let mut j = 0;
        let mut next_block = |state: &Self, block: (u32, u32)| {
            let l = block.0 ^ salt[j];
            let r = block.1 ^ salt[j + 1];
            j = (j + 2) % salt.len();
            state.encrypt_block(l, r)
        };

        for i in (0..P_WORDS).step_by(2) {
            block = next_block(self, block);
            self.p[i] = block.0;
            self.p[i + 1] = block.1;
        }

        for sbox in 0..4 {
            for i in (0..256).step_by(2) {
                block = next_block(self, block);
                self.s[sbox][i] = block.0;
                self.s[sbox][i + 1] = block.1;
            }
        }
    }

    fn xor_subkeys(&mut self, key: &[u32; P_WORDS]) {
        for (p, k) in self.p.iter_mut().zip(key) {
            *p ^= k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(key: &[u8]) -> Blowfish {
        let mut state = Blowfish::init_state();
        state.expand_key(&cycle_words(key, unsigned_byte));
        state
    }

    // Eric Young's reference vectors for plain Blowfish.
    #[test]
    fn test_reference_vectors() {
        let cases: [([u8; 8], (u32, u32), (u32, u32)); 3] = [
            ([0x00; 8], (0x00000000, 0x00000000), (0x4ef99745, 0x6198dd78)),
            ([0xff; 8], (0xffffffff, 0xffffffff), (0x51866fd5, 0xb85ecb8a)),
            (
                [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef],
                (0x11111111, 0x11111111),
                (0x61f9c380, 0x2281b096),
            ),
        ];

        for (key, plain, cipher) in cases {
            let state = keyed(&key);
            assert_eq!(state.encrypt_block(plain.0, plain.1), cipher);
        }
    }

    #[test]
    fn test_cycle_words() {
        let words: [u32; 3] = cycle_words(b"abcde", unsigned_byte);
        assert_eq!(words, [0x61626364, 0x65616263, 0x64656162]);

        let empty: [u32; 2] = cycle_words(&[], unsigned_byte);
        assert_eq!(empty, [0, 0]);
    }

    #[test]
    fn test_salted_expansion_with_zero_salt_matches_plain() {
        let key = cycle_words(b"key\0", unsigned_byte);
        let mut plain = Blowfish::init_state();
        plain.expand_key(&key);
        let mut salted = Blowfish::init_state();
        salted.expand_key_with_salt(&key, &[0; 4]);

        assert_eq!(plain.p, salted.p);
        assert_eq!(plain.s, salted.s);
    }

    #[test]
    fn test_salt_changes_state() {
        let key = cycle_words(b"key\0", unsigned_byte);
        let mut a = Blowfish::init_state();
        a.expand_key_with_salt(&key, &[1, 2, 3, 4]);
        let mut b = Blowfish::init_state();
        b.expand_key_with_salt(&key, &[1, 2, 3, 5]);

        assert_ne!(a.encrypt_block(0, 0), b.encrypt_block(0, 0));
    }
}
