//! The expensive key schedule ("EksBlowfish") and digest extraction.

use zeroize::Zeroizing;

use crate::blowfish::{cycle_words, unsigned_byte, Blowfish, P_WORDS};
use crate::params::{Cost, DIGEST_LEN, SALT_LEN};
use crate::version::Version;

const MAGIC: &[u8; 24] = b"OrpheanBeholderScryDoubt";
const MAGIC_ROUNDS: usize = 64;

/// Derives the raw 23 byte digest.
///
/// `key` is the prepared, terminator-inclusive password of 1..=72 bytes; the
/// caller validates it together with the salt before any work is done.
pub(crate) fn derive_digest(
    key: &[u8],
    salt: &[u8; SALT_LEN],
    cost: Cost,
    version: Version,
) -> [u8; DIGEST_LEN] {
    let state = eks_blowfish_setup(key, salt, cost, version);

    let mut ctext: [u32; 6] = cycle_words(MAGIC, unsigned_byte);
    for block in ctext.chunks_exact_mut(2) {
        for _ in 0..MAGIC_ROUNDS {
            let (l, r) = state.encrypt_block(block[0], block[1]);
            block[0] = l;
            block[1] = r;
        }
    }

    let mut output = [0u8; 4 * 6];
    for (bytes, word) in output.chunks_exact_mut(4).zip(ctext) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&output[..DIGEST_LEN]);
    digest
}

fn eks_blowfish_setup(key: &[u8], salt: &[u8; SALT_LEN], cost: Cost, version: Version) -> Blowfish {
    let key_words = Zeroizing::new(version.key_words(key));
    let salt_words: [u32; 4] = cycle_words(salt, unsigned_byte);
    let salt_key: [u32; P_WORDS] = cycle_words(salt, unsigned_byte);

    let mut state = Blowfish::init_state();
    state.expand_key_with_salt(&key_words, &salt_words);

    // Every round depends on the previous state; this loop is the work factor.
    for _ in 0..cost.rounds() {
        state.expand_key(&key_words);
        state.expand_key(&salt_key);
    }

    state
}
