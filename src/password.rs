use log::{debug, warn};
use sha2::{Digest, Sha512};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::{BCryptError, Result};
use crate::params::MAX_KEY_LEN;

/// Longest password accepted without loss: one byte of the key is the terminator.
pub const MAX_PASSWORD_LEN: usize = MAX_KEY_LEN - 1;

/// What to do with passwords that do not fit into the 72 byte key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongPasswordStrategy {
    /// Fail with [`BCryptError::PasswordTooLong`].
    Strict,
    /// Silently drop everything after the 72nd key byte, like every classic
    /// bcrypt implementation.
    Truncate,
    /// Replace an over-long password by its SHA-512 digest, so no part of it
    /// is ignored.
    Sha512Derive,
}

/// Builds the key the engine consumes: the password bytes followed by the
/// zero terminator, at most 72 bytes long.
pub(crate) fn prepare_key(
    password: &[u8],
    strategy: LongPasswordStrategy,
    reject_empty: bool,
) -> Result<Zeroizing<Vec<u8>>> {
    if reject_empty && password.is_empty() {
        return Err(BCryptError::EmptyPassword);
    }

    if password.len() <= MAX_PASSWORD_LEN {
        return Ok(terminated(password));
    }

    match strategy {
        LongPasswordStrategy::Strict => Err(BCryptError::PasswordTooLong {
            len: password.len(),
            max: MAX_PASSWORD_LEN,
        }),
        LongPasswordStrategy::Truncate => {
            warn!(
                "password of length {} is truncated to {} bytes",
                password.len(),
                MAX_KEY_LEN
            );
            Ok(Zeroizing::new(password[..MAX_KEY_LEN].to_vec()))
        }
        LongPasswordStrategy::Sha512Derive => {
            debug!(
                "password of length {} is replaced by its sha512 digest",
                password.len()
            );
            let digest = Zeroizing::new(Sha512::digest(password).to_vec());
            Ok(terminated(&digest))
        }
    }
}

fn terminated(password: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(Vec::with_capacity(password.len() + 1));
    key.extend_from_slice(password);
    key.push(0);
    key
}

/// Normalizes a text password to NFKC so visually identical inputs hash the
/// same, and returns its UTF-8 bytes.
///
/// Interior NUL characters are rejected: C implementations stop reading at
/// the first one, so such passwords would not round-trip between systems.
pub fn normalize_password(password: &str) -> Result<Zeroizing<Vec<u8>>> {
    let normalized = Zeroizing::new(password.nfkc().collect::<String>());
    if normalized.contains('\0') {
        return Err(BCryptError::InvalidPassword(
            "password contains null bytes".to_string(),
        ));
    }
    Ok(Zeroizing::new(normalized.as_bytes().to_vec()))
}
