use log::debug;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::eks::derive_digest;
use crate::error::{BCryptError, Result};
use crate::format::{self, HashParts};
use crate::params::{Cost, SALT_LEN};
use crate::password::{prepare_key, LongPasswordStrategy};
use crate::version::Version;

/// A configured bcrypt hasher and verifier.
///
/// Every call builds its own cipher state, so a single `BCrypt` can be shared
/// freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BCrypt {
    cost: Cost,
    version: Version,
    long_password: LongPasswordStrategy,
    reject_empty: bool,
}

impl BCrypt {
    pub fn new(cost: u32, version: Version, long_password: LongPasswordStrategy) -> Result<Self> {
        Ok(BCrypt {
            cost: Cost::new(cost)?,
            version,
            long_password,
            reject_empty: false,
        })
    }

    /// Makes hashing and verifying fail with [`BCryptError::EmptyPassword`]
    /// for zero length passwords.
    pub fn reject_empty_passwords(mut self) -> Self {
        self.reject_empty = true;
        self
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Hashes with a fresh salt from the thread-local CSPRNG.
    pub fn hash<P: AsRef<[u8]>>(&self, password: P) -> Result<String> {
        self.hash_with_rng(&mut rand::thread_rng(), password)
    }

    pub fn hash_with_rng<R, P>(&self, rng: &mut R, password: P) -> Result<String>
    where
        R: RngCore + CryptoRng,
        P: AsRef<[u8]>,
    {
        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut salt);
        self.hash_with_salt(password, &salt)
    }

    pub fn hash_with_salt<P: AsRef<[u8]>>(&self, password: P, salt: &[u8]) -> Result<String> {
        Ok(self.hash_raw(password, salt)?.to_string())
    }

    /// Hashes and returns the decoded fields instead of the final string.
    pub fn hash_raw<P: AsRef<[u8]>>(&self, password: P, salt: &[u8]) -> Result<HashParts> {
        let salt: [u8; SALT_LEN] = salt
            .try_into()
            .map_err(|_| BCryptError::InvalidSaltLength(salt.len()))?;
        let key = prepare_key(password.as_ref(), self.long_password, self.reject_empty)?;

        debug!("hashing with version {} cost {}", self.version, self.cost);
        let digest = derive_digest(&key, &salt, self.cost, self.version);

        Ok(HashParts {
            version: self.version,
            cost: self.cost,
            salt,
            digest,
        })
    }

    /// Checks `password` against a stored hash.
    ///
    /// Version and cost come from the hash itself. A hash that cannot be
    /// parsed, or a password this hasher refuses, simply does not verify.
    pub fn verify<P: AsRef<[u8]>>(&self, password: P, hash: &str) -> bool {
        let parts = match format::parse(hash) {
            Ok(parts) => parts,
            Err(err) => {
                debug!("stored hash rejected: {}", err);
                return false;
            }
        };

        match self.check(password.as_ref(), &parts) {
            Ok(verified) => verified,
            Err(err) => {
                debug!("password rejected before verification: {}", err);
                false
            }
        }
    }

    /// Like [`verify`](Self::verify) but malformed hashes, hashes of another
    /// version than this hasher's and refused passwords are reported as errors.
    pub fn verify_strict<P: AsRef<[u8]>>(&self, password: P, hash: &str) -> Result<bool> {
        let parts = format::parse(hash)?;
        if parts.version != self.version {
            return Err(BCryptError::VersionMismatch {
                expected: self.version,
                found: parts.version,
            });
        }
        self.check(password.as_ref(), &parts)
    }

    fn check(&self, password: &[u8], parts: &HashParts) -> Result<bool> {
        let key = prepare_key(password, self.long_password, self.reject_empty)?;

        debug!("verifying with version {} cost {}", parts.version, parts.cost);
        let digest = derive_digest(&key, &parts.salt, parts.cost, parts.version);

        Ok(digest[..].ct_eq(&parts.digest[..]).into())
    }
}

// Helper function to generate a random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, FormatError};
    use crate::password::normalize_password;

    fn hasher(cost: u32) -> BCrypt {
        BCrypt::new(cost, Version::TwoA, LongPasswordStrategy::Strict).unwrap()
    }

    #[test]
    fn test_basic_hashing() -> Result<()> {
        let hash = hasher(4).hash("password123")?;
        assert!(hash.starts_with("$2a$04$"));
        assert_eq!(hash.len(), 60);
        Ok(())
    }

    #[test]
    fn test_password_verification() -> Result<()> {
        let bcrypt = hasher(4);

        let password = "test_password";
        let hash = bcrypt.hash(password)?;

        assert!(bcrypt.verify(password, &hash));
        assert!(!bcrypt.verify("wrong_password", &hash));
        assert!(bcrypt.verify_strict(password, &hash)?);
        assert!(!bcrypt.verify_strict("wrong_password", &hash)?);
        Ok(())
    }

    #[test]
    fn test_password_normalization() -> Result<()> {
        let bcrypt = hasher(4);
        let salt = generate_salt();

        let hash1 = bcrypt.hash_with_salt(normalize_password("café")?.as_slice(), &salt)?;
        let hash2 = bcrypt.hash_with_salt(normalize_password("cafe\u{0301}")?.as_slice(), &salt)?;

        assert_eq!(hash1, hash2);
        Ok(())
    }

    #[test]
    fn test_invalid_passwords() {
        let bcrypt = hasher(4);
        let too_long = "a".repeat(72);

        assert_eq!(
            bcrypt.hash(&too_long).map_err(|e| e.kind()),
            Err(ErrorKind::Length)
        );
        assert!(bcrypt.hash("a".repeat(71)).is_ok());

        // empty passwords are fine unless refused explicitly
        assert!(bcrypt.hash("").is_ok());
        assert_eq!(
            bcrypt.clone().reject_empty_passwords().hash(""),
            Err(BCryptError::EmptyPassword)
        );
    }

    #[test]
    fn test_invalid_cost_factors() {
        for cost in [0, 3, 32, 100] {
            let err = BCrypt::new(cost, Version::TwoB, LongPasswordStrategy::Strict).unwrap_err();
            assert_eq!(err, BCryptError::InvalidCost(cost));
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }

        assert!(BCrypt::new(4, Version::TwoB, LongPasswordStrategy::Strict).is_ok());
        assert!(BCrypt::new(31, Version::TwoB, LongPasswordStrategy::Strict).is_ok());
    }

    #[test]
    fn test_invalid_salt_length() {
        let bcrypt = hasher(4);
        assert_eq!(
            bcrypt.hash_with_salt("pw", &[0u8; 15]),
            Err(BCryptError::InvalidSaltLength(15))
        );
        assert_eq!(
            bcrypt.hash_raw("pw", &[0u8; 17]),
            Err(BCryptError::InvalidSaltLength(17))
        );
    }

    #[test]
    fn test_salt_generation() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        assert_ne!(salt1, salt2);
        assert_eq!(salt1.len(), SALT_LEN);
    }

    #[test]
    fn test_known_hashes() -> Result<()> {
        // Test vectors from the original bcrypt test suites
        let test_vectors = [
            (
                "",
                "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.",
            ),
            (
                "a",
                "$2a$06$m0CrhHm10qJ3lXRY.5zDGO3rS2KdeeWLuGmsfGlMfOxih58VYVfxe",
            ),
        ];

        for (password, expected_hash) in test_vectors {
            let parts = format::parse(expected_hash)?;
            let bcrypt = BCrypt::new(6, Version::TwoA, LongPasswordStrategy::Strict)?;
            let hash = bcrypt.hash_with_salt(password, &parts.salt)?;
            assert_eq!(hash, expected_hash);
            assert!(bcrypt.verify(password, expected_hash));
        }
        Ok(())
    }

    #[test]
    fn test_verify_uses_parameters_of_the_hash() -> Result<()> {
        let stored = hasher(5).hash("hunter2")?;
        let other = BCrypt::new(4, Version::TwoB, LongPasswordStrategy::Strict)?;
        assert!(other.verify("hunter2", &stored));
        Ok(())
    }

    #[test]
    fn test_lenient_and_strict_parse_failures() {
        let bcrypt = hasher(4);
        let hash = "$2a$04$n4Uy0eSnMfvnESYL.bLwuuj0U/ETSsoTpRT9GVk$5bektyVVa5xnIi";

        assert!(!bcrypt.verify("correctbatteryhorsestapler", hash));
        assert_eq!(
            bcrypt.verify_strict("correctbatteryhorsestapler", hash),
            Err(BCryptError::Format(FormatError::WrongFieldCount))
        );
    }

    #[test]
    fn test_strict_version_mismatch() -> Result<()> {
        let hash = "$2b$04$EGdrhbKUv8Oc9vGiXX0HQOxSg445d458Muh7DAHskb6QbtCvdxcie";
        let bcrypt = hasher(4);

        assert!(bcrypt.verify("correctbatteryhorsestapler", hash));
        assert_eq!(
            bcrypt.verify_strict("correctbatteryhorsestapler", hash),
            Err(BCryptError::VersionMismatch {
                expected: Version::TwoA,
                found: Version::TwoB,
            })
        );

        let matching = BCrypt::new(4, Version::TwoB, LongPasswordStrategy::Strict)?;
        assert!(matching.verify_strict("correctbatteryhorsestapler", hash)?);
        Ok(())
    }

    #[test]
    fn test_single_character_corruption() -> Result<()> {
        let bcrypt = hasher(4);
        let hash = bcrypt.hash_with_salt("secret", &[0x42; SALT_LEN])?;
        assert!(bcrypt.verify("secret", &hash));

        let corrupt = |index: usize, replacement: char| {
            let mut bytes: Vec<char> = hash.chars().collect();
            bytes[index] = replacement;
            bytes.into_iter().collect::<String>()
        };

        // version token, cost digits, alphabet range, separators
        for (index, replacement) in [(2, 'c'), (4, 'x'), (5, '3'), (10, '!'), (40, '+'), (3, '#'), (0, '#')] {
            let broken = corrupt(index, replacement);
            assert!(!bcrypt.verify("secret", &broken), "{}", broken);
            assert!(bcrypt.verify_strict("secret", &broken).is_err(), "{}", broken);
        }

        // a different digest symbol parses but no longer matches
        let broken = corrupt(40, if hash.as_bytes()[40] == b'a' { 'b' } else { 'a' });
        assert!(!bcrypt.verify("secret", &broken));
        assert_eq!(bcrypt.verify_strict("secret", &broken), Ok(false));
        Ok(())
    }

    #[test]
    fn test_long_password_strategies() -> Result<()> {
        let password = "x".repeat(100);
        let salt = [0x11; SALT_LEN];

        let truncate = BCrypt::new(4, Version::TwoB, LongPasswordStrategy::Truncate)?;
        assert_eq!(
            truncate.hash_with_salt(&password, &salt)?,
            "$2b$04$CPCPCPCPCPCPCPCPCPCPCOeIIlJGuCdUeu9QqaxPQddCHV3oDkSs6"
        );
        // only the first 72 bytes count
        assert!(truncate.verify("x".repeat(72), &truncate.hash_with_salt(&password, &salt)?));

        let derive = BCrypt::new(4, Version::TwoB, LongPasswordStrategy::Sha512Derive)?;
        let derived = derive.hash_with_salt(&password, &salt)?;
        assert_eq!(
            derived,
            "$2b$04$CPCPCPCPCPCPCPCPCPCPCOxyIPnTNXECjlFNH1um4jrZ0g6JDI6X6"
        );
        assert!(!derive.verify("x".repeat(72), &derived));
        assert!(derive.verify(&password, &derived));

        let strict = BCrypt::new(4, Version::TwoB, LongPasswordStrategy::Strict)?;
        assert!(!strict.verify(&password, &derived));
        assert_eq!(
            strict.verify_strict(&password, &derived).map_err(|e| e.kind()),
            Err(ErrorKind::Length)
        );
        Ok(())
    }

    #[test]
    fn test_hash_with_injected_rng() -> Result<()> {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let bcrypt = hasher(4);
        let first = bcrypt.hash_with_rng(&mut StdRng::seed_from_u64(7), "pw")?;
        let second = bcrypt.hash_with_rng(&mut StdRng::seed_from_u64(7), "pw")?;
        let third = bcrypt.hash_with_rng(&mut StdRng::seed_from_u64(8), "pw")?;

        assert_eq!(first, second);
        assert_ne!(first, third);
        Ok(())
    }
}
