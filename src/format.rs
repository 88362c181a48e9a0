//! The `$<version>$<cost>$<salt><digest>` text representation.

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;
use crate::params::{Cost, DIGEST_LEN, SALT_LEN};
use crate::radix64;
use crate::version::Version;

pub const ENCODED_SALT_LEN: usize = radix64::encoded_len(SALT_LEN);
pub const ENCODED_DIGEST_LEN: usize = radix64::encoded_len(DIGEST_LEN);

/// A bcrypt hash split into its decoded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParts {
    pub version: Version,
    pub cost: Cost,
    pub salt: [u8; SALT_LEN],
    pub digest: [u8; DIGEST_LEN],
}

/// Assembles a hash string from already encoded salt and digest.
pub fn format(version: Version, cost: Cost, salt_encoded: &str, digest_encoded: &str) -> String {
    format!("${}${}${}{}", version, cost, salt_encoded, digest_encoded)
}

/// Splits a hash string and decodes its salt and digest.
pub fn parse(hash: &str) -> Result<HashParts, FormatError> {
    let rest = hash.strip_prefix('$').ok_or(FormatError::MissingPrefix)?;

    let mut fields = rest.split('$');
    let (Some(version), Some(cost), Some(body), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(FormatError::WrongFieldCount);
    };

    let version = version.parse::<Version>()?;
    let cost = parse_cost(cost)?;

    let expected = ENCODED_SALT_LEN + ENCODED_DIGEST_LEN;
    if body.len() != expected || !body.is_ascii() {
        return Err(FormatError::WrongLength {
            expected,
            actual: body.chars().count(),
        });
    }

    let (salt, digest) = body.split_at(ENCODED_SALT_LEN);
    Ok(HashParts {
        version,
        cost,
        salt: decode_fixed(salt)?,
        digest: decode_fixed(digest)?,
    })
}

fn parse_cost(field: &str) -> Result<Cost, FormatError> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::MalformedCost(field.to_string()));
    }

    let value = field
        .parse::<u32>()
        .map_err(|_| FormatError::MalformedCost(field.to_string()))?;
    Cost::new(value).map_err(|_| FormatError::CostOutOfRange(value))
}

fn decode_fixed<const N: usize>(encoded: &str) -> Result<[u8; N], FormatError> {
    let decoded = radix64::decode(encoded)?;
    decoded.try_into().map_err(|_| FormatError::WrongLength {
        expected: radix64::encoded_len(N),
        actual: encoded.len(),
    })
}

impl fmt::Display for HashParts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format(
            self.version,
            self.cost,
            &radix64::encode(&self.salt),
            &radix64::encode(&self.digest),
        ))
    }
}

impl FromStr for HashParts {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
