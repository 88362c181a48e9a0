use std::fmt;
use std::str::FromStr;

use crate::blowfish::{cycle_words, unsigned_byte, P_WORDS};
use crate::error::FormatError;

/// bcrypt hash version, the token between the first two `$` of a hash.
/// https://en.wikipedia.org/wiki/Bcrypt#Versioning_history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Two,
    TwoA,
    TwoB,
    /// crypt_blowfish's marker for hashes made with the sign extension bug.
    TwoX,
    TwoY,
}

impl Version {
    pub const ALL: [Version; 5] = [
        Version::Two,
        Version::TwoA,
        Version::TwoB,
        Version::TwoX,
        Version::TwoY,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Version::Two => "2",
            Version::TwoA => "2a",
            Version::TwoB => "2b",
            Version::TwoX => "2x",
            Version::TwoY => "2y",
        }
    }

    /// Turns the terminator-inclusive key into the 18 words XOR-ed into the
    /// Blowfish subkeys.
    pub(crate) fn key_words(self, key: &[u8]) -> [u32; P_WORDS] {
        match self {
            Version::TwoX => cycle_words(key, sign_extended_byte),
            Version::Two | Version::TwoA | Version::TwoB | Version::TwoY => {
                cycle_words(key, unsigned_byte)
            }
        }
    }
}

// Bytes >= 0x80 were widened as signed chars, so OR-ing them in clobbers the
// higher bytes already accumulated in the word.
fn sign_extended_byte(b: u8) -> u32 {
    b as i8 as i32 as u32
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| FormatError::UnknownVersion(s.to_string()))
    }
}
