//! bcrypt password hashing implemented from scratch.
//!
//! bcrypt is a password hashing function designed by Niels Provos and David
//! Mazières, based on the Blowfish cipher, and presented in 1999 at the Usenix
//! Security Symposium. Its key schedule is repeated `2^cost` times, so the
//! work needed per guess can be raised as hardware gets faster.
//!
//! ```no_run
//! use bcrypt_rs::{BCrypt, LongPasswordStrategy, Version};
//!
//! let bcrypt = BCrypt::new(12, Version::TwoB, LongPasswordStrategy::Strict)?;
//! let hash = bcrypt.hash("hunter2")?;
//! assert!(bcrypt.verify("hunter2", &hash));
//! # Ok::<(), bcrypt_rs::BCryptError>(())
//! ```

mod bcrypt;
mod blowfish;
mod eks;
mod error;
pub mod format;
mod params;
mod password;
pub mod radix64;
mod tables;
mod version;

pub use crate::bcrypt::{generate_salt, BCrypt};
pub use crate::error::{BCryptError, ErrorKind, FormatError, Result};
pub use crate::format::HashParts;
pub use crate::params::{Cost, DEFAULT_COST, DIGEST_LEN, MAX_COST, MAX_KEY_LEN, MIN_COST, SALT_LEN};
pub use crate::password::{normalize_password, LongPasswordStrategy, MAX_PASSWORD_LEN};
pub use crate::version::Version;
