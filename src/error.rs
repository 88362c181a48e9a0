use thiserror::Error;

use crate::params::{MAX_COST, MIN_COST, SALT_LEN};
use crate::version::Version;

/// Everything that can go wrong while hashing or verifying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BCryptError {
    #[error("invalid cost {0}: must be between {} and {}", MIN_COST, MAX_COST)]
    InvalidCost(u32),

    #[error("malformed hash: {0}")]
    Format(#[from] FormatError),

    #[error("hash uses version {found}, expected {expected}")]
    VersionMismatch { expected: Version, found: Version },

    #[error("invalid salt length: expected {} bytes, got {0}", SALT_LEN)]
    InvalidSaltLength(usize),

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("password too long: {len} bytes, at most {max} allowed")]
    PasswordTooLong { len: usize, max: usize },
}

/// Errors raised while parsing a hash string or decoding radix-64 text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("hash must start with '$'")]
    MissingPrefix,

    #[error("wrong number of '$' separated fields")]
    WrongFieldCount,

    #[error("unknown version token '{0}'")]
    UnknownVersion(String),

    #[error("cost field '{0}' is not two decimal digits")]
    MalformedCost(String),

    #[error("cost {0} is outside {}..={}", MIN_COST, MAX_COST)]
    CostOutOfRange(u32),

    #[error("salt and digest block must be {expected} symbols, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("invalid radix-64 symbol {symbol:?} at offset {offset}")]
    InvalidSymbol { symbol: char, offset: usize },

    #[error("radix-64 input ends with a single dangling symbol")]
    TruncatedGroup,
}

/// Coarse classification of [`BCryptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Hasher parameters are out of range.
    Configuration,
    /// A stored hash string could not be understood.
    Format,
    /// Caller supplied input that breaks the contract (salt size, empty password).
    Validation,
    /// Password exceeds the byte cap under the strict policy.
    Length,
}

impl BCryptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BCryptError::InvalidCost(_) => ErrorKind::Configuration,
            BCryptError::Format(_) | BCryptError::VersionMismatch { .. } => ErrorKind::Format,
            BCryptError::InvalidSaltLength(_)
            | BCryptError::EmptyPassword
            | BCryptError::InvalidPassword(_) => ErrorKind::Validation,
            BCryptError::PasswordTooLong { .. } => ErrorKind::Length,
        }
    }
}

pub type Result<T> = std::result::Result<T, BCryptError>;
