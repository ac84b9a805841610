//! Counter key normalization.
//!
//! # Responsibilities
//! - Turn a request path into a store key
//! - Map path segments onto the `:` namespace separator
//! - Reject empty, oversized or malformed keys
//!
//! # Design Decisions
//! - Byte-wise character check, no regex in the hot path
//! - Keys are plain ASCII, so byte length equals character length

use std::fmt;
use thiserror::Error;

/// Maximum key length after trimming.
pub const MAX_KEY_LENGTH: usize = 1024;

/// Separator used in place of `/` inside a key.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Rejection reasons for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Key is invalid or too long")]
    Length,
    #[error("Key contains invalid characters")]
    InvalidCharacters,
}

/// A validated counter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey(String);

impl CounterKey {
    /// Normalize a raw request path into a key.
    ///
    /// Leading and trailing slashes are stripped, inner slashes become `:`.
    pub fn from_path(path: &str) -> Result<Self, KeyError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() || trimmed.len() > MAX_KEY_LENGTH {
            return Err(KeyError::Length);
        }

        let key: String = trimmed
            .chars()
            .map(|c| if c == '/' { NAMESPACE_SEPARATOR } else { c })
            .collect();
        if !key.bytes().all(is_key_byte) {
            return Err(KeyError::InvalidCharacters);
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CounterKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b':' | b'-')
}
