//! Credential material held in memory.

use std::fmt;
use zeroize::Zeroizing;

/// A secret access key, wiped from memory when dropped.
///
/// Formatting prints `[REDACTED]`; the bytes are only reachable through
/// [`expose_bytes`](SecretString::expose_bytes).
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The secret as HMAC key material.
    pub fn expose_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
