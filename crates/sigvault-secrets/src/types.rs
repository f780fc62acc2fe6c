//! Core types for the signature backend.

use std::fmt;

use base64::Engine;
use sigvault_core::SecretString;
use sigvault_plugin_sdk::{AttributeValue, Attributes};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, SecretError};

/// Attribute holding the raw credential.
pub const SECRET_ACCESS_KEY: &str = "secret_access_key";

/// Response field carrying a derived key.
pub const SIGNATURE_FIELD: &str = "signature";

/// A stored secret: the caller's attribute bag under its key ID.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretRecord {
    /// Storage key, taken from the request path.
    pub key_id: String,

    /// Every field supplied on write, verbatim.
    pub attributes: Attributes,
}

impl SecretRecord {
    pub fn new(key_id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            key_id: key_id.into(),
            attributes,
        }
    }

    /// Decode `secret_access_key` as a string.
    ///
    /// Fails with [`SecretError::MalformedRecord`] if the field is absent or
    /// holds a non-string value.
    pub fn secret_access_key(&self) -> Result<SecretString> {
        match self.attributes.get(SECRET_ACCESS_KEY) {
            Some(AttributeValue::String(s)) => Ok(SecretString::new(s.as_str())),
            Some(other) => Err(SecretError::MalformedRecord {
                key: self.key_id.clone(),
                reason: format!("{} is a {}, expected a string", SECRET_ACCESS_KEY, other.kind()),
            }),
            None => Err(SecretError::MalformedRecord {
                key: self.key_id.clone(),
                reason: format!("{} is not set", SECRET_ACCESS_KEY),
            }),
        }
    }

    /// The stored `secret_access_key` exactly as written; `null` if unset.
    pub fn raw_secret_access_key(&self) -> AttributeValue {
        self.attributes
            .get(SECRET_ACCESS_KEY)
            .cloned()
            .unwrap_or(AttributeValue::Null)
    }
}

/// The date/region/service scope a signing key is bound to.
///
/// All three values are opaque and go into the hash chain verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationContext {
    pub date: String,
    pub region: String,
    pub service: String,
}

impl DerivationContext {
    pub fn new(
        date: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            region: region.into(),
            service: service.into(),
        }
    }
}

/// A derived 32-byte signing key. Zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    pub(crate) fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Standard, padded base64 encoding.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
