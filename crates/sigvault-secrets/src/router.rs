//! Path routing for the signature backend.
//!
//! Paths are relative to the mount point and come in three shapes:
//!
//! | Shape                                  | Route                  |
//! |----------------------------------------|------------------------|
//! | `{key_id}`                             | [`Route::Key`]         |
//! | `{key_id}/{date}/{service}/{region}`   | [`Route::Signature`]   |
//! | `raw/{key_id}`                         | [`Route::Raw`]         |
//!
//! Every segment is drawn from `[A-Za-z0-9_.-]`.

use regex::Regex;

use crate::error::{Result, SecretError};
use crate::types::DerivationContext;

const SEGMENT: &str = r"[A-Za-z0-9_.\-]+";

/// A parsed request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A stored record, for write, bare read, or delete.
    Key { key_id: String },

    /// A read that derives a key scoped to `context`.
    Signature {
        key_id: String,
        context: DerivationContext,
    },

    /// A read of the stored credential itself.
    Raw { key_id: String },
}

impl Route {
    /// The key ID every route carries.
    pub fn key_id(&self) -> &str {
        match self {
            Route::Key { key_id } | Route::Signature { key_id, .. } | Route::Raw { key_id } => {
                key_id
            }
        }
    }
}

/// Parses relative paths into [`Route`]s.
#[derive(Debug, Clone)]
pub struct Router {
    signature: Regex,
    raw: Regex,
    key: Regex,
    segment: Regex,
}

impl Router {
    pub fn new() -> Self {
        let seg = SEGMENT;
        Self {
            signature: Regex::new(&format!(
                r"^(?P<key_id>{seg})/(?P<date>{seg})/(?P<service>{seg})/(?P<region>{seg})$"
            ))
            .expect("invalid regex"),
            raw: Regex::new(&format!(r"^raw/(?P<key_id>{seg})$")).expect("invalid regex"),
            key: Regex::new(&format!(r"^(?P<key_id>{seg})$")).expect("invalid regex"),
            segment: Regex::new(&format!(r"^{seg}$")).expect("invalid regex"),
        }
    }

    /// Parse `path` into a route.
    pub fn route(&self, path: &str) -> Result<Route> {
        if let Some(caps) = self.signature.captures(path) {
            return Ok(Route::Signature {
                key_id: caps["key_id"].to_string(),
                context: DerivationContext::new(
                    &caps["date"],
                    &caps["region"],
                    &caps["service"],
                ),
            });
        }

        if let Some(caps) = self.raw.captures(path) {
            return Ok(Route::Raw {
                key_id: caps["key_id"].to_string(),
            });
        }

        if let Some(caps) = self.key.captures(path) {
            return Ok(Route::Key {
                key_id: caps["key_id"].to_string(),
            });
        }

        Err(self.rejection(path))
    }

    fn rejection(&self, path: &str) -> SecretError {
        let reason = match path.split('/').find(|s| !self.segment.is_match(s)) {
            Some("") => "empty path segment".to_string(),
            Some(bad) => format!("segment '{}' contains characters outside [A-Za-z0-9_.-]", bad),
            None => format!(
                "expected 1 segment, 'raw/' plus 1 segment, or 4 segments; got {}",
                path.split('/').count()
            ),
        };

        SecretError::InvalidPath {
            path: path.to_string(),
            reason,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
