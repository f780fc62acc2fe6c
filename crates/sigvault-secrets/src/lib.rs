//! Scoped signing-key backend for sigvault.
//!
//! Stores AWS-style credentials as attribute bags and derives SigV4 signing
//! keys bound to a date, region, and service. Callers that only need a
//! derived key never see the long-lived secret.
//!
//! Mount [`SignatureBackend::factory`] under [`BACKEND_TYPE`] in a
//! [`BackendRegistry`](sigvault_plugin_sdk::BackendRegistry).

pub mod backend;
pub mod error;
pub mod router;
pub mod signature;
pub mod store;
pub mod types;

pub use backend::{SignatureBackend, BACKEND_TYPE};
pub use error::{Result, SecretError};
pub use router::{Route, Router};
pub use signature::{derive, derive_signing_key};
pub use store::RecordStore;
pub use types::{DerivationContext, SecretRecord, SigningKey, SECRET_ACCESS_KEY, SIGNATURE_FIELD};
