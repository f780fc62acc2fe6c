//! Scoped signing-key derivation.
//!
//! Implements the four-round HMAC-SHA256 chain used by AWS Signature
//! Version 4 to scope a long-lived secret to a single date, region, and
//! service:
//!
//! ```text
//! kDate    = HMAC("AWS4" || secret, date)
//! kRegion  = HMAC(kDate, region)
//! kService = HMAC(kRegion, service)
//! kSigning = HMAC(kService, "aws4_request")
//! ```
//!
//! The byte layout must not change; other implementations verify against it.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use sigvault_core::SecretString;
use zeroize::Zeroizing;

use crate::types::{DerivationContext, SigningKey};

type HmacSha256 = Hmac<Sha256>;

/// Prepended to the secret to form the first round's key.
const KEY_PREFIX: &[u8] = b"AWS4";

/// Message of the final round.
const TERMINATOR: &[u8] = b"aws4_request";

fn hmac_sha256(key: &[u8], data: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);

    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Derive a signing key from raw byte inputs.
pub fn derive_signing_key(secret: &[u8], date: &[u8], region: &[u8], service: &[u8]) -> SigningKey {
    let mut initial = Zeroizing::new(Vec::with_capacity(KEY_PREFIX.len() + secret.len()));
    initial.extend_from_slice(KEY_PREFIX);
    initial.extend_from_slice(secret);

    let k_date = hmac_sha256(&initial, date);
    let k_region = hmac_sha256(&k_date[..], region);
    let k_service = hmac_sha256(&k_region[..], service);
    let k_signing = hmac_sha256(&k_service[..], TERMINATOR);

    SigningKey::from_bytes(*k_signing)
}

/// Derive the signing key for `secret` scoped to `ctx`.
pub fn derive(secret: &SecretString, ctx: &DerivationContext) -> SigningKey {
    derive_signing_key(
        secret.expose_bytes(),
        ctx.date.as_bytes(),
        ctx.region.as_bytes(),
        ctx.service.as_bytes(),
    )
}
