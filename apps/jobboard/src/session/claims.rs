//! Client-side expiry check for the bearer token.
//!
//! The signature is not verified here; the service does that on every call.
//! We only read `exp` to avoid a profile request with a token that is
//! already known to be dead.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// The `exp` claim, or `None` if the token is malformed or has no expiry.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}

/// True only for a decodable token whose `exp` lies strictly after `now`.
pub fn is_unexpired(token: &str, now: DateTime<Utc>) -> bool {
    expires_at(token).map(|exp| exp > now).unwrap_or(false)
}

#[cfg(test)]
pub(crate) fn make_token(exp_offset_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = Utc::now().timestamp() + exp_offset_secs;
    encode(
        &Header::default(),
        &serde_json::json!({"sub": "a@b.com", "exp": exp}),
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap()
}
