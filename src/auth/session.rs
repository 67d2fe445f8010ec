use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Identity;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "webapp_jwt";

#[derive(Serialize, Deserialize, Debug)]
struct SessionClaims {
    #[serde(flatten)]
    identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Signs identities into compact HS256 tokens and verifies them back.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_in_s: Option<i64>,
}

impl SessionCodec {
    /// `ttl_in_s` adds an `exp` claim to every minted token; without it tokens never expire.
    pub fn new(secret: &str, ttl_in_s: Option<i64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        // exp is still checked whenever a token carries one
        validation.required_spec_claims.clear();

        SessionCodec {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_in_s,
        }
    }

    pub fn sign(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims {
            identity: identity.clone(),
            exp: self.ttl_in_s.map(|ttl| Utc::now().timestamp() + ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Returns the identity for a well-formed, untampered and unexpired token.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims.identity),
            Err(e) => {
                debug!("Rejecting session token: {}", e);
                None
            }
        }
    }
}
