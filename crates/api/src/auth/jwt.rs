//! HS256 access tokens and opaque refresh tokens.

use crowdfund_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::TokenConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// A freshly minted refresh token. Hand `token` to the client and store
/// only `digest`.
#[derive(Debug)]
pub struct NewRefreshToken {
    pub token: String,
    pub digest: String,
}

pub fn issue_access_token(
    config: &TokenConfig,
    user_id: DbId,
    role: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        exp: iat + config.access_ttl_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, algorithm and expiry.
pub fn verify_access_token(
    config: &TokenConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

pub fn new_refresh_token() -> NewRefreshToken {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let digest = refresh_token_digest(&token);
    NewRefreshToken { token, digest }
}

/// Lowercase hex SHA-256 of a refresh token, as stored in `refresh_tokens`.
pub fn refresh_token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
