use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{error::CoreError, types::UserId};

/// Discriminates the two credential kinds. Unknown tags fail deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: UserId, token_type: TokenType, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<UserId, CoreError> {
        self.sub
            .parse()
            .map_err(|_| CoreError::InvalidCredential("malformed subject claim".into()))
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, CoreError> {
        DateTime::<Utc>::from_timestamp(self.exp, 0)
            .ok_or_else(|| CoreError::InvalidCredential("malformed expiry claim".into()))
    }
}

/// HMAC key pair derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKeys(<redacted>)")
    }
}

pub fn encode_token(claims: &Claims, keys: &TokenKeys) -> Result<String, CoreError> {
    let token = encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)?;
    Ok(token)
}

/// Verifies signature and expiry and checks the type discriminator.
pub fn decode_token(
    token: &str,
    keys: &TokenKeys,
    expected: TokenType,
) -> Result<Claims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(token, &keys.decoding, &validation)?.claims;
    if claims.token_type != expected {
        return Err(CoreError::InvalidCredential(format!(
            "expected {} token, got {}",
            expected.as_str(),
            claims.token_type.as_str()
        )));
    }
    Ok(claims)
}
