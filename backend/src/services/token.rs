//! Session lifecycle: issuing, refreshing and revoking JWT pairs.
//!
//! Access tokens are verified offline (signature and expiry only). Refresh
//! tokens additionally pass the revocation gate, which consults the
//! [`CredentialStore`] and denies whenever it cannot positively confirm an
//! active credential.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    config::Config,
    error::CoreError,
    models::refresh_credential::NewRefreshCredential,
    repositories::CredentialStore,
    types::UserId,
    utils::jwt::{decode_token, encode_token, Claims, TokenKeys, TokenType},
};

/// Token pair handed back by a successful login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_jti: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

pub struct TokenService {
    keys: TokenKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    store: Arc<dyn CredentialStore>,
}

impl TokenService {
    pub fn new(
        keys: TokenKeys,
        access_ttl: Duration,
        refresh_ttl: Duration,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            keys,
            access_ttl,
            refresh_ttl,
            store,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn CredentialStore>) -> Self {
        Self::new(
            TokenKeys::from_secret(&config.jwt_secret),
            config.access_token_ttl(),
            config.refresh_token_ttl(),
            store,
        )
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Signs a fresh access/refresh pair for `user_id` and persists the
    /// refresh credential. Nothing is returned unless the store write
    /// succeeded, so every handed-out refresh token is tracked.
    pub async fn issue(&self, user_id: UserId) -> Result<IssuedTokens, CoreError> {
        let now = Utc::now();
        let access_claims = Claims::new(user_id, TokenType::Access, now, self.access_ttl);
        let refresh_claims = Claims::new(user_id, TokenType::Refresh, now, self.refresh_ttl);

        let access_token = encode_token(&access_claims, &self.keys)?;
        let refresh_token = encode_token(&refresh_claims, &self.keys)?;

        let credential = NewRefreshCredential {
            jti: refresh_claims.jti.clone(),
            user_id,
            expires_at: refresh_claims.expires_at()?,
        };
        self.store.insert(&credential).await.map_err(|err| {
            tracing::error!(%user_id, error = %err, "failed to persist refresh credential");
            CoreError::StoreUnavailable(err)
        })?;

        tracing::info!(%user_id, jti = %refresh_claims.jti, "session issued");
        Ok(IssuedTokens {
            access_token,
            refresh_token,
            refresh_jti: refresh_claims.jti,
            expires_in: self.access_ttl_seconds(),
        })
    }

    /// Runs the revocation gate on a refresh token and returns its claims.
    ///
    /// Signature and expiry are checked before the store is touched. An
    /// untracked, revoked or expired credential is `InvalidCredential`; a
    /// failed lookup is `StoreUnavailable`.
    pub async fn check(&self, refresh_token: &str) -> Result<Claims, CoreError> {
        let claims = decode_token(refresh_token, &self.keys, TokenType::Refresh)?;
        let user_id = claims.user_id()?;

        let credential = self.store.find_by_jti(&claims.jti).await?.ok_or_else(|| {
            CoreError::InvalidCredential(format!("untracked refresh credential {}", claims.jti))
        })?;

        if credential.user_id != user_id {
            return Err(CoreError::InvalidCredential(
                "refresh credential owner mismatch".into(),
            ));
        }
        if !credential.is_active(Utc::now()) {
            return Err(CoreError::InvalidCredential(format!(
                "refresh credential {} is revoked or expired",
                claims.jti
            )));
        }
        Ok(claims)
    }

    /// Boolean view of the gate. Any doubt, including a store failure, denies.
    pub async fn is_accepted(&self, refresh_token: &str) -> bool {
        match self.check(refresh_token).await {
            Ok(_) => true,
            Err(CoreError::StoreUnavailable(err)) => {
                tracing::warn!(error = %err, "credential lookup failed, denying refresh token");
                false
            }
            Err(err) => {
                tracing::debug!(reason = %err, "refresh token rejected");
                false
            }
        }
    }

    /// Issues a new access token for a refresh token that passes the gate.
    /// The refresh token itself is neither rotated nor re-stored.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, CoreError> {
        let claims = self.check(refresh_token).await.map_err(|err| {
            match &err {
                CoreError::StoreUnavailable(source) => {
                    tracing::error!(error = %source, "credential lookup failed during refresh")
                }
                other => tracing::warn!(reason = %other, "refresh token rejected"),
            }
            err
        })?;
        let user_id = claims.user_id()?;
        let access_claims = Claims::new(user_id, TokenType::Access, Utc::now(), self.access_ttl);
        encode_token(&access_claims, &self.keys)
    }

    /// Marks the credential revoked. Unknown or already revoked `jti`s are a
    /// no-op; only a store failure is an error.
    pub async fn revoke(&self, jti: &str) -> Result<(), CoreError> {
        let flipped = self
            .store
            .revoke(jti)
            .await
            .map_err(CoreError::RevocationFailed)?;
        if flipped {
            tracing::info!(jti, "session revoked");
        } else {
            tracing::debug!(jti, "revoke had no effect");
        }
        Ok(())
    }

    /// Revokes the credential behind a presented refresh token after
    /// checking its signature and expiry.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), CoreError> {
        let claims = decode_token(refresh_token, &self.keys, TokenType::Refresh)?;
        self.revoke(&claims.jti).await
    }

    /// Offline verification for access tokens presented on API calls.
    pub fn verify_access(&self, access_token: &str) -> Result<Claims, CoreError> {
        decode_token(access_token, &self.keys, TokenType::Access)
    }
}
