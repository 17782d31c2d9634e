//! Token Service
//!
//! Issues and verifies HS256 identity tokens. A token is accepted only when
//! its signature verifies, `iss` and `aud` match the configuration and the
//! injected clock reads strictly before `exp`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::error::app_error::AppResult;
use kernel::id::UserId;
use kernel::time::SharedClock;
use serde::{Deserialize, Serialize};

use crate::application::config::TokenConfig;
use crate::domain::entity::authenticated_user::AuthenticatedUser;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{
    email::Email,
    token_payload::{TokenPayload, TokenSubject},
    user_role::UserRole,
};
use crate::error::TokenError;

/// Wire claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: UserRole,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

impl Claims {
    fn into_payload(self) -> Result<TokenPayload, TokenError> {
        let subject_id = self
            .sub
            .parse::<UserId>()
            .map_err(|e| TokenError::Invalid(format!("subject: {e}")))?;
        let email = Email::new(self.email)
            .map_err(|e| TokenError::Invalid(format!("email: {e}")))?;
        let issued_at = timestamp(self.iat)?;
        let expires_at = timestamp(self.exp)?;

        Ok(TokenPayload {
            subject_id,
            email,
            role: self.role,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenError::Invalid(format!("timestamp out of range: {secs}")))
}

/// Token service
pub struct TokenService<R> {
    repo: Arc<R>,
    config: Arc<TokenConfig>,
    clock: SharedClock,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R> Clone for TokenService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
            encoding_key: self.encoding_key.clone(),
            decoding_key: self.decoding_key.clone(),
            validation: self.validation.clone(),
        }
    }
}

impl<R> TokenService<R>
where
    R: ProfileRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<TokenConfig>, clock: SharedClock) -> Self {
        let secret = config.secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "aud", "sub"]);
        // Expiry is checked against the injected clock
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            repo,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub(crate) fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Sign `subject` for `ttl`
    pub fn generate_token(&self, subject: &TokenSubject, ttl: chrono::Duration) -> AppResult<String> {
        let iat = self.clock.now_ms().div_euclid(1000);
        let claims = Claims {
            sub: subject.subject_id.to_string(),
            email: subject.email.to_string(),
            role: subject.role,
            iat,
            exp: iat + ttl.num_seconds(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e).into())
    }

    /// Sign `subject` with the configured lifetime
    pub fn issue(&self, subject: &TokenSubject) -> AppResult<(String, DateTime<Utc>)> {
        let ttl = chrono::Duration::seconds(self.config.ttl_secs());
        let token = self.generate_token(subject, ttl)?;
        let expires_at = self.clock.now() + ttl;
        Ok((token, expires_at))
    }

    fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let payload = data.claims.into_payload()?;

        if self.clock.now_ms() >= payload.expires_at.timestamp_millis() {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }

    /// Verify signature, issuer, audience and expiry
    pub fn verify_token(&self, token: &str) -> AppResult<TokenPayload> {
        self.decode(token).map_err(|e| {
            tracing::debug!(code = e.code(), reason = %e, "Token rejected");
            e.into()
        })
    }

    /// Verified token merged with the stored profile
    ///
    /// Verification failures are errors. A missing profile or a failing
    /// store is `Ok(None)`: the caller is simply unauthenticated.
    pub async fn get_user_from_token(&self, token: &str) -> AppResult<Option<AuthenticatedUser>> {
        let payload = self.verify_token(token)?;

        match self.repo.find_by_id(&payload.subject_id).await {
            Ok(Some(profile)) => Ok(Some(AuthenticatedUser::from_parts(payload, &profile))),
            Ok(None) => {
                tracing::debug!(user_id = %payload.subject_id, "Token subject has no profile");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %payload.subject_id,
                    error = %e,
                    "Profile lookup failed; treating caller as unauthenticated"
                );
                Ok(None)
            }
        }
    }
}
