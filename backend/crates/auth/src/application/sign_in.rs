//! Sign In Use Case
//!
//! Checks credentials and signs a token. Every failure looks the same to
//! the caller.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::codes;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::application::TokenIssued;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{email::Email, token_payload::TokenSubject};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: ProfileRepository,
{
    repo: Arc<R>,
    tokens: TokenService<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: ProfileRepository,
{
    pub fn new(repo: Arc<R>, tokens: TokenService<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AppResult<TokenIssued> {
        let email = Email::new(input.email).map_err(|_| invalid_credentials())?;

        let Some(profile) = self.repo.find_by_email(&email).await? else {
            tracing::warn!("Sign-in for unknown email");
            return Err(invalid_credentials());
        };

        let password = ClearTextPassword::new(input.password).map_err(|_| invalid_credentials())?;

        if !profile.password_hash.verify(&password, self.config.pepper()) {
            tracing::warn!(user_id = %profile.id, "Sign-in with wrong password");
            return Err(invalid_credentials());
        }

        let (token, expires_at) = self.tokens.issue(&TokenSubject {
            subject_id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
        })?;

        tracing::info!(user_id = %profile.id, "User signed in");

        Ok(TokenIssued {
            profile,
            token,
            expires_at,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::auth(codes::INVALID_CREDENTIALS, "Invalid email or password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::infra::memory::InMemoryProfileRepository;
    use kernel::time::ManualClock;

    async fn setup() -> SignInUseCase<InMemoryProfileRepository> {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let config = Arc::new(AuthConfig::development());
        let tokens = TokenService::new(
            repo.clone(),
            Arc::new(config.token.clone()),
            Arc::new(ManualClock::new(1_700_000_000_000)),
        );

        SignUpUseCase::new(repo.clone(), tokens.clone(), config.clone())
            .execute(SignUpInput {
                email: "vendor@example.com".to_string(),
                password: "Tender#2024".to_string(),
                full_name: "Vendor".to_string(),
                company_name: None,
            })
            .await
            .unwrap();

        SignInUseCase::new(repo, tokens, config)
    }

    fn input(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let uc = setup().await;
        let issued = uc
            .execute(input("Vendor@Example.com", "Tender#2024"))
            .await
            .unwrap();
        assert_eq!(issued.profile.email.as_str(), "vendor@example.com");
        assert!(!issued.token.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let uc = setup().await;

        let wrong = uc
            .execute(input("vendor@example.com", "Tender#2025"))
            .await
            .unwrap_err();
        let unknown = uc
            .execute(input("nobody@example.com", "Tender#2024"))
            .await
            .unwrap_err();

        assert_eq!(wrong.code(), codes::INVALID_CREDENTIALS);
        assert_eq!(unknown.code(), codes::INVALID_CREDENTIALS);
        assert_eq!(wrong.message(), unknown.message());
        assert_eq!(wrong.status_code(), 401);
    }
}
