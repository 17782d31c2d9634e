//! Sign Up Use Case
//!
//! Creates a profile and signs the first token for it.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::codes;
use kernel::error::kind::ErrorKind;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::application::TokenIssued;
use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{email::Email, token_payload::TokenSubject};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company_name: Option<String>,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: ProfileRepository,
{
    repo: Arc<R>,
    tokens: TokenService<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
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

    pub async fn execute(&self, input: SignUpInput) -> AppResult<TokenIssued> {
        let email = Email::new(input.email)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash(self.config.pepper())?;

        let profile = Profile::new(
            email,
            input.full_name,
            input.company_name,
            password_hash,
            self.tokens.clock().now(),
        );

        // A concurrent sign-up may still win the unique index
        self.repo.create(&profile).await.map_err(|e| {
            if e.kind() == ErrorKind::Conflict {
                email_taken()
            } else {
                e
            }
        })?;

        let (token, expires_at) = self.tokens.issue(&TokenSubject {
            subject_id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
        })?;

        tracing::info!(user_id = %profile.id, "User signed up");

        Ok(TokenIssued {
            profile,
            token,
            expires_at,
        })
    }
}

fn email_taken() -> AppError {
    AppError::conflict("An account with this email already exists").with_code(codes::EMAIL_TAKEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryProfileRepository;
    use kernel::time::ManualClock;

    fn use_case() -> SignUpUseCase<InMemoryProfileRepository> {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let config = Arc::new(AuthConfig::development());
        let tokens = TokenService::new(
            repo.clone(),
            Arc::new(config.token.clone()),
            Arc::new(ManualClock::new(1_700_000_000_000)),
        );
        SignUpUseCase::new(repo, tokens, config)
    }

    fn input(email: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: "Tender#2024".to_string(),
            full_name: "Asha Rao".to_string(),
            company_name: Some("Rao Infra".to_string()),
        }
    }

    #[tokio::test]
    async fn test_sign_up_issues_verifiable_token() {
        let uc = use_case();
        let issued = uc.execute(input("asha@example.com")).await.unwrap();

        let payload = uc.tokens.verify_token(&issued.token).unwrap();
        assert_eq!(payload.subject_id, issued.profile.id);
        assert_eq!(payload.email.as_str(), "asha@example.com");
        assert_ne!(issued.profile.password_hash.as_phc_string(), "Tender#2024");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let uc = use_case();
        uc.execute(input("asha@example.com")).await.unwrap();

        let err = uc.execute(input("ASHA@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.code(), codes::EMAIL_TAKEN);
    }
}
