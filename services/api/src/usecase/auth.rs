//! Sign-in, registration and authorization checks. Token verification is
//! delegated to the identity provider; the local row supplies role and id.

use chrono::Utc;
use uuid::Uuid;

use farmbase_domain::user::UserRole;

use crate::domain::repository::{EmailSender, IdentityProvider, UserRepository};
use crate::domain::types::User;
use crate::error::ApiError;

/// A signed-in caller together with the tokens the provider issued.
pub struct AuthOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

// ── Authorize ────────────────────────────────────────────────────────────────

/// Authorization predicates. These never fail: a missing, malformed or
/// expired token and a provider error all come out as "not authorized".
pub struct AuthorizeUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> AuthorizeUseCase<R, P> {
    /// Resolve an access token to the local user row, or `None`.
    pub async fn caller(&self, access_token: Option<&str>) -> Option<User> {
        let token = access_token?;
        let account = self.provider.verify_token(token).await.ok()?;
        self.repo.find_by_auth_id(&account.subject).await.ok()?
    }

    pub async fn by_role(&self, access_token: Option<&str>, roles: &[UserRole]) -> bool {
        self.caller(access_token)
            .await
            .is_some_and(|user| roles.contains(&user.role))
    }

    pub async fn by_user_id(&self, access_token: Option<&str>, user_id: Uuid) -> bool {
        self.caller(access_token)
            .await
            .is_some_and(|user| user.id == user_id)
    }

    pub async fn by_email(&self, access_token: Option<&str>, email: &str) -> bool {
        self.caller(access_token)
            .await
            .is_some_and(|user| user.email == email)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> LoginUseCase<R, P> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        let user = self
            .repo
            .find_by_auth_id(&session.subject)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("user with authId {} not found.", session.subject))
            })?;
        Ok(AuthOutcome {
            user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        })
    }
}

// ── LoginWithGoogle ──────────────────────────────────────────────────────────

pub struct LoginWithGoogleUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> LoginWithGoogleUseCase<R, P> {
    /// First federated sign-in creates the local row. The provider account
    /// already exists at that point, so there is no second write to undo.
    pub async fn execute(&self, id_token: &str) -> Result<AuthOutcome, ApiError> {
        let (session, account) = self.provider.sign_in_with_google(id_token).await?;
        let user = match self.repo.find_by_auth_id(&account.subject).await? {
            Some(user) => user,
            None => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    auth_id: account.subject,
                    email: account.email,
                    role: UserRole::Standard,
                    is_verified: account.email_verified,
                    created_at: now,
                    updated_at: now,
                };
                self.repo.create(&user).await?;
                user
            }
        };
        Ok(AuthOutcome {
            user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        })
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterUseCase<R: UserRepository, P: IdentityProvider, E: EmailSender> {
    pub repo: R,
    pub provider: P,
    pub mailer: E,
}

impl<R, P, E> RegisterUseCase<R, P, E>
where
    R: UserRepository + Clone,
    P: IdentityProvider + Clone,
    E: EmailSender,
{
    pub async fn execute(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let create = super::user::CreateUserUseCase {
            repo: self.repo.clone(),
            provider: self.provider.clone(),
        };
        create
            .execute(super::user::CreateUserInput {
                email: email.to_owned(),
                password: Some(password.to_owned()),
                role: UserRole::Standard,
                auth_id: None,
            })
            .await?;

        send_verification_email(&self.provider, &self.mailer, email).await;

        LoginUseCase {
            repo: self.repo.clone(),
            provider: self.provider.clone(),
        }
        .execute(email, password)
        .await
    }
}

/// Best-effort verification mail; the account is already durable, so a
/// failure here is logged and swallowed.
pub async fn send_verification_email<P: IdentityProvider, E: EmailSender>(
    provider: &P,
    mailer: &E,
    email: &str,
) {
    match provider.email_verification_link(email).await {
        Ok(link) => {
            if let Err(err) = mailer
                .send(email, "Verify your email address", &verification_body(&link))
                .await
            {
                tracing::warn!(error = %err, email, "verification email not sent");
            }
        }
        Err(err) => tracing::warn!(error = %err, email, "verification link not issued"),
    }
}

fn verification_body(link: &str) -> String {
    format!(
        "<p>Welcome to Farmbase. Please confirm your email address by \
         following <a href=\"{link}\">this link</a>.</p>"
    )
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<P: IdentityProvider> {
    pub provider: P,
}

impl<P: IdentityProvider> RefreshTokenUseCase<P> {
    pub async fn execute(&self, refresh_token: &str) -> Result<String, ApiError> {
        self.provider.refresh_session(refresh_token).await
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> LogoutUseCase<R, P> {
    /// Invalidate every refresh token the user holds.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("userId {user_id} not found.")))?;
        self.provider.revoke_refresh_tokens(&user.auth_id).await
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordUseCase<P: IdentityProvider, E: EmailSender> {
    pub provider: P,
    pub mailer: E,
}

impl<P: IdentityProvider, E: EmailSender> ResetPasswordUseCase<P, E> {
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let link = self.provider.password_reset_link(email).await?;
        self.mailer
            .send(email, "Reset your password", &reset_body(&link))
            .await
    }
}

fn reset_body(link: &str) -> String {
    format!(
        "<p>A password reset was requested for this address. Follow \
         <a href=\"{link}\">this link</a> to choose a new password. If you \
         did not request it, you can ignore this message.</p>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::domain::types::{ProviderAccount, ProviderSession, UpdateUserData};

    #[derive(Default, Clone)]
    struct MockUserRepo {
        users: Arc<Mutex<Vec<User>>>,
    }

    impl UserRepository for MockUserRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }
        async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<User>, ApiError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.auth_id == auth_id)
                .cloned())
        }
        async fn find_all(&self) -> Result<Vec<User>, ApiError> {
            Ok(self.users.lock().unwrap().clone())
        }
        async fn create(&self, user: &User) -> Result<(), ApiError> {
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }
        async fn update(
            &self,
            _id: Uuid,
            _data: &UpdateUserData,
        ) -> Result<Option<User>, ApiError> {
            unimplemented!()
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, ApiError> {
            unimplemented!()
        }
    }

    /// Provider mock keyed by access token. Unknown tokens verify as errors.
    #[derive(Default, Clone)]
    struct MockProvider {
        tokens: Arc<Mutex<HashMap<String, String>>>,
        revoked: Arc<Mutex<Vec<String>>>,
    }

    impl MockProvider {
        fn with_token(token: &str, subject: &str) -> Self {
            let provider = Self::default();
            provider
                .tokens
                .lock()
                .unwrap()
                .insert(token.into(), subject.into());
            provider
        }
    }

    impl IdentityProvider for MockProvider {
        async fn create_account(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<ProviderAccount, ApiError> {
            unimplemented!()
        }
        async fn get_account(&self, _subject: &str) -> Result<ProviderAccount, ApiError> {
            unimplemented!()
        }
        async fn get_account_by_email(&self, _email: &str) -> Result<ProviderAccount, ApiError> {
            unimplemented!()
        }
        async fn update_email(&self, _subject: &str, _email: &str) -> Result<(), ApiError> {
            unimplemented!()
        }
        async fn delete_account(&self, _subject: &str) -> Result<(), ApiError> {
            unimplemented!()
        }
        async fn verify_token(&self, access_token: &str) -> Result<ProviderAccount, ApiError> {
            self.tokens
                .lock()
                .unwrap()
                .get(access_token)
                .map(|subject| ProviderAccount {
                    subject: subject.clone(),
                    email: format!("{subject}@example.com"),
                    email_verified: true,
                })
                .ok_or_else(|| ApiError::Provider(anyhow::anyhow!("INVALID_ID_TOKEN")))
        }
        async fn sign_in_with_password(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<ProviderSession, ApiError> {
            unimplemented!()
        }
        async fn sign_in_with_google(
            &self,
            id_token: &str,
        ) -> Result<(ProviderSession, ProviderAccount), ApiError> {
            let subject = format!("google-{id_token}");
            Ok((
                ProviderSession {
                    subject: subject.clone(),
                    access_token: "access".into(),
                    refresh_token: "refresh".into(),
                },
                ProviderAccount {
                    subject,
                    email: "fed@example.com".into(),
                    email_verified: true,
                },
            ))
        }
        async fn refresh_session(&self, _refresh_token: &str) -> Result<String, ApiError> {
            unimplemented!()
        }
        async fn revoke_refresh_tokens(&self, subject: &str) -> Result<(), ApiError> {
            self.revoked.lock().unwrap().push(subject.into());
            Ok(())
        }
        async fn email_verification_link(&self, _email: &str) -> Result<String, ApiError> {
            unimplemented!()
        }
        async fn password_reset_link(&self, _email: &str) -> Result<String, ApiError> {
            unimplemented!()
        }
    }

    fn seeded_user(repo: &MockUserRepo, auth_id: &str, role: UserRole) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            auth_id: auth_id.into(),
            email: format!("{auth_id}@example.com"),
            role,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        repo.users.lock().unwrap().push(user.clone());
        user
    }

    #[tokio::test]
    async fn should_deny_everything_for_malformed_token() {
        let repo = MockUserRepo::default();
        let seeded = seeded_user(&repo, "sub-1", UserRole::Administrator);
        let authorize = AuthorizeUseCase {
            repo: repo.clone(),
            provider: MockProvider::default(),
        };
        let token = Some("not-a-real-token");
        assert!(!authorize.by_role(token, &[UserRole::Administrator]).await);
        assert!(!authorize.by_user_id(token, seeded.id).await);
        assert!(!authorize.by_email(token, &seeded.email).await);
    }

    #[tokio::test]
    async fn should_deny_everything_without_token() {
        let repo = MockUserRepo::default();
        let seeded = seeded_user(&repo, "sub-1", UserRole::Administrator);
        let authorize = AuthorizeUseCase {
            repo: repo.clone(),
            provider: MockProvider::with_token("tok", "sub-1"),
        };
        assert!(!authorize.by_role(None, &[UserRole::Administrator]).await);
        assert!(!authorize.by_user_id(None, seeded.id).await);
        assert!(!authorize.by_email(None, &seeded.email).await);
    }

    #[tokio::test]
    async fn should_match_role_id_and_email_for_valid_token() {
        let repo = MockUserRepo::default();
        let seeded = seeded_user(&repo, "sub-2", UserRole::Standard);
        let authorize = AuthorizeUseCase {
            repo: repo.clone(),
            provider: MockProvider::with_token("tok-2", "sub-2"),
        };
        let token = Some("tok-2");
        assert!(authorize.by_role(token, &[UserRole::Standard]).await);
        assert!(!authorize.by_role(token, &[UserRole::Administrator]).await);
        assert!(
            authorize
                .by_role(token, &[UserRole::Administrator, UserRole::Standard])
                .await
        );
        assert!(authorize.by_user_id(token, seeded.id).await);
        assert!(!authorize.by_user_id(token, Uuid::new_v4()).await);
        assert!(authorize.by_email(token, &seeded.email).await);
        assert!(!authorize.by_email(token, "someone@else.example").await);
    }

    #[tokio::test]
    async fn should_create_local_row_on_first_google_login() {
        let repo = MockUserRepo::default();
        let usecase = LoginWithGoogleUseCase {
            repo: repo.clone(),
            provider: MockProvider::default(),
        };
        let outcome = usecase.execute("gid-1").await.unwrap();
        assert_eq!(outcome.user.role, UserRole::Standard);
        assert!(outcome.user.is_verified);
        assert_eq!(repo.users.lock().unwrap().len(), 1);

        // Second sign-in reuses the row.
        let again = usecase.execute("gid-1").await.unwrap();
        assert_eq!(again.user.id, outcome.user.id);
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_revoke_refresh_tokens_on_logout() {
        let repo = MockUserRepo::default();
        let seeded = seeded_user(&repo, "sub-3", UserRole::Standard);
        let provider = MockProvider::default();
        let usecase = LogoutUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        usecase.execute(seeded.id).await.unwrap();
        assert_eq!(provider.revoked.lock().unwrap().clone(), ["sub-3"]);
    }
}
