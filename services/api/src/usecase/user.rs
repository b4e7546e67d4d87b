//! User usecases. Every write here touches two systems (the relational row
//! and the identity provider), so each mutation orders its steps so the
//! second failure can be compensated by undoing the first.

use chrono::Utc;
use uuid::Uuid;

use farmbase_domain::user::UserRole;

use crate::domain::repository::{IdentityProvider, UserRepository, compensate_on_failure};
use crate::domain::types::{UpdateUserData, User};
use crate::error::ApiError;

fn user_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("userId {id} not found."))
}

fn user_not_found_by_auth_id(auth_id: &str) -> ApiError {
    ApiError::NotFound(format!("user with authId {auth_id} not found."))
}

/// Overlay the provider's view of the account on a local row. The provider
/// owns email and verification state; the row only caches them.
fn with_provider_account(mut user: User, email: String, email_verified: bool) -> User {
    user.email = email;
    user.is_verified = email_verified;
    user
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    /// Required unless `auth_id` is given.
    pub password: Option<String>,
    pub role: UserRole,
    /// Present when the provider account already exists (federated sign-in).
    pub auth_id: Option<String>,
}

pub struct CreateUserUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> CreateUserUseCase<R, P> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, ApiError> {
        match input.auth_id {
            // The provider account already exists, so the only write is the
            // local row and there is nothing to compensate.
            Some(auth_id) => {
                let account = self.provider.get_account(&auth_id).await?;
                let user = build_user(auth_id, input.email, input.role, account.email_verified);
                self.repo.create(&user).await?;
                Ok(user)
            }
            None => {
                let Some(password) = input.password.as_deref() else {
                    return Err(ApiError::BadUserInput(
                        "Password is required for password signup".into(),
                    ));
                };
                let account = self.provider.create_account(&input.email, password).await?;
                let user = build_user(
                    account.subject.clone(),
                    input.email,
                    input.role,
                    account.email_verified,
                );
                compensate_on_failure(
                    self.repo.create(&user),
                    self.provider.delete_account(&account.subject),
                    "failed to delete identity account after user insert failed; account is orphaned",
                    &account.subject,
                )
                .await?;
                Ok(user)
            }
        }
    }
}

fn build_user(auth_id: String, email: String, role: UserRole, is_verified: bool) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        auth_id,
        email,
        role,
        is_verified,
        created_at: now,
        updated_at: now,
    }
}

// ── GetUserById ──────────────────────────────────────────────────────────────

pub struct GetUserByIdUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> GetUserByIdUseCase<R, P> {
    pub async fn execute(&self, id: Uuid) -> Result<User, ApiError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        let account = self.provider.get_account(&user.auth_id).await?;
        Ok(with_provider_account(
            user,
            account.email,
            account.email_verified,
        ))
    }
}

// ── GetUserByEmail ───────────────────────────────────────────────────────────

pub struct GetUserByEmailUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> GetUserByEmailUseCase<R, P> {
    pub async fn execute(&self, email: &str) -> Result<User, ApiError> {
        let account = self.provider.get_account_by_email(email).await?;
        let user = self
            .repo
            .find_by_auth_id(&account.subject)
            .await?
            .ok_or_else(|| user_not_found_by_auth_id(&account.subject))?;
        Ok(with_provider_account(
            user,
            account.email,
            account.email_verified,
        ))
    }
}

// ── GetAllUsers ──────────────────────────────────────────────────────────────

pub struct GetAllUsersUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> GetAllUsersUseCase<R, P> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        let users = self.repo.find_all().await?;
        let accounts = futures::future::try_join_all(
            users
                .iter()
                .map(|user| self.provider.get_account(&user.auth_id)),
        )
        .await?;
        Ok(users
            .into_iter()
            .zip(accounts)
            .map(|(user, account)| {
                with_provider_account(user, account.email, account.email_verified)
            })
            .collect())
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> UpdateUserUseCase<R, P> {
    pub async fn execute(&self, id: Uuid, data: UpdateUserData) -> Result<User, ApiError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        // An unchanged email means the provider is already consistent.
        if data.email == current.email {
            return self
                .repo
                .update(id, &data)
                .await?
                .ok_or_else(|| user_not_found(id));
        }

        self.provider
            .update_email(&current.auth_id, &data.email)
            .await?;
        let updated = compensate_on_failure(
            self.repo.update(id, &data),
            self.provider.update_email(&current.auth_id, &current.email),
            "failed to revert identity email after user update failed; email is out of sync",
            &current.auth_id,
        )
        .await?;
        updated.ok_or_else(|| user_not_found(id))
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserByIdUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> DeleteUserByIdUseCase<R, P> {
    pub async fn execute(&self, id: Uuid) -> Result<User, ApiError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        delete_both(&self.repo, &self.provider, user).await
    }
}

pub struct DeleteUserByEmailUseCase<R: UserRepository, P: IdentityProvider> {
    pub repo: R,
    pub provider: P,
}

impl<R: UserRepository, P: IdentityProvider> DeleteUserByEmailUseCase<R, P> {
    pub async fn execute(&self, email: &str) -> Result<User, ApiError> {
        let account = self.provider.get_account_by_email(email).await?;
        let user = self
            .repo
            .find_by_auth_id(&account.subject)
            .await?
            .ok_or_else(|| user_not_found_by_auth_id(&account.subject))?;
        delete_both(&self.repo, &self.provider, user).await
    }
}

/// Delete the row, then the provider account. If the provider deletion
/// fails, re-insert the captured row unchanged so the two systems stay
/// consistent.
async fn delete_both<R: UserRepository, P: IdentityProvider>(
    repo: &R,
    provider: &P,
    user: User,
) -> Result<User, ApiError> {
    if !repo.delete(user.id).await? {
        return Err(user_not_found(user.id));
    }
    compensate_on_failure(
        provider.delete_account(&user.auth_id),
        repo.create(&user),
        "failed to restore user row after identity deletion failed; row is lost",
        &user.auth_id,
    )
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::domain::types::{ProviderAccount, ProviderSession};

    #[derive(Default, Clone)]
    struct MockUserRepo {
        users: Arc<Mutex<Vec<User>>>,
        fail_create: Arc<AtomicBool>,
        fail_update: Arc<AtomicBool>,
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
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(ApiError::Conflict(
                    "A user with that email already exists.".into(),
                ));
            }
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }
        async fn update(&self, id: Uuid, data: &UpdateUserData) -> Result<Option<User>, ApiError> {
            if self.fail_update.load(Ordering::SeqCst) {
                return Err(ApiError::Internal(anyhow::anyhow!("connection reset")));
            }
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|u| u.id == id) {
                Some(user) => {
                    user.email = data.email.clone();
                    user.role = data.role;
                    user.updated_at = Utc::now();
                    Ok(Some(user.clone()))
                }
                None => Ok(None),
            }
        }
        async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != id);
            Ok(users.len() < before)
        }
    }

    #[derive(Default, Clone)]
    struct MockProvider {
        accounts: Arc<Mutex<Vec<ProviderAccount>>>,
        created: Arc<Mutex<Vec<String>>>,
        deleted: Arc<Mutex<Vec<String>>>,
        email_updates: Arc<Mutex<Vec<(String, String)>>>,
        fail_delete: Arc<AtomicBool>,
    }

    impl MockProvider {
        fn with_account(subject: &str, email: &str, email_verified: bool) -> Self {
            let provider = Self::default();
            provider.accounts.lock().unwrap().push(ProviderAccount {
                subject: subject.into(),
                email: email.into(),
                email_verified,
            });
            provider
        }
    }

    impl IdentityProvider for MockProvider {
        async fn create_account(
            &self,
            email: &str,
            _password: &str,
        ) -> Result<ProviderAccount, ApiError> {
            let account = ProviderAccount {
                subject: format!("sub-{}", self.created.lock().unwrap().len()),
                email: email.into(),
                email_verified: false,
            };
            self.created.lock().unwrap().push(account.subject.clone());
            self.accounts.lock().unwrap().push(account.clone());
            Ok(account)
        }
        async fn get_account(&self, subject: &str) -> Result<ProviderAccount, ApiError> {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.subject == subject)
                .cloned()
                .ok_or_else(|| {
                    ApiError::NotFound(format!(
                        "account with authId {subject} not found in identity provider."
                    ))
                })
        }
        async fn get_account_by_email(&self, email: &str) -> Result<ProviderAccount, ApiError> {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.email == email)
                .cloned()
                .ok_or_else(|| {
                    ApiError::NotFound(format!(
                        "account with email {email} not found in identity provider."
                    ))
                })
        }
        async fn update_email(&self, subject: &str, email: &str) -> Result<(), ApiError> {
            self.email_updates
                .lock()
                .unwrap()
                .push((subject.into(), email.into()));
            let mut accounts = self.accounts.lock().unwrap();
            if let Some(account) = accounts.iter_mut().find(|a| a.subject == subject) {
                account.email = email.into();
            }
            Ok(())
        }
        async fn delete_account(&self, subject: &str) -> Result<(), ApiError> {
            self.deleted.lock().unwrap().push(subject.into());
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(ApiError::Provider(anyhow::anyhow!(
                    "identity provider returned 503"
                )));
            }
            self.accounts.lock().unwrap().retain(|a| a.subject != subject);
            Ok(())
        }
        async fn verify_token(&self, _access_token: &str) -> Result<ProviderAccount, ApiError> {
            unimplemented!()
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
            _id_token: &str,
        ) -> Result<(ProviderSession, ProviderAccount), ApiError> {
            unimplemented!()
        }
        async fn refresh_session(&self, _refresh_token: &str) -> Result<String, ApiError> {
            unimplemented!()
        }
        async fn revoke_refresh_tokens(&self, _subject: &str) -> Result<(), ApiError> {
            unimplemented!()
        }
        async fn email_verification_link(&self, _email: &str) -> Result<String, ApiError> {
            unimplemented!()
        }
        async fn password_reset_link(&self, _email: &str) -> Result<String, ApiError> {
            unimplemented!()
        }
    }

    fn seeded_user(repo: &MockUserRepo, auth_id: &str, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            auth_id: auth_id.into(),
            email: email.into(),
            role: UserRole::Standard,
            is_verified: true,
            created_at: now,
            updated_at: now,
        };
        repo.users.lock().unwrap().push(user.clone());
        user
    }

    #[tokio::test]
    async fn should_require_password_for_password_signup() {
        let usecase = CreateUserUseCase {
            repo: MockUserRepo::default(),
            provider: MockProvider::default(),
        };
        let err = usecase
            .execute(CreateUserInput {
                email: "new@example.com".into(),
                password: None,
                role: UserRole::Standard,
                auth_id: None,
            })
            .await
            .unwrap_err();
        match err {
            ApiError::BadUserInput(message) => {
                assert_eq!(message, "Password is required for password signup")
            }
            other => panic!("expected BadUserInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_delete_provider_account_when_insert_fails() {
        let repo = MockUserRepo::default();
        repo.fail_create.store(true, Ordering::SeqCst);
        let provider = MockProvider::default();
        let usecase = CreateUserUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        let err = usecase
            .execute(CreateUserInput {
                email: "dup@example.com".into(),
                password: Some("hunter22".into()),
                role: UserRole::Standard,
                auth_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        // The rollback removed the account the first step created.
        assert_eq!(provider.deleted.lock().unwrap().clone(), ["sub-0"]);
        assert!(provider.accounts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reuse_existing_account_when_auth_id_given() {
        let repo = MockUserRepo::default();
        let provider = MockProvider::with_account("google-1", "fed@example.com", true);
        let usecase = CreateUserUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        let user = usecase
            .execute(CreateUserInput {
                email: "fed@example.com".into(),
                password: None,
                role: UserRole::Standard,
                auth_id: Some("google-1".into()),
            })
            .await
            .unwrap();
        assert_eq!(user.auth_id, "google-1");
        assert!(user.is_verified);
        assert!(provider.created.lock().unwrap().is_empty());
        assert!(provider.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_restore_row_when_provider_deletion_fails() {
        let repo = MockUserRepo::default();
        let provider = MockProvider::with_account("sub-9", "keep@example.com", true);
        provider.fail_delete.store(true, Ordering::SeqCst);
        let seeded = seeded_user(&repo, "sub-9", "keep@example.com");
        let usecase = DeleteUserByIdUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        let err = usecase.execute(seeded.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Provider(_)));
        // The captured row went back in unchanged, timestamps included.
        assert_eq!(repo.users.lock().unwrap().clone(), [seeded]);
    }

    #[tokio::test]
    async fn should_skip_provider_call_when_email_unchanged() {
        let repo = MockUserRepo::default();
        let provider = MockProvider::with_account("sub-3", "same@example.com", true);
        let seeded = seeded_user(&repo, "sub-3", "same@example.com");
        let usecase = UpdateUserUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        let updated = usecase
            .execute(
                seeded.id,
                UpdateUserData {
                    email: "same@example.com".into(),
                    role: UserRole::Administrator,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Administrator);
        assert!(provider.email_updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_revert_provider_email_when_row_update_fails() {
        let repo = MockUserRepo::default();
        repo.fail_update.store(true, Ordering::SeqCst);
        let provider = MockProvider::with_account("sub-5", "old@example.com", true);
        let seeded = seeded_user(&repo, "sub-5", "old@example.com");
        let usecase = UpdateUserUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        let err = usecase
            .execute(
                seeded.id,
                UpdateUserData {
                    email: "new@example.com".into(),
                    role: UserRole::Standard,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        let updates = provider.email_updates.lock().unwrap().clone();
        assert_eq!(
            updates,
            [
                ("sub-5".to_owned(), "new@example.com".to_owned()),
                ("sub-5".to_owned(), "old@example.com".to_owned()),
            ]
        );
        assert_eq!(
            provider.accounts.lock().unwrap()[0].email,
            "old@example.com"
        );
    }

    #[tokio::test]
    async fn should_reference_requested_key_when_user_missing() {
        let id = Uuid::new_v4();
        let usecase = GetUserByIdUseCase {
            repo: MockUserRepo::default(),
            provider: MockProvider::default(),
        };
        let err = usecase.execute(id).await.unwrap_err();
        match err {
            ApiError::NotFound(message) => {
                assert_eq!(message, format!("userId {id} not found."))
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_overlay_provider_email_on_reads() {
        let repo = MockUserRepo::default();
        let provider = MockProvider::with_account("sub-7", "fresh@example.com", true);
        let seeded = seeded_user(&repo, "sub-7", "stale@example.com");
        let usecase = GetUserByIdUseCase {
            repo: repo.clone(),
            provider: provider.clone(),
        };
        let user = usecase.execute(seeded.id).await.unwrap();
        assert_eq!(user.email, "fresh@example.com");
        assert!(user.is_verified);
    }
}
