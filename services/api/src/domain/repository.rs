#![allow(async_fn_in_trait)]

use std::future::Future;

use uuid::Uuid;

use crate::domain::types::{
    Farm, ProviderAccount, ProviderSession, Sample, UpdateUserData, User,
};
use crate::error::ApiError;

/// Repository for sample records.
pub trait SampleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sample>, ApiError>;
    async fn find_all(&self) -> Result<Vec<Sample>, ApiError>;
    async fn create(&self, sample: &Sample) -> Result<(), ApiError>;
    /// Full-row update. Returns `false` if no row matched.
    async fn update(&self, sample: &Sample) -> Result<bool, ApiError>;
    /// Delete a sample. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for user rows.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<User>, ApiError>;
    async fn find_all(&self) -> Result<Vec<User>, ApiError>;
    /// Insert a fully-built row (also used to restore a row after a failed
    /// provider deletion, so it must preserve id and timestamps exactly).
    async fn create(&self, user: &User) -> Result<(), ApiError>;
    /// Returns the updated row, or `None` if no row matched.
    async fn update(&self, id: Uuid, data: &UpdateUserData) -> Result<Option<User>, ApiError>;
    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for farm rows.
pub trait FarmRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Farm>, ApiError>;
    async fn find_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Farm>, ApiError>;
    async fn find_all(&self) -> Result<Vec<Farm>, ApiError>;
    /// Insert a new farm. A duplicate USDA farm id surfaces as
    /// `ApiError::Conflict` with a user-facing message.
    async fn create(&self, owner_user_id: Uuid, farm: &Farm) -> Result<(), ApiError>;
    /// Full-row update. Returns `false` if no row matched.
    async fn update(&self, farm: &Farm) -> Result<bool, ApiError>;
    /// Delete a farm. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Port for the external identity provider (account lifecycle + tokens).
///
/// The relational user row is a projection of what this provider reports;
/// every method maps to one provider REST call.
pub trait IdentityProvider: Send + Sync {
    async fn create_account(&self, email: &str, password: &str)
    -> Result<ProviderAccount, ApiError>;
    async fn get_account(&self, subject: &str) -> Result<ProviderAccount, ApiError>;
    async fn get_account_by_email(&self, email: &str) -> Result<ProviderAccount, ApiError>;
    async fn update_email(&self, subject: &str, email: &str) -> Result<(), ApiError>;
    async fn delete_account(&self, subject: &str) -> Result<(), ApiError>;
    /// Verify an access token and return the account it belongs to.
    async fn verify_token(&self, access_token: &str) -> Result<ProviderAccount, ApiError>;
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ApiError>;
    /// Exchange a Google id token for a provider session.
    async fn sign_in_with_google(
        &self,
        id_token: &str,
    ) -> Result<(ProviderSession, ProviderAccount), ApiError>;
    /// Exchange a refresh token for a new access token.
    async fn refresh_session(&self, refresh_token: &str) -> Result<String, ApiError>;
    async fn revoke_refresh_tokens(&self, subject: &str) -> Result<(), ApiError>;
    async fn email_verification_link(&self, email: &str) -> Result<String, ApiError>;
    async fn password_reset_link(&self, email: &str) -> Result<String, ApiError>;
}

/// Port for outbound email delivery.
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ApiError>;
}

/// Two-system write helper: await `step`, and if it fails run `undo` to roll
/// back the side effect an earlier step already committed. The undo is
/// best-effort and single-attempt: an undo failure is logged at error
/// severity together with the identifier left dangling, and the original
/// error is returned either way. There is no retry and no later
/// reconciliation.
pub async fn compensate_on_failure<T>(
    step: impl Future<Output = Result<T, ApiError>>,
    undo: impl Future<Output = Result<(), ApiError>>,
    undo_failure: &str,
    dangling_id: &str,
) -> Result<T, ApiError> {
    match step.await {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Err(undo_err) = undo.await {
                tracing::error!(error = %undo_err, id = %dangling_id, "{}", undo_failure);
            }
            Err(err)
        }
    }
}
