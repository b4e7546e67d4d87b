//! Resolver-side gating. The raw `Authorization` header rides into the
//! GraphQL context; each gated resolver runs the matching predicate and maps
//! a refusal to the unauthenticated error kind.

use farmbase_domain::user::UserRole;
use uuid::Uuid;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::infra::db::DbUserRepository;
use crate::infra::identity::HttpIdentityProvider;
use crate::state::AppState;
use crate::usecase::auth::AuthorizeUseCase;

/// The request's `Authorization` header, if any. Stored raw; parsing never
/// fails, it just yields no token.
#[derive(Clone, Default)]
pub struct AuthHeader(pub Option<String>);

impl AuthHeader {
    /// Extract the bearer token. Scheme is matched case-insensitively;
    /// anything malformed comes out as `None`.
    pub fn bearer_token(&self) -> Option<&str> {
        let header = self.0.as_deref()?;
        let mut parts = header.split_whitespace();
        let scheme = parts.next()?;
        let token = parts.next()?;
        scheme.eq_ignore_ascii_case("bearer").then_some(token)
    }
}

fn authorize(state: &AppState) -> AuthorizeUseCase<DbUserRepository, HttpIdentityProvider> {
    AuthorizeUseCase {
        repo: state.user_repo(),
        provider: state.identity(),
    }
}

pub async fn require_admin(state: &AppState, auth: &AuthHeader) -> Result<(), ApiError> {
    let ok = authorize(state)
        .by_role(auth.bearer_token(), &[UserRole::Administrator])
        .await;
    ok.then_some(()).ok_or(ApiError::Unauthorized)
}

/// Administrator, or the caller is the target user.
pub async fn require_admin_or_user(
    state: &AppState,
    auth: &AuthHeader,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let gate = authorize(state);
    let token = auth.bearer_token();
    if gate.by_role(token, &[UserRole::Administrator]).await
        || gate.by_user_id(token, user_id).await
    {
        return Ok(());
    }
    Err(ApiError::Unauthorized)
}

/// Administrator, or the caller's own email matches the target.
pub async fn require_admin_or_email(
    state: &AppState,
    auth: &AuthHeader,
    email: &str,
) -> Result<(), ApiError> {
    let gate = authorize(state);
    let token = auth.bearer_token();
    if gate.by_role(token, &[UserRole::Administrator]).await
        || gate.by_email(token, email).await
    {
        return Ok(());
    }
    Err(ApiError::Unauthorized)
}

/// Any authenticated caller; returns the resolved row so the resolver can
/// derive ownership from the token rather than trusting the input.
pub async fn require_caller(state: &AppState, auth: &AuthHeader) -> Result<User, ApiError> {
    authorize(state)
        .caller(auth.bearer_token())
        .await
        .ok_or(ApiError::Unauthorized)
}
