use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use farmbase_domain::user::UserRole;

use crate::graphql::types::{AuthDto, RegisterInput, RoleDto};
use crate::infra::db::DbUserRepository;
use crate::infra::identity::HttpIdentityProvider;
use crate::state::AppState;
use crate::usecase::auth::{
    AuthorizeUseCase, LoginUseCase, LoginWithGoogleUseCase, LogoutUseCase, RefreshTokenUseCase,
    RegisterUseCase, ResetPasswordUseCase,
};

fn authorize(state: &AppState) -> AuthorizeUseCase<DbUserRepository, HttpIdentityProvider> {
    AuthorizeUseCase {
        repo: state.user_repo(),
        provider: state.identity(),
    }
}

#[derive(Default)]
pub struct AuthQuery;

/// Authorization predicates are public and infallible by contract: any
/// failure along the way is reported as `false`.
#[Object]
impl AuthQuery {
    async fn is_authorized_by_role(
        &self,
        ctx: &Context<'_>,
        access_token: Option<String>,
        roles: Vec<RoleDto>,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let roles: Vec<UserRole> = roles.into_iter().map(Into::into).collect();
        Ok(authorize(state)
            .by_role(access_token.as_deref(), &roles)
            .await)
    }

    async fn is_authorized_by_user_id(
        &self,
        ctx: &Context<'_>,
        access_token: Option<String>,
        user_id: Uuid,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        Ok(authorize(state)
            .by_user_id(access_token.as_deref(), user_id)
            .await)
    }

    async fn is_authorized_by_email(
        &self,
        ctx: &Context<'_>,
        access_token: Option<String>,
        email: String,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        Ok(authorize(state)
            .by_email(access_token.as_deref(), &email)
            .await)
    }
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthDto> {
        let state = ctx.data::<AppState>()?;
        let outcome = LoginUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(&email, &password)
        .await?;
        Ok(outcome.into())
    }

    async fn login_with_google(&self, ctx: &Context<'_>, id_token: String) -> Result<AuthDto> {
        let state = ctx.data::<AppState>()?;
        let outcome = LoginWithGoogleUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(&id_token)
        .await?;
        Ok(outcome.into())
    }

    async fn register(&self, ctx: &Context<'_>, user: RegisterInput) -> Result<AuthDto> {
        let state = ctx.data::<AppState>()?;
        let outcome = RegisterUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
            mailer: state.mailer(),
        }
        .execute(&user.email, &user.password)
        .await?;
        Ok(outcome.into())
    }

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, ctx: &Context<'_>, refresh_token: String) -> Result<String> {
        let state = ctx.data::<AppState>()?;
        Ok(RefreshTokenUseCase {
            provider: state.identity(),
        }
        .execute(&refresh_token)
        .await?)
    }

    async fn logout(&self, ctx: &Context<'_>, user_id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        LogoutUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(user_id)
        .await?;
        Ok(true)
    }

    async fn reset_password(&self, ctx: &Context<'_>, email: String) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        ResetPasswordUseCase {
            provider: state.identity(),
            mailer: state.mailer(),
        }
        .execute(&email)
        .await?;
        Ok(true)
    }
}
