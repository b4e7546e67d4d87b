use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::guard::{self, AuthHeader};
use crate::graphql::types::{CreateUserInput, UpdateUserInput, UserDto};
use crate::state::AppState;
use crate::usecase::auth::send_verification_email;
use crate::usecase::user::{
    CreateUserUseCase, DeleteUserByEmailUseCase, DeleteUserByIdUseCase, GetAllUsersUseCase,
    GetUserByEmailUseCase, GetUserByIdUseCase, UpdateUserUseCase,
};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Administrator, or the user asking about themselves.
    async fn user_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<UserDto> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin_or_user(state, ctx.data::<AuthHeader>()?, id).await?;
        let user = GetUserByIdUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(id)
        .await?;
        Ok(user.into())
    }

    /// Administrator, or the caller's own email.
    async fn user_by_email(&self, ctx: &Context<'_>, email: String) -> Result<UserDto> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin_or_email(state, ctx.data::<AuthHeader>()?, &email).await?;
        let user = GetUserByEmailUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(&email)
        .await?;
        Ok(user.into())
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserDto>> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin(state, ctx.data::<AuthHeader>()?).await?;
        let users = GetAllUsersUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute()
        .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, user: CreateUserInput) -> Result<UserDto> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin(state, ctx.data::<AuthHeader>()?).await?;
        let created = CreateUserUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(user.into())
        .await?;
        send_verification_email(&state.identity(), &state.mailer(), &created.email).await;
        Ok(created.into())
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        user: UpdateUserInput,
    ) -> Result<UserDto> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin_or_user(state, ctx.data::<AuthHeader>()?, id).await?;
        let updated = UpdateUserUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(id, user.into())
        .await?;
        Ok(updated.into())
    }

    async fn delete_user_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin(state, ctx.data::<AuthHeader>()?).await?;
        DeleteUserByIdUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(id)
        .await?;
        Ok(true)
    }

    async fn delete_user_by_email(&self, ctx: &Context<'_>, email: String) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin_or_email(state, ctx.data::<AuthHeader>()?, &email).await?;
        DeleteUserByEmailUseCase {
            repo: state.user_repo(),
            provider: state.identity(),
        }
        .execute(&email)
        .await?;
        Ok(true)
    }
}
