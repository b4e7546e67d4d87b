use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::guard::{self, AuthHeader};
use crate::graphql::types::{CreateFarmInput, FarmDto, UpdateFarmInput};
use crate::state::AppState;
use crate::usecase::farm::{
    CreateFarmUseCase, DeleteFarmUseCase, GetAllFarmsUseCase, GetFarmUseCase,
    GetFarmsByUserUseCase, UpdateFarmUseCase,
};

#[derive(Default)]
pub struct FarmQuery;

#[Object]
impl FarmQuery {
    async fn farm_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<FarmDto> {
        let state = ctx.data::<AppState>()?;
        let farm = GetFarmUseCase {
            repo: state.farm_repo(),
        }
        .execute(id)
        .await?;
        Ok(farm.into())
    }

    async fn farms_by_user_id(&self, ctx: &Context<'_>, user_id: Uuid) -> Result<Vec<FarmDto>> {
        let state = ctx.data::<AppState>()?;
        let farms = GetFarmsByUserUseCase {
            repo: state.farm_repo(),
        }
        .execute(user_id)
        .await?;
        Ok(farms.into_iter().map(Into::into).collect())
    }

    async fn farms(&self, ctx: &Context<'_>) -> Result<Vec<FarmDto>> {
        let state = ctx.data::<AppState>()?;
        let farms = GetAllFarmsUseCase {
            repo: state.farm_repo(),
        }
        .execute()
        .await?;
        Ok(farms.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct FarmMutation;

#[Object]
impl FarmMutation {
    /// Any authenticated caller; ownership comes from the verified token,
    /// not from the input.
    async fn create_farm(&self, ctx: &Context<'_>, input: CreateFarmInput) -> Result<FarmDto> {
        let state = ctx.data::<AppState>()?;
        let caller = guard::require_caller(state, ctx.data::<AuthHeader>()?).await?;
        let farm = CreateFarmUseCase {
            repo: state.farm_repo(),
        }
        .execute(caller.id, input.into_data()?)
        .await?;
        Ok(farm.into())
    }

    async fn update_farm(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateFarmInput,
    ) -> Result<FarmDto> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin(state, ctx.data::<AuthHeader>()?).await?;
        let farm = UpdateFarmUseCase {
            repo: state.farm_repo(),
        }
        .execute(id, input.into_data()?)
        .await?;
        Ok(farm.into())
    }

    async fn delete_farm_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        guard::require_admin(state, ctx.data::<AuthHeader>()?).await?;
        DeleteFarmUseCase {
            repo: state.farm_repo(),
        }
        .execute(id)
        .await?;
        Ok(true)
    }
}
