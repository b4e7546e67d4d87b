use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::graphql::types::{SampleDto, SampleInput};
use crate::state::AppState;
use crate::usecase::sample::{
    CreateSampleUseCase, DeleteSampleUseCase, GetAllSamplesUseCase, GetSampleUseCase,
    UpdateSampleUseCase,
};

#[derive(Default)]
pub struct SampleQuery;

#[Object]
impl SampleQuery {
    async fn sample_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<SampleDto> {
        let state = ctx.data::<AppState>()?;
        let sample = GetSampleUseCase {
            repo: state.sample_repo(),
        }
        .execute(id)
        .await?;
        Ok(sample.into())
    }

    async fn samples(&self, ctx: &Context<'_>) -> Result<Vec<SampleDto>> {
        let state = ctx.data::<AppState>()?;
        let samples = GetAllSamplesUseCase {
            repo: state.sample_repo(),
        }
        .execute()
        .await?;
        Ok(samples.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct SampleMutation;

#[Object]
impl SampleMutation {
    async fn create_sample(&self, ctx: &Context<'_>, sample: SampleInput) -> Result<SampleDto> {
        let state = ctx.data::<AppState>()?;
        let created = CreateSampleUseCase {
            repo: state.sample_repo(),
        }
        .execute(sample.into())
        .await?;
        Ok(created.into())
    }

    async fn update_sample(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        sample: SampleInput,
    ) -> Result<SampleDto> {
        let state = ctx.data::<AppState>()?;
        let updated = UpdateSampleUseCase {
            repo: state.sample_repo(),
        }
        .execute(id, sample.into())
        .await?;
        Ok(updated.into())
    }

    async fn delete_sample_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<SampleDto> {
        let state = ctx.data::<AppState>()?;
        let deleted = DeleteSampleUseCase {
            repo: state.sample_repo(),
        }
        .execute(id)
        .await?;
        Ok(deleted.into())
    }
}
