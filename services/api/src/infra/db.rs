use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    SqlErr,
};
use uuid::Uuid;

use farmbase_api_schema::{farms, samples, users};
use farmbase_domain::farm::{FarmStatus, GeoPoint};
use farmbase_domain::user::UserRole;

use crate::domain::repository::{FarmRepository, SampleRepository, UserRepository};
use crate::domain::types::{Farm, Sample, UpdateUserData, User};
use crate::error::ApiError;

// ── Sample repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSampleRepository {
    pub db: DatabaseConnection,
}

impl SampleRepository for DbSampleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sample>, ApiError> {
        let model = samples::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find sample by id")?;
        Ok(model.map(sample_from_model))
    }

    async fn find_all(&self) -> Result<Vec<Sample>, ApiError> {
        let models = samples::Entity::find()
            .all(&self.db)
            .await
            .context("find all samples")?;
        Ok(models.into_iter().map(sample_from_model).collect())
    }

    async fn create(&self, sample: &Sample) -> Result<(), ApiError> {
        samples::ActiveModel {
            id: Set(sample.id),
            name: Set(sample.name.clone()),
            description: Set(sample.description.clone()),
            created_at: Set(sample.created_at),
            updated_at: Set(sample.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create sample")?;
        Ok(())
    }

    async fn update(&self, sample: &Sample) -> Result<bool, ApiError> {
        let result = samples::Entity::update_many()
            .filter(samples::Column::Id.eq(sample.id))
            .set(samples::ActiveModel {
                name: Set(sample.name.clone()),
                description: Set(sample.description.clone()),
                updated_at: Set(sample.updated_at),
                ..Default::default()
            })
            .exec(&self.db)
            .await
            .context("update sample")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = samples::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete sample")?;
        Ok(result.rows_affected > 0)
    }
}

fn sample_from_model(model: samples::Model) -> Sample {
    Sample {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_auth_id(&self, auth_id: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::AuthId.eq(auth_id))
            .one(&self.db)
            .await
            .context("find user by auth id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .all(&self.db)
            .await
            .context("find all users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let insert = users::ActiveModel {
            id: Set(user.id),
            auth_id: Set(user.auth_id.clone()),
            email: Set(user.email.clone()),
            role: Set(role_to_schema(user.role)),
            is_verified: Set(user.is_verified),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match insert {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::Conflict(
                    "A user with that email already exists.".into(),
                )),
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn update(&self, id: Uuid, data: &UpdateUserData) -> Result<Option<User>, ApiError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };
        let mut am: users::ActiveModel = model.into();
        am.email = Set(data.email.clone());
        am.role = Set(role_to_schema(data.role));
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.db).await.context("update user")?;
        Ok(Some(user_from_model(updated)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        auth_id: model.auth_id,
        email: model.email,
        role: role_from_schema(model.role),
        is_verified: model.is_verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn role_to_schema(role: UserRole) -> users::UserRole {
    match role {
        UserRole::Standard => users::UserRole::Standard,
        UserRole::Administrator => users::UserRole::Administrator,
    }
}

fn role_from_schema(role: users::UserRole) -> UserRole {
    match role {
        users::UserRole::Standard => UserRole::Standard,
        users::UserRole::Administrator => UserRole::Administrator,
    }
}

// ── Farm repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFarmRepository {
    pub db: DatabaseConnection,
}

impl FarmRepository for DbFarmRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Farm>, ApiError> {
        let model = farms::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find farm by id")?;
        model.map(farm_from_model).transpose()
    }

    async fn find_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Farm>, ApiError> {
        let models = farms::Entity::find()
            .filter(farms::Column::OwnerUserId.eq(owner_user_id))
            .all(&self.db)
            .await
            .context("find farms by owner")?;
        models.into_iter().map(farm_from_model).collect()
    }

    async fn find_all(&self) -> Result<Vec<Farm>, ApiError> {
        let models = farms::Entity::find()
            .all(&self.db)
            .await
            .context("find all farms")?;
        models.into_iter().map(farm_from_model).collect()
    }

    async fn create(&self, owner_user_id: Uuid, farm: &Farm) -> Result<(), ApiError> {
        let insert = farm_to_active_model(owner_user_id, farm)?
            .insert(&self.db)
            .await;
        match insert {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::Conflict(
                    "A farm with that USDA farm ID already exists.".into(),
                )),
                _ => Err(anyhow::Error::new(e).context("create farm").into()),
            },
        }
    }

    async fn update(&self, farm: &Farm) -> Result<bool, ApiError> {
        let mut am = farm_to_active_model(farm.owner_user_id, farm)?;
        am.id = sea_orm::ActiveValue::NotSet;
        am.created_at = sea_orm::ActiveValue::NotSet;
        let result = farms::Entity::update_many()
            .filter(farms::Column::Id.eq(farm.id))
            .set(am)
            .exec(&self.db)
            .await
            .context("update farm")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = farms::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete farm")?;
        Ok(result.rows_affected > 0)
    }
}

fn farm_to_active_model(owner_user_id: Uuid, farm: &Farm) -> Result<farms::ActiveModel, ApiError> {
    let market_sales_data = farm
        .market_sales_data
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .context("encode market sales data")?;
    Ok(farms::ActiveModel {
        id: Set(farm.id),
        owner_user_id: Set(owner_user_id),
        usda_farm_id: Set(farm.usda_farm_id),
        farm_name: Set(farm.farm_name.clone()),
        description: Set(farm.description.clone()),
        primary_phone: Set(farm.primary_phone.clone()),
        primary_email: Set(farm.primary_email.clone()),
        website: Set(farm.website.clone()),
        social_media: Set(farm.social_media.clone()),
        farm_address: Set(farm.farm_address.clone()),
        counties_served: Set(farm.counties_served.clone()),
        cities_served: Set(farm.cities_served.clone()),
        location_longitude: Set(farm.location.longitude),
        location_latitude: Set(farm.location.latitude),
        food_categories: Set(farm.food_categories.clone()),
        market_sales_data: Set(market_sales_data),
        bipoc_owned: Set(farm.bipoc_owned),
        gap_certified: Set(farm.gap_certified),
        food_safety_plan: Set(farm.food_safety_plan),
        agritourism: Set(farm.agritourism),
        sells_at_markets: Set(farm.sells_at_markets),
        csa_boxes: Set(farm.csa_boxes),
        online_sales: Set(farm.online_sales),
        delivery: Set(farm.delivery),
        f2s_experience: Set(farm.f2s_experience),
        interested_in_f2s: Set(farm.interested_in_f2s),
        status: Set(status_to_schema(farm.status)),
        created_at: Set(farm.created_at),
        updated_at: Set(farm.updated_at),
    })
}

fn farm_from_model(model: farms::Model) -> Result<Farm, ApiError> {
    let market_sales_data = model
        .market_sales_data
        .map(serde_json::from_value)
        .transpose()
        .context("decode market sales data")?;
    Ok(Farm {
        id: model.id,
        owner_user_id: model.owner_user_id,
        usda_farm_id: model.usda_farm_id,
        farm_name: model.farm_name,
        description: model.description,
        primary_phone: model.primary_phone,
        primary_email: model.primary_email,
        website: model.website,
        social_media: model.social_media,
        farm_address: model.farm_address,
        counties_served: model.counties_served,
        cities_served: model.cities_served,
        location: GeoPoint {
            longitude: model.location_longitude,
            latitude: model.location_latitude,
        },
        food_categories: model.food_categories,
        market_sales_data,
        bipoc_owned: model.bipoc_owned,
        gap_certified: model.gap_certified,
        food_safety_plan: model.food_safety_plan,
        agritourism: model.agritourism,
        sells_at_markets: model.sells_at_markets,
        csa_boxes: model.csa_boxes,
        online_sales: model.online_sales,
        delivery: model.delivery,
        f2s_experience: model.f2s_experience,
        interested_in_f2s: model.interested_in_f2s,
        status: status_from_schema(model.status),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn status_to_schema(status: FarmStatus) -> farms::FarmStatus {
    match status {
        FarmStatus::PendingApproval => farms::FarmStatus::PendingApproval,
        FarmStatus::Approved => farms::FarmStatus::Approved,
        FarmStatus::Rejected => farms::FarmStatus::Rejected,
    }
}

fn status_from_schema(status: farms::FarmStatus) -> FarmStatus {
    match status {
        farms::FarmStatus::PendingApproval => FarmStatus::PendingApproval,
        farms::FarmStatus::Approved => FarmStatus::Approved,
        farms::FarmStatus::Rejected => FarmStatus::Rejected,
    }
}
