use chrono::Utc;
use uuid::Uuid;

use farmbase_domain::farm::FarmStatus;

use crate::domain::repository::FarmRepository;
use crate::domain::types::{CreateFarmData, Farm, UpdateFarmData};
use crate::error::ApiError;

fn farm_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("farmId {id} not found."))
}

// ── GetFarm ──────────────────────────────────────────────────────────────────

pub struct GetFarmUseCase<R: FarmRepository> {
    pub repo: R,
}

impl<R: FarmRepository> GetFarmUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Farm, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| farm_not_found(id))
    }
}

// ── GetFarmsByUser ───────────────────────────────────────────────────────────

pub struct GetFarmsByUserUseCase<R: FarmRepository> {
    pub repo: R,
}

impl<R: FarmRepository> GetFarmsByUserUseCase<R> {
    pub async fn execute(&self, owner_user_id: Uuid) -> Result<Vec<Farm>, ApiError> {
        self.repo.find_by_owner(owner_user_id).await
    }
}

// ── GetAllFarms ──────────────────────────────────────────────────────────────

pub struct GetAllFarmsUseCase<R: FarmRepository> {
    pub repo: R,
}

impl<R: FarmRepository> GetAllFarmsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Farm>, ApiError> {
        self.repo.find_all().await
    }
}

// ── CreateFarm ───────────────────────────────────────────────────────────────

pub struct CreateFarmUseCase<R: FarmRepository> {
    pub repo: R,
}

impl<R: FarmRepository> CreateFarmUseCase<R> {
    /// New farms always start in review, whatever the caller sent.
    pub async fn execute(
        &self,
        owner_user_id: Uuid,
        data: CreateFarmData,
    ) -> Result<Farm, ApiError> {
        let now = Utc::now();
        let farm = Farm {
            id: Uuid::new_v4(),
            owner_user_id,
            usda_farm_id: data.usda_farm_id,
            farm_name: data.farm_name,
            description: data.description,
            primary_phone: data.primary_phone,
            primary_email: data.primary_email,
            website: data.website,
            social_media: data.social_media,
            farm_address: data.farm_address,
            counties_served: data.counties_served,
            cities_served: data.cities_served,
            location: data.location,
            food_categories: data.food_categories,
            market_sales_data: data.market_sales_data,
            bipoc_owned: data.bipoc_owned.unwrap_or(false),
            gap_certified: data.gap_certified.unwrap_or(false),
            food_safety_plan: data.food_safety_plan.unwrap_or(false),
            agritourism: data.agritourism.unwrap_or(false),
            sells_at_markets: data.sells_at_markets.unwrap_or(false),
            csa_boxes: data.csa_boxes.unwrap_or(false),
            online_sales: data.online_sales.unwrap_or(false),
            delivery: data.delivery.unwrap_or(false),
            f2s_experience: data.f2s_experience.unwrap_or(false),
            interested_in_f2s: data.interested_in_f2s.unwrap_or(false),
            status: FarmStatus::PendingApproval,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(owner_user_id, &farm).await?;
        Ok(farm)
    }
}

// ── UpdateFarm ───────────────────────────────────────────────────────────────

pub struct UpdateFarmUseCase<R: FarmRepository> {
    pub repo: R,
}

impl<R: FarmRepository> UpdateFarmUseCase<R> {
    pub async fn execute(&self, id: Uuid, data: UpdateFarmData) -> Result<Farm, ApiError> {
        let mut farm = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| farm_not_found(id))?;
        apply_update(&mut farm, data);
        farm.updated_at = Utc::now();
        if !self.repo.update(&farm).await? {
            return Err(farm_not_found(id));
        }
        Ok(farm)
    }
}

fn apply_update(farm: &mut Farm, data: UpdateFarmData) {
    if let Some(v) = data.farm_name {
        farm.farm_name = v;
    }
    if let Some(v) = data.description {
        farm.description = v;
    }
    if let Some(v) = data.primary_phone {
        farm.primary_phone = v;
    }
    if let Some(v) = data.primary_email {
        farm.primary_email = v;
    }
    if let Some(v) = data.website {
        farm.website = Some(v);
    }
    if let Some(v) = data.social_media {
        farm.social_media = Some(v);
    }
    if let Some(v) = data.farm_address {
        farm.farm_address = v;
    }
    if let Some(v) = data.counties_served {
        farm.counties_served = v;
    }
    if let Some(v) = data.cities_served {
        farm.cities_served = v;
    }
    if let Some(v) = data.location {
        farm.location = v;
    }
    if let Some(v) = data.food_categories {
        farm.food_categories = v;
    }
    if let Some(v) = data.market_sales_data {
        farm.market_sales_data = Some(v);
    }
    if let Some(v) = data.bipoc_owned {
        farm.bipoc_owned = v;
    }
    if let Some(v) = data.gap_certified {
        farm.gap_certified = v;
    }
    if let Some(v) = data.food_safety_plan {
        farm.food_safety_plan = v;
    }
    if let Some(v) = data.agritourism {
        farm.agritourism = v;
    }
    if let Some(v) = data.sells_at_markets {
        farm.sells_at_markets = v;
    }
    if let Some(v) = data.csa_boxes {
        farm.csa_boxes = v;
    }
    if let Some(v) = data.online_sales {
        farm.online_sales = v;
    }
    if let Some(v) = data.delivery {
        farm.delivery = v;
    }
    if let Some(v) = data.f2s_experience {
        farm.f2s_experience = v;
    }
    if let Some(v) = data.interested_in_f2s {
        farm.interested_in_f2s = v;
    }
    if let Some(v) = data.status {
        farm.status = v;
    }
}

// ── DeleteFarm ───────────────────────────────────────────────────────────────

pub struct DeleteFarmUseCase<R: FarmRepository> {
    pub repo: R,
}

impl<R: FarmRepository> DeleteFarmUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Farm, ApiError> {
        let farm = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| farm_not_found(id))?;
        if !self.repo.delete(id).await? {
            return Err(farm_not_found(id));
        }
        Ok(farm)
    }
}
