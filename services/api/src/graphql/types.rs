//! Wire-facing DTOs. Field names follow the published schema: user and farm
//! objects keep snake_case column names while timestamps stay camelCase, and
//! every timestamp serializes as RFC 3339 with millisecond precision.

use async_graphql::{Enum, InputObject, Json, SimpleObject};
use uuid::Uuid;

use farmbase_core::time::to_rfc3339_ms;
use farmbase_domain::farm::{FarmStatus, GeoPoint, MarketSalesEntry};
use farmbase_domain::user::UserRole;

use crate::domain::types::{CreateFarmData, Farm, Sample, UpdateFarmData, UpdateUserData, User};
use crate::error::ApiError;
use crate::usecase;
use crate::usecase::auth::AuthOutcome;

// ── Enums ────────────────────────────────────────────────────────────────────

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(name = "Role")]
pub enum RoleDto {
    Standard,
    Administrator,
}

impl From<UserRole> for RoleDto {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Standard => Self::Standard,
            UserRole::Administrator => Self::Administrator,
        }
    }
}

impl From<RoleDto> for UserRole {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::Standard => Self::Standard,
            RoleDto::Administrator => Self::Administrator,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(name = "FarmStatus")]
pub enum FarmStatusDto {
    PendingApproval,
    Approved,
    Rejected,
}

impl From<FarmStatus> for FarmStatusDto {
    fn from(status: FarmStatus) -> Self {
        match status {
            FarmStatus::PendingApproval => Self::PendingApproval,
            FarmStatus::Approved => Self::Approved,
            FarmStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<FarmStatusDto> for FarmStatus {
    fn from(status: FarmStatusDto) -> Self {
        match status {
            FarmStatusDto::PendingApproval => Self::PendingApproval,
            FarmStatusDto::Approved => Self::Approved,
            FarmStatusDto::Rejected => Self::Rejected,
        }
    }
}

// ── Sample ───────────────────────────────────────────────────────────────────

#[derive(SimpleObject)]
#[graphql(name = "Sample")]
pub struct SampleDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Sample> for SampleDto {
    fn from(sample: Sample) -> Self {
        Self {
            id: sample.id,
            name: sample.name,
            description: sample.description,
            created_at: to_rfc3339_ms(sample.created_at),
            updated_at: to_rfc3339_ms(sample.updated_at),
        }
    }
}

#[derive(InputObject)]
pub struct SampleInput {
    pub name: String,
    pub description: String,
}

impl From<SampleInput> for usecase::sample::CreateSampleInput {
    fn from(input: SampleInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
        }
    }
}

// ── User ─────────────────────────────────────────────────────────────────────

#[derive(SimpleObject)]
#[graphql(name = "User", rename_fields = "snake_case")]
pub struct UserDto {
    pub id: Uuid,
    pub auth_id: String,
    pub email: String,
    pub role: RoleDto,
    pub is_verified: bool,
    #[graphql(name = "createdAt")]
    pub created_at: String,
    #[graphql(name = "updatedAt")]
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            auth_id: user.auth_id,
            email: user.email,
            role: user.role.into(),
            is_verified: user.is_verified,
            created_at: to_rfc3339_ms(user.created_at),
            updated_at: to_rfc3339_ms(user.updated_at),
        }
    }
}

#[derive(InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateUserInput {
    pub email: String,
    pub password: Option<String>,
    pub role: Option<RoleDto>,
    /// Subject id of an already-existing identity account.
    pub auth_id: Option<String>,
}

impl From<CreateUserInput> for usecase::user::CreateUserInput {
    fn from(input: CreateUserInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
            role: input.role.map_or(UserRole::Standard, Into::into),
            auth_id: input.auth_id,
        }
    }
}

#[derive(InputObject)]
pub struct UpdateUserInput {
    pub email: String,
    pub role: RoleDto,
}

impl From<UpdateUserInput> for UpdateUserData {
    fn from(input: UpdateUserInput) -> Self {
        Self {
            email: input.email,
            role: input.role.into(),
        }
    }
}

#[derive(InputObject)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[derive(SimpleObject)]
#[graphql(name = "Auth", rename_fields = "snake_case")]
pub struct AuthDto {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthOutcome> for AuthDto {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            user: outcome.user.into(),
            access_token: outcome.access_token,
            refresh_token: outcome.refresh_token,
        }
    }
}

// ── Farm ─────────────────────────────────────────────────────────────────────

/// GeoJSON point, always `type: "Point"` with `[longitude, latitude]`.
#[derive(SimpleObject)]
#[graphql(name = "GeoJSONPoint")]
pub struct GeoJsonPointDto {
    #[graphql(name = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for GeoJsonPointDto {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".into(),
            coordinates: point.coordinates().to_vec(),
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "GeoJSONPointInput")]
pub struct GeoJsonPointInput {
    #[graphql(name = "type")]
    pub kind: Option<String>,
    pub coordinates: Vec<f64>,
}

impl GeoJsonPointInput {
    pub fn into_point(self) -> Result<GeoPoint, ApiError> {
        match self.coordinates.as_slice() {
            [longitude, latitude] => Ok(GeoPoint {
                longitude: *longitude,
                latitude: *latitude,
            }),
            _ => Err(ApiError::BadUserInput(
                "location.coordinates must be [longitude, latitude]".into(),
            )),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "MarketSalesData", rename_fields = "snake_case")]
pub struct MarketSalesDto {
    pub market: String,
    pub times: String,
}

impl From<MarketSalesEntry> for MarketSalesDto {
    fn from(entry: MarketSalesEntry) -> Self {
        Self {
            market: entry.market,
            times: entry.times,
        }
    }
}

#[derive(InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct MarketSalesInput {
    pub market: String,
    pub times: String,
}

impl From<MarketSalesInput> for MarketSalesEntry {
    fn from(input: MarketSalesInput) -> Self {
        Self {
            market: input.market,
            times: input.times,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Farm", rename_fields = "snake_case")]
pub struct FarmDto {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub usda_farm_id: i32,
    pub farm_name: String,
    pub description: String,
    pub primary_phone: String,
    pub primary_email: String,
    pub website: Option<String>,
    pub social_media: Option<Json<serde_json::Value>>,
    pub farm_address: String,
    pub counties_served: Vec<String>,
    pub cities_served: Vec<String>,
    pub location: GeoJsonPointDto,
    pub food_categories: Vec<String>,
    pub market_sales_data: Option<Vec<MarketSalesDto>>,
    pub bipoc_owned: bool,
    pub gap_certified: bool,
    pub food_safety_plan: bool,
    pub agritourism: bool,
    pub sells_at_markets: bool,
    pub csa_boxes: bool,
    pub online_sales: bool,
    pub delivery: bool,
    pub f2s_experience: bool,
    pub interested_in_f2s: bool,
    pub status: FarmStatusDto,
    #[graphql(name = "createdAt")]
    pub created_at: String,
    #[graphql(name = "updatedAt")]
    pub updated_at: String,
}

impl From<Farm> for FarmDto {
    fn from(farm: Farm) -> Self {
        Self {
            id: farm.id,
            owner_user_id: farm.owner_user_id,
            usda_farm_id: farm.usda_farm_id,
            farm_name: farm.farm_name,
            description: farm.description,
            primary_phone: farm.primary_phone,
            primary_email: farm.primary_email,
            website: farm.website,
            social_media: farm.social_media.map(Json),
            farm_address: farm.farm_address,
            counties_served: farm.counties_served,
            cities_served: farm.cities_served,
            location: farm.location.into(),
            food_categories: farm.food_categories,
            market_sales_data: farm
                .market_sales_data
                .map(|entries| entries.into_iter().map(Into::into).collect()),
            bipoc_owned: farm.bipoc_owned,
            gap_certified: farm.gap_certified,
            food_safety_plan: farm.food_safety_plan,
            agritourism: farm.agritourism,
            sells_at_markets: farm.sells_at_markets,
            csa_boxes: farm.csa_boxes,
            online_sales: farm.online_sales,
            delivery: farm.delivery,
            f2s_experience: farm.f2s_experience,
            interested_in_f2s: farm.interested_in_f2s,
            status: farm.status.into(),
            created_at: to_rfc3339_ms(farm.created_at),
            updated_at: to_rfc3339_ms(farm.updated_at),
        }
    }
}

#[derive(InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct CreateFarmInput {
    pub usda_farm_id: i32,
    pub farm_name: String,
    pub description: String,
    pub primary_phone: String,
    pub primary_email: String,
    pub website: Option<String>,
    pub social_media: Option<Json<serde_json::Value>>,
    pub farm_address: String,
    pub counties_served: Vec<String>,
    pub cities_served: Vec<String>,
    pub location: GeoJsonPointInput,
    pub food_categories: Vec<String>,
    pub market_sales_data: Option<Vec<MarketSalesInput>>,
    pub bipoc_owned: Option<bool>,
    pub gap_certified: Option<bool>,
    pub food_safety_plan: Option<bool>,
    pub agritourism: Option<bool>,
    pub sells_at_markets: Option<bool>,
    pub csa_boxes: Option<bool>,
    pub online_sales: Option<bool>,
    pub delivery: Option<bool>,
    pub f2s_experience: Option<bool>,
    pub interested_in_f2s: Option<bool>,
}

impl CreateFarmInput {
    pub fn into_data(self) -> Result<CreateFarmData, ApiError> {
        Ok(CreateFarmData {
            usda_farm_id: self.usda_farm_id,
            farm_name: self.farm_name,
            description: self.description,
            primary_phone: self.primary_phone,
            primary_email: self.primary_email,
            website: self.website,
            social_media: self.social_media.map(|json| json.0),
            farm_address: self.farm_address,
            counties_served: self.counties_served,
            cities_served: self.cities_served,
            location: self.location.into_point()?,
            food_categories: self.food_categories,
            market_sales_data: self
                .market_sales_data
                .map(|entries| entries.into_iter().map(Into::into).collect()),
            bipoc_owned: self.bipoc_owned,
            gap_certified: self.gap_certified,
            food_safety_plan: self.food_safety_plan,
            agritourism: self.agritourism,
            sells_at_markets: self.sells_at_markets,
            csa_boxes: self.csa_boxes,
            online_sales: self.online_sales,
            delivery: self.delivery,
            f2s_experience: self.f2s_experience,
            interested_in_f2s: self.interested_in_f2s,
        })
    }
}

#[derive(InputObject)]
#[graphql(rename_fields = "snake_case")]
pub struct UpdateFarmInput {
    pub farm_name: Option<String>,
    pub description: Option<String>,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<Json<serde_json::Value>>,
    pub farm_address: Option<String>,
    pub counties_served: Option<Vec<String>>,
    pub cities_served: Option<Vec<String>>,
    pub location: Option<GeoJsonPointInput>,
    pub food_categories: Option<Vec<String>>,
    pub market_sales_data: Option<Vec<MarketSalesInput>>,
    pub bipoc_owned: Option<bool>,
    pub gap_certified: Option<bool>,
    pub food_safety_plan: Option<bool>,
    pub agritourism: Option<bool>,
    pub sells_at_markets: Option<bool>,
    pub csa_boxes: Option<bool>,
    pub online_sales: Option<bool>,
    pub delivery: Option<bool>,
    pub f2s_experience: Option<bool>,
    pub interested_in_f2s: Option<bool>,
    pub status: Option<FarmStatusDto>,
}

impl UpdateFarmInput {
    pub fn into_data(self) -> Result<UpdateFarmData, ApiError> {
        Ok(UpdateFarmData {
            farm_name: self.farm_name,
            description: self.description,
            primary_phone: self.primary_phone,
            primary_email: self.primary_email,
            website: self.website,
            social_media: self.social_media.map(|json| json.0),
            farm_address: self.farm_address,
            counties_served: self.counties_served,
            cities_served: self.cities_served,
            location: self.location.map(GeoJsonPointInput::into_point).transpose()?,
            food_categories: self.food_categories,
            market_sales_data: self
                .market_sales_data
                .map(|entries| entries.into_iter().map(Into::into).collect()),
            bipoc_owned: self.bipoc_owned,
            gap_certified: self.gap_certified,
            food_safety_plan: self.food_safety_plan,
            agritourism: self.agritourism,
            sells_at_markets: self.sells_at_markets,
            csa_boxes: self.csa_boxes,
            online_sales: self.online_sales,
            delivery: self.delivery,
            f2s_experience: self.f2s_experience,
            interested_in_f2s: self.interested_in_f2s,
            status: self.status.map(Into::into),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_coordinates_that_are_not_a_pair() {
        let input = GeoJsonPointInput {
            kind: None,
            coordinates: vec![1.0, 2.0, 3.0],
        };
        assert!(matches!(
            input.into_point(),
            Err(ApiError::BadUserInput(_))
        ));
    }

    #[test]
    fn should_build_geojson_output_from_point() {
        let dto = GeoJsonPointDto::from(GeoPoint {
            longitude: -123.5,
            latitude: 44.25,
        });
        assert_eq!(dto.kind, "Point");
        assert_eq!(dto.coordinates, vec![-123.5, 44.25]);
    }
}
