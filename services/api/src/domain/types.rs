use chrono::{DateTime, Utc};
use uuid::Uuid;

use farmbase_domain::farm::{FarmStatus, GeoPoint, MarketSalesEntry};
use farmbase_domain::user::UserRole;

/// Demo record kept from the project starter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Local user row. `auth_id` is the identity-provider subject id; the row is
/// a projection of provider truth plus local role/verification metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub auth_id: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user update may change.
#[derive(Debug, Clone)]
pub struct UpdateUserData {
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Farm {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub usda_farm_id: i32,
    pub farm_name: String,
    pub description: String,
    pub primary_phone: String,
    pub primary_email: String,
    pub website: Option<String>,
    pub social_media: Option<serde_json::Value>,
    pub farm_address: String,
    pub counties_served: Vec<String>,
    pub cities_served: Vec<String>,
    pub location: GeoPoint,
    pub food_categories: Vec<String>,
    pub market_sales_data: Option<Vec<MarketSalesEntry>>,
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
    pub status: FarmStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a farm. Status is always forced to
/// `PendingApproval` and the owner comes from the verified caller.
#[derive(Debug, Clone)]
pub struct CreateFarmData {
    pub usda_farm_id: i32,
    pub farm_name: String,
    pub description: String,
    pub primary_phone: String,
    pub primary_email: String,
    pub website: Option<String>,
    pub social_media: Option<serde_json::Value>,
    pub farm_address: String,
    pub counties_served: Vec<String>,
    pub cities_served: Vec<String>,
    pub location: GeoPoint,
    pub food_categories: Vec<String>,
    pub market_sales_data: Option<Vec<MarketSalesEntry>>,
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

/// Fields a farm update may change; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateFarmData {
    pub farm_name: Option<String>,
    pub description: Option<String>,
    pub primary_phone: Option<String>,
    pub primary_email: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<serde_json::Value>,
    pub farm_address: Option<String>,
    pub counties_served: Option<Vec<String>>,
    pub cities_served: Option<Vec<String>>,
    pub location: Option<GeoPoint>,
    pub food_categories: Option<Vec<String>>,
    pub market_sales_data: Option<Vec<MarketSalesEntry>>,
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
    pub status: Option<FarmStatus>,
}

/// Identity-provider account as seen through the provider API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAccount {
    /// Provider subject id (stored locally as `auth_id`).
    pub subject: String,
    pub email: String,
    pub email_verified: bool,
}

/// Tokens issued by the identity provider on sign-in.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub subject: String,
    pub access_token: String,
    pub refresh_token: String,
}
