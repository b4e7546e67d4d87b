use sea_orm::entity::prelude::*;

/// Farm listing owned by a user. The geographic location is stored as a
/// plain longitude/latitude pair of double-precision columns so it reads
/// back exactly as written.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "farms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_user_id: Uuid,
    #[sea_orm(unique)]
    pub usda_farm_id: i32,
    pub farm_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub primary_phone: String,
    pub primary_email: String,
    pub website: Option<String>,
    pub social_media: Option<Json>,
    pub farm_address: String,
    pub counties_served: Vec<String>,
    pub cities_served: Vec<String>,
    pub location_longitude: f64,
    pub location_latitude: f64,
    pub food_categories: Vec<String>,
    pub market_sales_data: Option<Json>,
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Postgres enum `farm_status`.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "farm_status")]
pub enum FarmStatus {
    #[sea_orm(string_value = "PENDING_APPROVAL")]
    PendingApproval,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerUserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
