use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(FarmStatus::Enum)
                    .values([
                        FarmStatus::PendingApproval,
                        FarmStatus::Approved,
                        FarmStatus::Rejected,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Farms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Farms::OwnerUserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Farms::UsdaFarmId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Farms::FarmName).string().not_null())
                    .col(ColumnDef::new(Farms::Description).text().not_null())
                    .col(ColumnDef::new(Farms::PrimaryPhone).string().not_null())
                    .col(ColumnDef::new(Farms::PrimaryEmail).string().not_null())
                    .col(ColumnDef::new(Farms::Website).string())
                    .col(ColumnDef::new(Farms::SocialMedia).json_binary())
                    .col(ColumnDef::new(Farms::FarmAddress).string().not_null())
                    .col(
                        ColumnDef::new(Farms::CountiesServed)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Farms::CitiesServed)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Farms::LocationLongitude)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Farms::LocationLatitude).double().not_null())
                    .col(
                        ColumnDef::new(Farms::FoodCategories)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Farms::MarketSalesData).json_binary())
                    .col(bool_col(Farms::BipocOwned))
                    .col(bool_col(Farms::GapCertified))
                    .col(bool_col(Farms::FoodSafetyPlan))
                    .col(bool_col(Farms::Agritourism))
                    .col(bool_col(Farms::SellsAtMarkets))
                    .col(bool_col(Farms::CsaBoxes))
                    .col(bool_col(Farms::OnlineSales))
                    .col(bool_col(Farms::Delivery))
                    .col(bool_col(Farms::F2sExperience))
                    .col(bool_col(Farms::InterestedInF2s))
                    .col(
                        ColumnDef::new(Farms::Status)
                            .enumeration(
                                FarmStatus::Enum,
                                [
                                    FarmStatus::PendingApproval,
                                    FarmStatus::Approved,
                                    FarmStatus::Rejected,
                                ],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Farms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Farms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Farms::Table, Farms::OwnerUserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(FarmStatus::Enum).to_owned())
            .await
    }
}

fn bool_col(name: Farms) -> ColumnDef {
    ColumnDef::new(name)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[derive(Iden, Clone, Copy)]
enum Farms {
    Table,
    Id,
    OwnerUserId,
    UsdaFarmId,
    FarmName,
    Description,
    PrimaryPhone,
    PrimaryEmail,
    Website,
    SocialMedia,
    FarmAddress,
    CountiesServed,
    CitiesServed,
    LocationLongitude,
    LocationLatitude,
    FoodCategories,
    MarketSalesData,
    BipocOwned,
    GapCertified,
    FoodSafetyPlan,
    Agritourism,
    SellsAtMarkets,
    CsaBoxes,
    OnlineSales,
    Delivery,
    F2sExperience,
    InterestedInF2s,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum FarmStatus {
    #[iden = "farm_status"]
    Enum,
    #[iden = "PENDING_APPROVAL"]
    PendingApproval,
    #[iden = "APPROVED"]
    Approved,
    #[iden = "REJECTED"]
    Rejected,
}
