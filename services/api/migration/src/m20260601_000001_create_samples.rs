use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Samples::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Samples::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Samples::Name).string().not_null())
                    .col(ColumnDef::new(Samples::Description).text().not_null())
                    .col(
                        ColumnDef::new(Samples::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Samples::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Samples::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Samples {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}
