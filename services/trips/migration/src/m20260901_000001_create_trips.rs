use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trips::Source).string().not_null())
                    .col(ColumnDef::new(Trips::Destination).string().not_null())
                    .col(ColumnDef::new(Trips::Date).date().not_null())
                    .col(ColumnDef::new(Trips::Day).string().not_null())
                    .col(ColumnDef::new(Trips::Time).string().not_null())
                    .col(
                        ColumnDef::new(Trips::AvailableSeats)
                            .integer()
                            .not_null()
                            .check(Expr::col(Trips::AvailableSeats).gte(0)),
                    )
                    .col(ColumnDef::new(Trips::Price).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Trips::Currency)
                            .string()
                            .not_null()
                            .default("EGP"),
                    )
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs the duplicate-trip check against concurrent creators.
        manager
            .create_index(
                Index::create()
                    .table(Trips::Table)
                    .col(Trips::Source)
                    .col(Trips::Destination)
                    .col(Trips::Date)
                    .col(Trips::Time)
                    .unique()
                    .name("uq_trips_route_schedule")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Trips::Table)
                    .col(Trips::Status)
                    .col(Trips::Date)
                    .name("idx_trips_status_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    Source,
    Destination,
    Date,
    Day,
    Time,
    AvailableSeats,
    Price,
    Currency,
    Status,
    CreatedAt,
    UpdatedAt,
}
