//! Create charging_stations table migration

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChargingStations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargingStations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChargingStations::UserId).string().not_null())
                    .col(
                        ColumnDef::new(ChargingStations::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    // GeoJSON point: {"type": "Point", "coordinates": [lon, lat]}
                    .col(ColumnDef::new(ChargingStations::Location).json().not_null())
                    .col(
                        ColumnDef::new(ChargingStations::AddressDisplayName)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::Status)
                            .string_len(20)
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::PowerOutput)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::ConnectorType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChargingStations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_charging_stations_user_id")
                            .from(ChargingStations::Table, ChargingStations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Owner listing
        manager
            .create_index(
                Index::create()
                    .name("idx_charging_stations_user_id")
                    .table(ChargingStations::Table)
                    .col(ChargingStations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChargingStations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChargingStations {
    Table,
    Id,
    UserId,
    Name,
    Location,
    AddressDisplayName,
    Status,
    PowerOutput,
    ConnectorType,
    CreatedAt,
    UpdatedAt,
}
