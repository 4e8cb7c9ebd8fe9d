use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::error;

use crate::domain::{
    ChargingStation, ConnectorType, DomainError, DomainResult, GeoPoint, StationChanges,
    StationRepository, StationStatus,
};
use crate::infrastructure::database::entities::charging_station::{self, PointColumn};

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_status_to_domain(status: charging_station::StationStatus) -> StationStatus {
    match status {
        charging_station::StationStatus::Active => StationStatus::Active,
        charging_station::StationStatus::Inactive => StationStatus::Inactive,
    }
}

fn domain_status_to_entity(status: StationStatus) -> charging_station::StationStatus {
    match status {
        StationStatus::Active => charging_station::StationStatus::Active,
        StationStatus::Inactive => charging_station::StationStatus::Inactive,
    }
}

fn entity_connector_to_domain(connector: charging_station::ConnectorType) -> ConnectorType {
    match connector {
        charging_station::ConnectorType::Type2 => ConnectorType::Type2,
        charging_station::ConnectorType::Ccs => ConnectorType::Ccs,
        charging_station::ConnectorType::Chademo => ConnectorType::Chademo,
        charging_station::ConnectorType::AcType1 => ConnectorType::AcType1,
        charging_station::ConnectorType::AcType3 => ConnectorType::AcType3,
    }
}

fn domain_connector_to_entity(connector: ConnectorType) -> charging_station::ConnectorType {
    match connector {
        ConnectorType::Type2 => charging_station::ConnectorType::Type2,
        ConnectorType::Ccs => charging_station::ConnectorType::Ccs,
        ConnectorType::Chademo => charging_station::ConnectorType::Chademo,
        ConnectorType::AcType1 => charging_station::ConnectorType::AcType1,
        ConnectorType::AcType3 => charging_station::ConnectorType::AcType3,
    }
}

fn point_to_column(point: &GeoPoint) -> PointColumn {
    PointColumn {
        kind: point.kind().to_string(),
        coordinates: point.coordinates().to_vec(),
    }
}

fn station_model_to_domain(model: charging_station::Model) -> DomainResult<ChargingStation> {
    let location = GeoPoint::from_geojson(&model.location.kind, &model.location.coordinates)
        .map_err(|e| {
            error!(station_id = %model.id, "Stored location is not a valid point: {}", e);
            DomainError::Internal(format!("Corrupt location for station {}: {}", model.id, e))
        })?;

    Ok(ChargingStation {
        id: model.id,
        owner_id: model.user_id,
        name: model.name,
        location,
        address_display_name: model.address_display_name,
        status: entity_status_to_domain(model.status),
        power_output: model.power_output,
        connector_type: entity_connector_to_domain(model.connector_type),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn changes_to_active_model(changes: StationChanges) -> charging_station::ActiveModel {
    let mut model = charging_station::ActiveModel {
        updated_at: Set(changes.updated_at),
        ..Default::default()
    };

    if let Some(name) = changes.name {
        model.name = Set(name);
    }
    if let Some(location) = changes.location {
        model.location = Set(point_to_column(&location));
    }
    if let Some(label) = changes.address_display_name {
        model.address_display_name = Set(label);
    }
    if let Some(status) = changes.status {
        model.status = Set(domain_status_to_entity(status));
    }
    if let Some(power_output) = changes.power_output {
        model.power_output = Set(power_output);
    }
    if let Some(connector_type) = changes.connector_type {
        model.connector_type = Set(domain_connector_to_entity(connector_type));
    }
    model
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn insert(&self, station: ChargingStation) -> DomainResult<ChargingStation> {
        let model = charging_station::ActiveModel {
            id: Set(station.id),
            user_id: Set(station.owner_id),
            name: Set(station.name),
            location: Set(point_to_column(&station.location)),
            address_display_name: Set(station.address_display_name),
            status: Set(domain_status_to_entity(station.status)),
            power_output: Set(station.power_output),
            connector_type: Set(domain_connector_to_entity(station.connector_type)),
            created_at: Set(station.created_at),
            updated_at: Set(station.updated_at),
        };

        station_model_to_domain(model.insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargingStation>> {
        charging_station::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(station_model_to_domain)
            .transpose()
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<ChargingStation>> {
        charging_station::Entity::find()
            .filter(charging_station::Column::UserId.eq(owner_id))
            .order_by_desc(charging_station::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(station_model_to_domain)
            .collect()
    }

    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        changes: StationChanges,
    ) -> DomainResult<Option<ChargingStation>> {
        let txn = self.db.begin().await?;

        let result = charging_station::Entity::update_many()
            .set(changes_to_active_model(changes))
            .filter(charging_station::Column::Id.eq(id))
            .filter(charging_station::Column::UserId.eq(owner_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let model = charging_station::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;

        model.map(station_model_to_domain).transpose()
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> DomainResult<bool> {
        let result = charging_station::Entity::delete_many()
            .filter(charging_station::Column::Id.eq(id))
            .filter(charging_station::Column::UserId.eq(owner_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
