//! Charging station API handlers
//!
//! Every route sits behind the auth gate; the caller's identity is the
//! owner for create/list and the required owner for update/delete.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use super::dto::{CreateStationRequest, MessageResponse, StationResponse, UpdateStationRequest};
use crate::application::StationService;
use crate::interfaces::http::common::{ApiError, ErrorBody, JsonBody};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct StationHandlerState {
    pub stations: Arc<StationService>,
}

#[utoipa::path(
    post,
    path = "/api/chargers",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = StationResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn create_station(
    State(state): State<StationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<StationResponse>), ApiError> {
    let request = CreateStationRequest::from_body(body);
    let station = state.stations.create(&user.id, request.into()).await?;
    Ok((StatusCode::CREATED, Json(station.into())))
}

#[utoipa::path(
    get,
    path = "/api/chargers",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stations owned by the caller, newest first", body = Vec<StationResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn list_stations(
    State(state): State<StationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<StationResponse>>, ApiError> {
    let stations = state.stations.list_by_owner(&user.id).await?;
    Ok(Json(stations.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/api/chargers/{id}",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = StationResponse),
        (status = 400, description = "Validation error or nothing to change", body = ErrorBody),
        (status = 403, description = "Station belongs to another user", body = ErrorBody),
        (status = 404, description = "Station not found", body = ErrorBody)
    )
)]
pub async fn update_station(
    State(state): State<StationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<StationResponse>, ApiError> {
    // Field types are checked by the service, after ownership.
    let request = UpdateStationRequest::from_body(body);
    let station = state.stations.update(&id, &user.id, request.into()).await?;
    Ok(Json(station.into()))
}

#[utoipa::path(
    delete,
    path = "/api/chargers/{id}",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station removed", body = MessageResponse),
        (status = 403, description = "Station belongs to another user", body = ErrorBody),
        (status = 404, description = "Station not found", body = ErrorBody)
    )
)]
pub async fn delete_station(
    State(state): State<StationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.stations.delete(&id, &user.id).await?;
    Ok(Json(MessageResponse {
        message: "Charging station removed successfully".to_string(),
    }))
}
