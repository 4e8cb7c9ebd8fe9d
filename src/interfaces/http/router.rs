//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CredentialService, StationService};
use crate::domain::{Coordinates, RepositoryProvider};
use crate::infrastructure::crypto::TokenService;
use crate::interfaces::http::common::ErrorBody;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::{auth, chargers, health, metrics, request_id};

/// Everything the router needs from the composition root.
pub struct ApiContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
    /// Pinged by `/health`; `None` on the in-memory repositories
    pub db: Option<DatabaseConnection>,
    pub metrics: PrometheusHandle,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::get_current_user,
        chargers::create_station,
        chargers::list_stations,
        chargers::update_station,
        chargers::delete_station,
    ),
    components(
        schemas(
            ErrorBody,
            Coordinates,
            auth::CredentialsRequest,
            auth::AuthResponse,
            auth::UserInfo,
            chargers::LocationRequest,
            chargers::CreateStationRequest,
            chargers::UpdateStationRequest,
            chargers::StationResponse,
            chargers::MessageResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Registration, login (JWT) and current user"),
        (name = "Chargers", description = "Charging stations owned by the authenticated user"),
    ),
    info(
        title = "Charger Directory API",
        version = "1.0.0",
        description = "REST API for managing EV charging stations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        tokens: ctx.tokens.clone(),
        repos: ctx.repos.clone(),
    };

    let credentials = CredentialService::new(ctx.repos.clone(), ctx.tokens.clone())
        .with_bcrypt_cost(ctx.bcrypt_cost);
    let auth_handler_state = auth::AuthHandlerState {
        credentials: Arc::new(credentials),
    };
    let station_state = chargers::StationHandlerState {
        stations: Arc::new(StationService::new(ctx.repos.clone())),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes; only `/me` sits behind the gate
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/me",
            get(auth::get_current_user).route_layer(middleware::from_fn_with_state(
                auth_state.clone(),
                auth_middleware,
            )),
        )
        .with_state(auth_handler_state);

    // Charger routes (protected)
    let charger_routes = Router::new()
        .route(
            "/",
            get(chargers::list_stations).post(chargers::create_station),
        )
        .route(
            "/{id}",
            put(chargers::update_station).delete(chargers::delete_station),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(station_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.metrics,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/", get(health::root))
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/chargers", charger_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
