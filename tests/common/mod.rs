//! Shared harness: the full router over a migrated SQLite in-memory database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use charger_directory::domain::RepositoryProvider;
use charger_directory::infrastructure::crypto::{JwtConfig, TokenService};
use charger_directory::infrastructure::database::migrator::Migrator;
use charger_directory::interfaces::http::ApiContext;
use charger_directory::{create_api_router, SeaOrmRepositoryProvider};

pub const JWT_SECRET: &str = "integration-secret";
pub const JWT_ISSUER: &str = "charger-directory";

pub struct TestApp {
    pub router: Router,
    pub tokens: Arc<TokenService>,
}

pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // A single connection keeps every query on the same in-memory database.
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let tokens = Arc::new(TokenService::new(&JwtConfig {
        secret: JWT_SECRET.to_string(),
        issuer: JWT_ISSUER.to_string(),
    }));

    let router = create_api_router(ApiContext {
        repos,
        tokens: tokens.clone(),
        bcrypt_cost: 4,
        db: Some(db),
        metrics: PrometheusBuilder::new().build_recorder().handle(),
    });

    TestApp { router, tokens }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    /// Register `username` and return its bearer token.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(serde_json::json!({"username": username, "password": password})),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }
}

pub fn lot_a() -> Value {
    serde_json::json!({
        "name": "Lot A",
        "location": {"latitude": 40.0, "longitude": -75.0},
        "status": "Active",
        "powerOutput": 50,
        "connectorType": "CCS"
    })
}
