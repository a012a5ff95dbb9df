#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use cafe_orders::{
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    handlers::AppServices,
    menu::Menu,
    notifications::MemoryMailer,
    services::OrderService,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_DATABASE_URL: &str = "sqlite::memory:";

/// Fresh in-memory SQLite database with the schema applied.
///
/// The pool holds exactly one connection: every connection to `:memory:` is a
/// separate database.
pub async fn setup_db() -> Arc<DbPool> {
    let config = DbConfig {
        url: TEST_DATABASE_URL.to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations in tests");
    Arc::new(pool)
}

pub async fn order_service() -> (OrderService, Arc<MemoryMailer>) {
    let db = setup_db().await;
    let mailer = Arc::new(MemoryMailer::new());
    let service = OrderService::new(db, mailer.clone(), "Ryan's Cafe");
    (service, mailer)
}

/// Router backed by a fresh database, plus the mailer it reports to.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub mailer: Arc<MemoryMailer>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = setup_db().await;
        let mut cfg = AppConfig::for_database(TEST_DATABASE_URL);
        cfg.db_max_connections = 1;

        let mailer = Arc::new(MemoryMailer::new());
        let services = AppServices::new(
            db.clone(),
            mailer.clone(),
            &cfg.cafe_name,
            Menu::cafe_default(),
        );
        let state = AppState {
            db,
            config: cfg,
            services,
        };

        Self {
            router: cafe_orders::app_router(state.clone()),
            state,
            mailer,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (u16, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (u16, Value) {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (u16, Value) {
        self.request(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> (u16, Value) {
        self.request(
            Request::post(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
