//! Café order tracking
//!
//! Owns the `cafe_orders` schema (`orders`, `order_items`), maps it to typed
//! entities, and places orders against it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod menu;
pub mod migrator;
pub mod notifications;
pub mod repositories;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Response envelope shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// Versioned API routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(handlers::menu::get_menu))
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::place_order),
        )
        .route("/orders/:id", get(handlers::orders::get_order))
}

/// Full application router
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/order", post(handlers::orders::place_order_form))
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
