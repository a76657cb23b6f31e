// src/lib.rs

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use services::order_service::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
}

pub mod entities {
    pub mod prelude;
    pub mod orders;
}

pub mod services {
    pub mod access;
    pub mod audit;
    pub mod notification;
    pub mod order_service;
    pub mod order_store;
    pub mod validation;
}

pub mod config;
pub mod error;
pub mod models;
pub mod handlers;

/// Build the `/orders` API with open CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/orders", post(handlers::orders::create_order))
        .route("/orders/", post(handlers::orders::create_order))
        .route(
            "/orders/{order_id}",
            get(handlers::orders::get_order).put(handlers::orders::update_order),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
