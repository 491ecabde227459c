use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::FeePolicy;
use persistence::EntityStore;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{companies, favorites, gateways, health, quotes, rates, settings};

/// Settings are never cached here; every request reads them from the store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub config: Arc<Config>,
    pub fee_policy: FeePolicy,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn EntityStore>) -> Self {
        Self {
            fee_policy: FeePolicy::new(config.fees.decimal_places),
            config: Arc::new(config),
            store,
        }
    }
}

pub fn create_app(config: Config, store: Arc<dyn EntityStore>) -> Router {
    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let cors = cors_layer(&config.security.cors_origins);
    let state = AppState::new(config, store);

    let catalogue_routes = Router::new()
        .route(
            "/api/v1/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/v1/companies/:company_id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/api/v1/gateways",
            get(gateways::list_gateways).post(gateways::create_gateway),
        )
        .route(
            "/api/v1/gateways/:gateway_id",
            get(gateways::get_gateway)
                .put(gateways::update_gateway)
                .delete(gateways::delete_gateway),
        )
        .route(
            "/api/v1/rates",
            get(rates::list_rates).post(rates::create_rate),
        )
        .route("/api/v1/rates/resolve", post(rates::resolve))
        .route(
            "/api/v1/rates/:rate_id",
            get(rates::get_rate)
                .put(rates::update_rate)
                .delete(rates::delete_rate),
        )
        .route(
            "/api/v1/settings",
            get(settings::get_settings).put(settings::update_settings),
        );

    let quote_routes = Router::new()
        .route(
            "/api/v1/favorites",
            get(favorites::list_favorites).post(favorites::create_favorite),
        )
        .route(
            "/api/v1/favorites/:favorite_id",
            delete(favorites::delete_favorite),
        )
        .route(
            "/api/v1/favorites/:favorite_id/quote",
            get(favorites::quote_favorite),
        )
        .route("/api/v1/quotes", post(quotes::compare));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(catalogue_routes)
        .merge(quote_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
