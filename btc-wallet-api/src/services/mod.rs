//! HTTP services
//!
//! Routing for the wallet endpoints, with CORS and request tracing applied to
//! every route.

pub mod health;
pub mod wallet;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;

/// Prefix of the wallet routes
pub const API_PREFIX: &str = "/api/v1/btc/wallet";

/// Build the application router
pub fn router(config: &ApiConfig) -> Router {
    let wallet = Router::new()
        .route("/mnemonic", get(wallet::create_mnemonic))
        .route("/hd/segwit", post(wallet::create_hd_segwit_address))
        .route("/multisig", post(wallet::create_multisig_p2sh_address));

    Router::new()
        .nest(API_PREFIX, wallet)
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
}
