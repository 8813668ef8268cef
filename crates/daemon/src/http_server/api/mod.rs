use axum::Router;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod client;
pub mod v0;

use crate::ServiceState;

/// Versioned JSON API; browsers may call it from any origin without cookies
pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN]);

    Router::new()
        .nest("/v0/shares", v0::shares::router(state.clone()))
        .layer(cors)
        .with_state(state)
}
