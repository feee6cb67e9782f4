use crate::{
    config::AppConfig,
    handlers,
    middleware::{add_security_headers, SecurityHeaders},
    AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Routes under `/api/users`, without layers or state.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/{id}", get(handlers::get_user))
}

/// Full application: API routes plus CORS, security headers and request tracing.
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    api_routes()
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(middleware::from_fn_with_state(
            SecurityHeaders {
                hsts: config.is_production(),
            },
            add_security_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600))
}
