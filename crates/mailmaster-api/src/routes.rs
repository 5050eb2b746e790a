//! API routes

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::{auth_middleware, AppState};
use crate::handlers::{accounts, campaigns, health, newsletters, subscribers};

/// Create the API router
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let state = Arc::new(state);

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state.clone());

    // Newsletter routes
    let newsletter_routes = Router::new()
        .route(
            "/",
            get(newsletters::list_newsletters).post(newsletters::create_newsletter),
        )
        .route(
            "/:id",
            get(newsletters::get_newsletter)
                .put(newsletters::update_newsletter)
                .delete(newsletters::delete_newsletter),
        );

    // Subscriber routes
    let subscriber_routes = Router::new()
        .route(
            "/",
            get(subscribers::list_subscribers).post(subscribers::create_subscriber),
        )
        .route(
            "/:id",
            get(subscribers::get_subscriber)
                .put(subscribers::update_subscriber)
                .delete(subscribers::delete_subscriber),
        );

    // Campaign routes
    let campaign_routes = Router::new()
        .route(
            "/",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/:id",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route("/:id/send", post(campaigns::send_campaign))
        .route("/:id/preview", get(campaigns::preview_campaign));

    // Routes behind the bearer token
    let protected = Router::new()
        .route("/logout", post(accounts::logout))
        .route("/user", get(accounts::current_user))
        .nest("/newsletters", newsletter_routes)
        .nest("/subscribers", subscriber_routes)
        .nest("/campaigns", campaign_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .merge(protected)
        .with_state(state);

    let mut router = Router::new()
        .nest("/health", health_routes)
        .nest("/api", api)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(cors_origins) {
        router = router.layer(cors);
    }
    router
}

/// CORS for the configured origins, `*` allows any
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    Some(layer.allow_origin(origins))
}
