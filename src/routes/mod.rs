//! Route definitions for the gymdesk API.

pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod health;
pub mod members;
pub mod payments;
pub mod plans;
pub mod trainers;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::AppState;

/// JSON bodies here are small; anything larger is refused before parsing.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/members", member_routes())
        .nest(
            "/trainers",
            crud_routes(
                get(trainers::list).post(trainers::create),
                put(trainers::update).delete(trainers::delete),
            ),
        )
        .nest(
            "/classes",
            crud_routes(
                get(classes::list).post(classes::create),
                put(classes::update).delete(classes::delete),
            ),
        )
        .nest(
            "/plans",
            crud_routes(
                get(plans::list).post(plans::create),
                put(plans::update).delete(plans::delete),
            ),
        )
        .nest(
            "/announcements",
            crud_routes(
                get(announcements::list).post(announcements::create),
                put(announcements::update).delete(announcements::delete),
            ),
        )
        .nest(
            "/payments",
            Router::new()
                .route("/", get(payments::list).post(payments::create))
                .route("/{id}", patch(payments::update_status)),
        )
        .nest(
            "/attendance",
            Router::new()
                .route("/", get(attendance::list).post(attendance::mark))
                .route("/today", get(attendance::today)),
        )
        .nest(
            "/dashboard",
            Router::new()
                .route("/summary", get(dashboard::summary))
                .route("/me", get(dashboard::me)),
        );

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(members::list).post(members::create))
        .route("/stats", get(members::stats))
        .route(
            "/{id}",
            get(members::get_by_id)
                .put(members::update)
                .delete(members::delete),
        )
}

fn crud_routes(
    collection: axum::routing::MethodRouter<AppState>,
    item: axum::routing::MethodRouter<AppState>,
) -> Router<AppState> {
    Router::new().route("/", collection).route("/{id}", item)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, CORS origin not set");
            layer
        }
    }
}
