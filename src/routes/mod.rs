pub mod cats;
pub mod favorites;
pub mod system;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{middleware::auth::require_auth, services::cats::IMAGES_ROUTE, AppState};

/// Error half of every handler's `Result`: a status and `{"error": "..."}`.
pub type ApiError = (StatusCode, Json<Value>);

pub fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    error(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    error(StatusCode::NOT_FOUND, message)
}

pub fn conflict(message: impl Into<String>) -> ApiError {
    error(StatusCode::CONFLICT, message)
}

/// Logs the cause and hides it from the client.
pub fn internal_error(e: anyhow::Error) -> ApiError {
    tracing::error!("internal error: {e:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

pub fn build_router(state: AppState) -> Router {
    let gate = from_fn_with_state(state.tokens.clone(), require_auth);

    // Everything here sees `AuthenticatedUser` in the request extensions.
    let protected = Router::new()
        .route("/login", get(users::check_auth))
        .route(
            "/auth/favorites",
            get(favorites::list_favorites)
                .post(favorites::add_favorite)
                .delete(favorites::remove_favorite),
        )
        .route_layer(gate);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    Router::new()
        .route("/health", get(system::health_check))
        .route("/metrics", get(system::metrics_handler))
        // Users
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route("/user/{id}", get(users::get_user))
        // Cats
        .route("/cat", get(cats::list_cats).post(cats::create_cat).put(cats::update_cat))
        .route("/cat/id/{id}", get(cats::get_cat).delete(cats::delete_cat))
        .merge(protected)
        .nest_service(IMAGES_ROUTE, ServeDir::new(&state.config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Image uploads
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
