use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    db::is_foreign_key_violation,
    models::{
        auth::AuthenticatedUser,
        favorite::{Favorite, FavoriteCat, FavoriteRequest},
    },
    routes::{conflict, internal_error, not_found, ApiError},
    services::{cats::CatService, favorites::FavoriteService},
    AppState,
};

/// GET /auth/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<FavoriteCat>>, ApiError> {
    FavoriteService::list(&state.db, user.user_id)
        .await
        .map(Json)
        .map_err(internal_error)
}

/// POST /auth/favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    if !CatService::exists(&state.db, body.cat_id)
        .await
        .map_err(internal_error)?
    {
        return Err(not_found("cat not found"));
    }

    // The cat can be deleted between the check and the insert.
    let favorite = FavoriteService::add(&state.db, user.user_id, body.cat_id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                not_found("cat not found")
            } else {
                internal_error(e)
            }
        })?
        .ok_or_else(|| conflict("cat already in favorites"))?;

    info!("add_favorite: user_id={} cat_id={}", user.user_id, body.cat_id);
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /auth/favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<Value>, ApiError> {
    let removed = FavoriteService::remove(&state.db, user.user_id, body.cat_id)
        .await
        .map_err(internal_error)?;
    if !removed {
        return Err(not_found("cat is not in favorites"));
    }

    info!("remove_favorite: user_id={} cat_id={}", user.user_id, body.cat_id);
    Ok(Json(json!({ "status": "success" })))
}
