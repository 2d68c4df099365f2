use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    db::is_unique_violation,
    models::cat::{Cat, UpdateCatRequest},
    routes::{bad_request, conflict, error, internal_error, not_found, ApiError},
    services::cats::{validate_update, CatFormError, CatService},
    AppState,
};

/// POST /cat — multipart form with `breed`, `fur`, `temper`,
/// `care_complexity` and a JPEG `image`.
pub async fn create_cat(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Cat>), ApiError> {
    let upload_dir = &state.config.upload_dir;

    let new_cat = CatService::read_form(upload_dir, multipart)
        .await
        .map_err(|e| match e {
            CatFormError::Io(ref io) => {
                tracing::error!("create_cat: {io}");
                error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            _ => bad_request(e.to_string()),
        })?;

    let exists = CatService::breed_exists(&state.db, &new_cat.breed).await;
    if !matches!(exists, Ok(false)) {
        CatService::discard_image(upload_dir, &new_cat.image_path).await;
        return Err(match exists {
            Ok(_) => conflict("cat already exists"),
            Err(e) => internal_error(e),
        });
    }

    match CatService::create(&state.db, &new_cat).await {
        Ok(cat) => {
            info!("create_cat: id={} breed={}", cat.id, cat.breed);
            Ok((StatusCode::CREATED, Json(cat)))
        }
        Err(e) => {
            CatService::discard_image(upload_dir, &new_cat.image_path).await;
            if is_unique_violation(&e) {
                Err(conflict("cat already exists"))
            } else {
                Err(internal_error(e))
            }
        }
    }
}

/// PUT /cat
pub async fn update_cat(
    State(state): State<AppState>,
    Json(body): Json<UpdateCatRequest>,
) -> Result<Json<Cat>, ApiError> {
    validate_update(&body).map_err(|e| bad_request(e.to_string()))?;

    CatService::update(&state.db, &body)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                conflict("cat already exists")
            } else {
                internal_error(e)
            }
        })?
        .map(Json)
        .ok_or_else(|| not_found("cat not found"))
}

/// DELETE /cat/id/{id}
pub async fn delete_cat(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let image_path = CatService::delete(&state.db, id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| not_found("cat not found"))?;

    CatService::discard_image(&state.config.upload_dir, &image_path).await;
    info!("delete_cat: id={id}");
    Ok(Json(json!({ "message": "success" })))
}

/// GET /cat/id/{id}
pub async fn get_cat(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Cat>, ApiError> {
    CatService::get(&state.db, id)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("cat not found"))
}

/// GET /cat
pub async fn list_cats(State(state): State<AppState>) -> Result<Json<Vec<Cat>>, ApiError> {
    CatService::list(&state.db)
        .await
        .map(Json)
        .map_err(internal_error)
}
