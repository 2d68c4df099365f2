use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::{
    db::is_unique_violation,
    models::{
        auth::{AuthenticatedUser, TokenResponse},
        user::{CreateUserRequest, FullName, LoginRequest, UserData},
    },
    routes::{bad_request, conflict, internal_error, not_found, ApiError},
    services::{
        metrics::{LOGINS_COUNTER, SIGNUPS_COUNTER},
        users::{validate_signup, UserService},
    },
    AppState,
};

/// POST /signup — register and receive an access token.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = body.email.trim();
    validate_signup(email, &body.password).map_err(bad_request)?;
    let full_name: FullName = body
        .full_name
        .parse()
        .map_err(|e: anyhow::Error| bad_request(e.to_string()))?;

    if UserService::email_exists(&state.db, email)
        .await
        .map_err(internal_error)?
    {
        return Err(conflict("user already exists"));
    }

    let user = UserService::create(
        &state.db,
        email,
        &body.password,
        &full_name,
        state.config.bcrypt_cost,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            conflict("user already exists")
        } else {
            internal_error(e)
        }
    })?;

    let access_token = state.tokens.issue(user.id).map_err(internal_error)?;

    SIGNUPS_COUNTER.inc();
    info!("signup: created user_id={}", user.id);

    Ok(Json(TokenResponse {
        id: user.id,
        access_token,
    }))
}

/// POST /login — exchange email and password for an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = UserService::check_credentials(&state.db, body.email.trim(), &body.password)
        .await
        .map_err(internal_error)?;

    let Some(user) = user else {
        LOGINS_COUNTER.with_label_values(&["failure"]).inc();
        info!("login: rejected credentials");
        return Err(bad_request("invalid email or password"));
    };

    let access_token = state.tokens.issue(user.id).map_err(internal_error)?;
    LOGINS_COUNTER.with_label_values(&["success"]).inc();
    info!("login: user_id={}", user.id);

    Ok(Json(TokenResponse {
        id: user.id,
        access_token,
    }))
}

/// GET /login — confirm the presented token still belongs to an existing user
/// and hand back a fresh one.
pub async fn check_auth(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TokenResponse>, ApiError> {
    if !UserService::exists(&state.db, user.user_id)
        .await
        .map_err(internal_error)?
    {
        return Err(not_found("user not exists"));
    }

    let access_token = state.tokens.issue(user.user_id).map_err(internal_error)?;
    Ok(Json(TokenResponse {
        id: user.user_id,
        access_token,
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserData>, ApiError> {
    UserService::get_data(&state.db, id)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("user not exists"))
}
