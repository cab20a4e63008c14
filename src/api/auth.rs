// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: sign-up, login, token refresh and the user directory.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{Auth, RefreshAuth},
    error::ApiError,
    models::{AccessTokenResponse, LoginRequest, SignUpRequest, TokenPairResponse, UserSummary},
    state::AppState,
};

const BEARER: &str = "bearer";

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "User created", body = UserSummary),
        (status = 409, description = "Username or email already exists"),
        (status = 422, description = "Empty username, email or password")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let user = state.auth_service().sign_up(request)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Access and refresh token", body = TokenPairResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state
        .auth_service()
        .login(&request.username, &request.password)?;

    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: BEARER.to_string(),
    }))
}

/// Trade a refresh token (sent as the bearer token) for a new access token.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Missing, invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshAuth(refresh_token): RefreshAuth,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let access_token = state.auth_service().refresh(&refresh_token)?;

    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: BEARER.to_string(),
    }))
}

/// The authenticated caller's own account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserSummary),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserSummary>, ApiError> {
    let stored = state.auth_service().current_user(&user)?;
    Ok(Json(stored.into()))
}

/// List every registered user. Staff only.
#[utoipa::path(
    get,
    path = "/api/auth/all",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = [UserSummary]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller is not staff")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = state.auth_service().list_users(&user)?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
