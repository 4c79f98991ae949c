//! User and authentication route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velour_core::UserId;

use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::User;
use crate::services::AuthService;
use crate::services::auth::ProfileUpdate;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Authenticated user response: the user plus a fresh bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

/// `POST /api/users/login` - Authenticate and issue a token.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let (user, token) = auth.login(&body.email, &body.password).await?;

    Ok(Json(AuthResponse { user, token }))
}

/// `POST /api/users` - Register a new account.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let (user, token) = auth.register(&body.name, &body.email, &body.password).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// `GET /api/users/profile` - The authenticated user's profile.
#[instrument(skip_all)]
pub async fn profile(RequireAuth(user): RequireAuth) -> Json<User> {
    Json(user)
}

/// `PUT /api/users/profile` - Update the authenticated user's profile.
#[instrument(skip(state, user, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let (user, token) = auth.update_profile(user.id, &body).await?;

    Ok(Json(AuthResponse { user, token }))
}

/// `GET /api/users` - List all users (admin).
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let users = auth.list_users().await?;

    Ok(Json(users))
}

/// `DELETE /api/users/{id}` - Delete a user (admin).
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    auth.delete_user(UserId::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
