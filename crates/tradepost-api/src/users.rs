// User lookup HTTP routes
// /users/me sits behind bearer authentication, /users/{id} behind API-key
// authentication, matching the two client populations.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use tradepost_contracts::User;
use tradepost_storage::UserDirectory;

use crate::auth::middleware::{require_api_key, require_bearer};
use crate::auth::{AuthState, CurrentUser};
use crate::error::ApiError;
use crate::services::{to_user, UserService};

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
}

impl AppState {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            service: Arc::new(UserService::new(directory)),
        }
    }
}

pub fn routes(state: AppState, auth_state: AuthState) -> Router {
    let bearer_routes = Router::new()
        .route("/users/me", get(get_me))
        .route_layer(from_fn_with_state(auth_state.clone(), require_bearer))
        .with_state(state.clone());

    let api_key_routes = Router::new()
        .route("/users/{id}", get(get_user))
        .route_layer(from_fn_with_state(auth_state, require_api_key))
        .with_state(state);

    bearer_routes.merge(api_key_routes)
}

/// GET /api/v1/users/me - The authenticated user's own record
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Authentication failed", body = tradepost_contracts::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(to_user(&user))
}

/// GET /api/v1/users/{id} - Look up a user by ID (machine clients)
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(
        ("id" = String, Path, description = "User ID (UUID format)")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Invalid user ID format", body = tradepost_contracts::ErrorResponse),
        (status = 401, description = "Authentication failed", body = tradepost_contracts::ErrorResponse),
        (status = 404, description = "User not found", body = tradepost_contracts::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid user ID format"))?;

    match state.service.get(id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::NotFound("User not found")),
        Err(err) => {
            tracing::error!("failed to retrieve user {id}: {err:#}");
            Err(ApiError::Internal)
        }
    }
}
