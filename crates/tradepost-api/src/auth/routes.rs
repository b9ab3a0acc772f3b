// Registration and login HTTP routes

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use tradepost_contracts::{CreateUserRequest, LoginUserRequest, LoginUserResponse, User};

use crate::error::ApiError;
use crate::services::to_user;

use super::middleware::AuthState;
use super::service::{LoginError, RegistrationError};

pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .with_state(state)
}

/// POST /api/v1/auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 409, description = "Username or email already taken", body = tradepost_contracts::ErrorResponse),
        (status = 422, description = "Validation failed", body = tradepost_contracts::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_user(
    State(state): State<AuthState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    req.validate()?;

    let user = state.service.register(&req).await.map_err(|e| match e {
        RegistrationError::UserAlreadyExists => {
            ApiError::Conflict("a user with this email or username already exists")
        }
        RegistrationError::Internal(err) => {
            tracing::error!("failed to register user: {err:#}");
            ApiError::Internal
        }
    })?;

    Ok((StatusCode::CREATED, Json(to_user(&user))))
}

/// POST /api/v1/auth/login - Authenticate and receive a session token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginUserResponse),
        (status = 401, description = "Invalid credentials", body = tradepost_contracts::ErrorResponse),
        (status = 422, description = "Validation failed", body = tradepost_contracts::ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login_user(
    State(state): State<AuthState>,
    Json(req): Json<LoginUserRequest>,
) -> Result<Json<LoginUserResponse>, ApiError> {
    req.validate()?;

    let (token, user) = state
        .service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            LoginError::InvalidCredentials => ApiError::Unauthorized("invalid email or password"),
            LoginError::Internal(err) => {
                tracing::error!("failed to log user in: {err:#}");
                ApiError::Internal
            }
        })?;

    Ok(Json(LoginUserResponse {
        token,
        user: to_user(&user),
    }))
}
