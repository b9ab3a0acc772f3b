// Request authenticators: bearer-token and API-key variants
// Both resolve a principal and attach it to the request scope before any
// handler runs; every failure terminates the request with a fixed message.
// The resolve_* functions decide *what* failed; AuthFailure's IntoResponse
// impl is the only place that knows how failures are serialized.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use tradepost_contracts::ErrorResponse;
use tradepost_storage::{UserDirectory, UserRow};

use super::context::attach_user;
use super::jwt::{TokenError, TokenService};
use super::service::AuthService;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared authentication state: the directory, the token service, and the
/// credential service, all constructed once at startup.
#[derive(Clone)]
pub struct AuthState {
    pub directory: Arc<dyn UserDirectory>,
    pub tokens: Arc<TokenService>,
    pub service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        jwt_secret: &str,
        token_ttl: std::time::Duration,
    ) -> anyhow::Result<Self> {
        let tokens = Arc::new(TokenService::new(jwt_secret));
        let service = Arc::new(AuthService::new(
            directory.clone(),
            tokens.clone(),
            token_ttl,
        )?);
        Ok(Self {
            directory,
            tokens,
            service,
        })
    }
}

/// What went wrong while authenticating a request. Carries the failure
/// kind only; the status code and client message are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No Authorization header at all
    MissingAuthHeader,
    /// Header present but not exactly `Bearer <token>`
    MalformedAuthHeader,
    /// Token failed verification for any non-expiry reason
    InvalidToken,
    /// Token verified but its lifetime is over
    TokenExpired,
    /// Token subject is not a parseable user ID
    UnparseableSubject,
    /// Token subject no longer maps to a user
    PrincipalNotFound,
    /// No X-API-Key header
    MissingApiKey,
    /// Key is not mapped to any user
    InvalidApiKey,
    /// The directory failed while resolving the principal
    StoreUnavailable,
    /// A handler required a principal but no authenticator attached one
    NoPrincipal,
}

impl AuthFailure {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthFailure::UnparseableSubject | AuthFailure::StoreUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::MissingAuthHeader => "authorization header missing",
            AuthFailure::MalformedAuthHeader => "invalid authorization header format",
            AuthFailure::InvalidToken => "invalid token",
            AuthFailure::TokenExpired => "token expired",
            AuthFailure::UnparseableSubject => "error parsing user ID from token",
            AuthFailure::PrincipalNotFound => "user not found",
            AuthFailure::MissingApiKey => "API key required",
            AuthFailure::InvalidApiKey => "Invalid API key",
            AuthFailure::StoreUnavailable => "error retrieving user",
            AuthFailure::NoPrincipal => "no authenticated user found in context",
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::message(self.message()))).into_response()
    }
}

/// Bearer-token middleware: verify the session token, resolve its subject
/// through the directory, attach the principal, and hand off.
pub async fn require_bearer(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthFailure> {
    let user = resolve_bearer_user(
        state.directory.as_ref(),
        &state.tokens,
        req.headers(),
        Utc::now(),
    )
    .await?;

    attach_user(req.extensions_mut(), user);
    Ok(next.run(req).await)
}

/// API-key middleware: look the key up in the directory and attach its
/// owner. No expiry semantics; validity is solely the store mapping.
pub async fn require_api_key(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthFailure> {
    let user = resolve_api_key_user(state.directory.as_ref(), req.headers()).await?;

    attach_user(req.extensions_mut(), user);
    Ok(next.run(req).await)
}

pub async fn resolve_bearer_user(
    directory: &dyn UserDirectory,
    tokens: &TokenService,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<UserRow, AuthFailure> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedAuthHeader)?;

    let parts: Vec<&str> = auth_header.split(' ').collect();
    if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::MalformedAuthHeader);
    }

    let subject = match tokens.verify(parts[1], now) {
        Ok(subject) => subject,
        Err(TokenError::Expired) => return Err(AuthFailure::TokenExpired),
        Err(_) => return Err(AuthFailure::InvalidToken),
    };

    let user_id = Uuid::parse_str(&subject).map_err(|_| AuthFailure::UnparseableSubject)?;

    match directory.user_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AuthFailure::PrincipalNotFound),
        Err(err) => {
            tracing::error!("failed to resolve principal {user_id}: {err}");
            Err(AuthFailure::StoreUnavailable)
        }
    }
}

pub async fn resolve_api_key_user(
    directory: &dyn UserDirectory,
    headers: &HeaderMap,
) -> Result<UserRow, AuthFailure> {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty())
        .ok_or(AuthFailure::MissingApiKey)?;

    match directory.user_by_api_key(api_key).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(AuthFailure::InvalidApiKey),
        Err(err) => {
            tracing::error!("failed to resolve API key owner: {err}");
            Err(AuthFailure::StoreUnavailable)
        }
    }
}
