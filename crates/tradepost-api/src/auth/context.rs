// Request-scoped principal storage
// The authenticated user rides in the request extensions under its own type,
// which keeps the key collision-proof and the value invisible to anything
// that wasn't handed this module.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Extensions;

use tradepost_storage::UserRow;

use super::middleware::AuthFailure;

/// The principal resolved for the current request. Wraps the full stored
/// row (handlers may need the id or email); sanitization happens at the
/// response boundary, never here.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRow);

/// Attach the principal to a request scope. Called exactly once per
/// request, by the authenticator middleware, after authentication succeeds.
pub fn attach_user(extensions: &mut Extensions, user: UserRow) {
    extensions.insert(CurrentUser(user));
}

/// Total retrieval: `None` means no authenticator ran (or none succeeded)
/// for this request. Callers decide whether that is fatal; handlers that
/// require a principal should take `CurrentUser` as an extractor instead.
pub fn resolve_user(extensions: &Extensions) -> Option<&CurrentUser> {
    extensions.get::<CurrentUser>()
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A missing principal past the middleware chain is an authentication
        // failure, not absent optional data.
        resolve_user(&parts.extensions)
            .cloned()
            .ok_or(AuthFailure::NoPrincipal)
    }
}
