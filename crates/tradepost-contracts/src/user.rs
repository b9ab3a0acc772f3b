// User DTOs and request validation
// Decision: One validation strategy, hand-rolled per DTO; rules live next to the type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::ValidationErrors;

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 50;
const PASSWORD_MIN_CHARS: usize = 8;
// Hashing cost grows with input size; cap the secret length.
const PASSWORD_MAX_CHARS: usize = 72;

/// User as returned by the API. Omits the password hash and API key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "longenoughpw")]
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username_chars = self.username.chars().count();
        if self.username.trim().is_empty() {
            errors.add("username", "username must be provided");
        } else if username_chars < USERNAME_MIN_CHARS {
            errors.add("username", "username must be at least 3 characters long");
        } else if username_chars > USERNAME_MAX_CHARS {
            errors.add(
                "username",
                "username must not be more than 50 characters long",
            );
        }

        if self.email.trim().is_empty() {
            errors.add("email", "email must be provided");
        } else if !is_plausible_email(&self.email) {
            errors.add("email", "email must be a valid email address");
        }

        validate_password(&self.password, &mut errors);

        errors.into_result()
    }
}

/// Request to log in with email and password
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginUserRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "longenoughpw")]
    pub password: String,
}

impl LoginUserRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.email.trim().is_empty() {
            errors.add("email", "email must be provided");
        } else if !is_plausible_email(&self.email) {
            errors.add("email", "email must be a valid email address");
        }

        validate_password(&self.password, &mut errors);

        errors.into_result()
    }
}

/// Successful login response: the session token plus the sanitized user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginUserResponse {
    pub token: String,
    pub user: User,
}

fn validate_password(password: &str, errors: &mut ValidationErrors) {
    let chars = password.chars().count();
    if password.trim().is_empty() {
        errors.add("password", "password must be provided");
    } else if chars < PASSWORD_MIN_CHARS {
        errors.add("password", "password must be at least 8 characters long");
    } else if chars > PASSWORD_MAX_CHARS {
        errors.add(
            "password",
            "password must not be more than 72 characters long",
        );
    }
}

/// Cheap structural check: one '@' with a dotted, non-empty domain.
/// Deliverability is the mail server's problem, not ours.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
        }
        None => false,
    }
}
