// Session token issuance and verification
// Decision: HS256 only; any other algorithm in the header is rejected outright
// (algorithm-confusion defence). Expiry is checked against a caller-supplied
// clock so the logic is deterministically testable.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const TOKEN_ISSUER: &str = "tradepost";

/// Why a token was rejected. Each kind maps to a distinct client-facing
/// signal: "expired" is retriable by logging in again, the rest are not
/// worth distinguishing for the client but are for logs and tests.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token expired")]
    Expired,

    #[error("unexpected signing algorithm")]
    AlgorithmMismatch,

    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Issues and verifies the signed session tokens returned by login.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Build a signed token for the subject, valid from `now` for `ttl`.
    pub fn issue(
        &self,
        subject: Uuid,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Sign)
    }

    /// Parse and verify a token, returning the subject claim.
    /// Signature and algorithm are checked by the library; expiry is checked
    /// here against the injected `now`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the injected clock below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::AlgorithmMismatch
                }
                _ => TokenError::Malformed,
            }
        })?;

        if now.timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let svc = service();
        let subject = Uuid::new_v4();
        let now = fixed_now();

        let token = svc.issue(subject, now, Duration::hours(1)).unwrap();
        let sub = svc.verify(&token, now).unwrap();
        assert_eq!(sub, subject.to_string());
    }

    #[test]
    fn test_verify_after_expiry_fails_with_expired() {
        let svc = service();
        let now = fixed_now();
        let token = svc.issue(Uuid::new_v4(), now, Duration::hours(1)).unwrap();

        let err = svc
            .verify(&token, now + Duration::hours(1) + Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, TokenError::Expired));

        // Still valid at the boundary itself
        assert!(svc.verify(&token, now + Duration::hours(1)).is_ok());
    }

    #[test]
    fn test_verify_with_wrong_secret_fails_with_signature_invalid() {
        let now = fixed_now();
        let token = service()
            .issue(Uuid::new_v4(), now, Duration::hours(1))
            .unwrap();

        let other = TokenService::new("different-secret");
        let err = other.verify(&token, now).unwrap_err();
        assert!(matches!(err, TokenError::SignatureInvalid));
    }

    #[test]
    fn test_verify_garbage_fails_with_malformed() {
        let svc = service();
        for garbage in ["", "not-a-token", "a.b", "a.b.c"] {
            let err = svc.verify(garbage, fixed_now()).unwrap_err();
            assert!(
                matches!(err, TokenError::Malformed),
                "token {garbage:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_verify_rejects_non_hs256_algorithm() {
        let now = fixed_now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = service().verify(&token, now).unwrap_err();
        assert!(matches!(err, TokenError::AlgorithmMismatch));
    }

    #[test]
    fn test_issued_token_carries_issuer_and_times() {
        let svc = service();
        let now = fixed_now();
        let token = svc.issue(Uuid::new_v4(), now, Duration::hours(2)).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.iss, TOKEN_ISSUER);
        assert_eq!(data.claims.iat, now.timestamp());
        assert_eq!(data.claims.exp, (now + Duration::hours(2)).timestamp());
    }
}
