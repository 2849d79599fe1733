use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::routes::AppState;

/// Tokens expire 7 days after issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = verify_token(token, &state.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// `Authorization: Bearer <token>` → `<token>`
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    /// Bad signature, malformed or expired.
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "No token provided",
            AuthError::InvalidToken => "Invalid token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

pub fn create_token(
    user_id: &str,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    // No grace period past `exp`
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "test-secret";

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/deadlines");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn token_resolves_to_the_same_user() {
        let token = create_token("user-1", "ada@example.com", SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn wrong_secret_and_garbage_are_invalid() {
        let token = create_token("user-1", "ada@example.com", SECRET).unwrap();
        assert_eq!(verify_token(&token, "other-secret").unwrap_err(), AuthError::InvalidToken);
        assert_eq!(verify_token("not.a.jwt", SECRET).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn expired_token_is_invalid() {
        let issued = Utc::now() - Duration::days(8);
        let claims = Claims {
            sub: "user-1".into(),
            email: "ada@example.com".into(),
            iat: issued.timestamp(),
            exp: (issued + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify_token(&token, SECRET).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
