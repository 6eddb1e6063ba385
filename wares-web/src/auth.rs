//! Authentication: JWT issuing and verification, password hashing, user
//! storage, and the signup/login/me handlers.

pub mod handlers;
pub mod jwt;
pub mod users;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use jwt::{AuthError, JwtService};

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Handlers that take an `AuthUser` argument reject unauthenticated requests
/// with a 401 JSON body before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = JwtService::verify_token(token)?;

        Ok(AuthUser {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        })
    }
}
