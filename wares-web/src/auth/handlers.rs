//! HTTP handlers for signup, login, and the current-user lookup.

use axum::{extract::State, http::StatusCode, response::Json, Json as JsonExtractor};
use tracing::info;
use wares_core::{AuthResponse, ErrorBody, LoginRequest, SignupRequest, UserInfo};

use super::jwt::AuthError;
use super::AuthUser;
use crate::state::AppState;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserInfo),
        (status = 400, description = "Missing name, email, or password", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<SignupRequest>,
) -> Result<(StatusCode, Json<UserInfo>), AuthError> {
    info!("Signup attempt for: {}", request.email);

    let user = state.user_service.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    info!("Login attempt for: {}", request.email);

    let response = state.user_service.login(request).await?;
    Ok(Json(response))
}

/// Get the account behind the presented token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserInfo>, AuthError> {
    let data = state
        .user_service
        .get_user_by_id(&user.id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(Json(data.to_user_info()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppState, WebConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn create_test_app() -> Router {
        let state = AppState::new(WebConfig::default()).await.unwrap();
        Router::new()
            .route("/auth/signup", post(signup))
            .route("/auth/login", post(login))
            .route("/auth/me", get(me))
            .with_state(state)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_signup_creates_account() {
        let app = create_test_app().await;

        let response = app
            .oneshot(json_request(
                "/auth/signup",
                json!({"name": "Alice", "email": "alice@example.com", "password": "hunter2"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let app = create_test_app().await;
        let body = json!({"name": "Alice", "email": "alice@example.com", "password": "hunter2"});

        let first = app
            .clone()
            .oneshot(json_request("/auth/signup", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app.oneshot(json_request("/auth/signup", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_user() {
        let app = create_test_app().await;

        let response = app
            .oneshot(json_request(
                "/auth/login",
                json!({"email": "ghost@example.com", "password": "nope"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
