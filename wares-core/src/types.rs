//! Wire types shared between the server and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Signup request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
///
/// The token is opaque to clients: they store it and echo it back in the
/// `Authorization` header, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthResponse {
    pub user: UserInfo,
    #[serde(rename = "jwtToken")]
    pub jwt_token: String,
}

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A catalog product.
///
/// Prices are integer cents to keep arithmetic and storage exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Render the price as dollars, e.g. `$12.99`.
    pub fn price_display(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

/// Request payload for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateProductRequest {
    pub name: String,
    pub price_cents: i64,
}

/// Error body returned by every failing API endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price_cents: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            price_cents,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_display_formats_cents() {
        assert_eq!(product(1299).price_display(), "$12.99");
        assert_eq!(product(5).price_display(), "$0.05");
        assert_eq!(product(700).price_display(), "$7.00");
    }

    #[test]
    fn test_auth_response_serializes_jwt_token_key() {
        let response = AuthResponse {
            user: UserInfo {
                id: "u-1".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                created_at: Utc::now(),
            },
            jwt_token: "tok".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["jwtToken"], "tok");
        assert!(json.get("jwt_token").is_none());
    }
}
