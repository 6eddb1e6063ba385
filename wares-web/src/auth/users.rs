//! User accounts: password hashing, SQLite-backed storage, and the
//! signup/login service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{error, info, warn};
use uuid::Uuid;
use wares_core::{AuthResponse, LoginRequest, SignupRequest, UserInfo};

use super::jwt::{AuthError, JwtService};

/// Hash a password with Argon2
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AuthError::Internal
        })
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// A stored user account, including the password hash.
#[derive(Debug, Clone)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserData {
    pub fn new(name: String, email: String, password: &str) -> Result<Self, AuthError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }

    /// Public view, without the password hash
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// SQLite-backed user storage
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to check email: {}", e);
                AuthError::Internal
            })?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    pub async fn insert_user(&self, user: &UserData) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert user: {}", e);
            AuthError::Internal
        })?;

        Ok(())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserData>, AuthError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to look up user by email: {}", e);
            AuthError::Internal
        })?;

        row.map(row_to_user).transpose()
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<UserData>, AuthError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to look up user by id: {}", e);
            AuthError::Internal
        })?;

        row.map(row_to_user).transpose()
    }
}

fn row_to_user(row: SqliteRow) -> Result<UserData, AuthError> {
    let created_at: String = row.get("created_at");
    let created_at = created_at.parse::<DateTime<Utc>>().map_err(|e| {
        error!("Corrupt created_at in users table: {}", e);
        AuthError::Internal
    })?;

    Ok(UserData {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at,
    })
}

/// Signup and login on top of [`UserStore`]
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
}

impl UserService {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// Register a new account. Does not log the user in.
    pub async fn signup(&self, request: SignupRequest) -> Result<UserInfo, AuthError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AuthError::MissingCredentials);
        }

        if self.store.email_exists(&request.email).await? {
            return Err(AuthError::EmailTaken);
        }

        let user = UserData::new(request.name, request.email, &request.password)?;
        self.store.insert_user(&user).await?;

        info!("Registered new user: {}", user.email);
        Ok(user.to_user_info())
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .store
            .get_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password) {
            warn!("Failed login attempt for {}", request.email);
            return Err(AuthError::InvalidCredentials);
        }

        let token =
            JwtService::generate_token(user.id.clone(), user.name.clone(), user.email.clone())?;

        info!("User logged in: {}", user.email);
        Ok(AuthResponse {
            user: user.to_user_info(),
            jwt_token: token,
        })
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<UserData>, AuthError> {
        self.store.get_user_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_user_info_has_no_password_hash() {
        let user = UserData::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "hunter2",
        )
        .unwrap();

        let info = user.to_user_info();
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "alice@example.com");
    }
}
