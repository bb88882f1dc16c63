//! Models that represent user accounts and authentication payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::UserId;
use crate::validation::rules;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a user account, including gamification state.
pub struct User {
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique, lower-cased email address.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Accumulated experience points, never negative.
    pub xp: i64,
    /// Derived from `xp`; see [`crate::services::xp::level_for_xp`].
    pub level: i32,
    /// Cached result of the last streak recomputation.
    pub current_streak: i32,
    pub best_streak: i32,
    pub last_activity: Option<DateTime<Utc>>,
    pub last_streak_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Constructs a fresh account with zeroed progress.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            xp: 0,
            level: 1,
            current_streak: 0,
            best_streak: 0,
            last_activity: None,
            last_streak_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Payload for registering a new account.
pub struct SignupRequest {
    #[validate(custom(function = "rules::validate_username"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Trims the username and lower-cases the email before validation.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    /// Username or email address.
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Authentication tokens returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub xp: i64,
    pub level: i32,
    pub current_streak: i32,
    pub best_streak: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            xp: user.xp,
            level: user.level,
            current_streak: user.current_streak,
            best_streak: user.best_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        let value = serde_json::to_value(&user).expect("serialize");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["level"], 1);
        assert_eq!(value["xp"], 0);
    }

    #[test]
    fn login_request_accepts_email_key() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.io","password":"pw"}"#).expect("deserialize");
        assert_eq!(req.username, "a@b.io");
    }

    #[test]
    fn signup_normalization_lowercases_email() {
        let req = SignupRequest {
            username: "  learner_1 ".into(),
            email: " Learner@Example.COM ".into(),
            password: "secret1".into(),
        }
        .normalized();
        assert_eq!(req.username, "learner_1");
        assert_eq!(req.email, "learner@example.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn signup_rejects_bad_email_and_short_username() {
        let req = SignupRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "secret1".into(),
        };
        let errors = req.validate().expect_err("invalid payload");
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
    }
}
