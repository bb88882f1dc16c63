use anyhow::{anyhow, bail};
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-this-in-production";
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 7 * 24 * 60;
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 10 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub access_token_expiration_minutes: u64,
    pub refresh_token_expiration_days: u64,
    pub time_zone: Tz,
    pub cors_allow_origins: Vec<String>,
    pub server_port: u16,
    pub password_min_length: usize,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/studybuddy".to_string());

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10);
        let database_acquire_timeout_seconds = parse_env("DATABASE_ACQUIRE_TIMEOUT_SECONDS", 5);

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

        let access_token_expiration_minutes = ensure_ttl(
            "ACCESS_TOKEN_EXPIRATION_MINUTES",
            parse_env("ACCESS_TOKEN_EXPIRATION_MINUTES", 60),
            MAX_ACCESS_TOKEN_MINUTES,
        )?;
        let refresh_token_expiration_days = ensure_ttl(
            "REFRESH_TOKEN_EXPIRATION_DAYS",
            parse_env("REFRESH_TOKEN_EXPIRATION_DAYS", 30),
            MAX_REFRESH_TOKEN_DAYS,
        )?;

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|_| default_origins());

        let server_port = parse_env("SERVER_PORT", 5000);
        let password_min_length = parse_env("PASSWORD_MIN_LENGTH", 6);

        Ok(Config {
            database_url,
            database_max_connections,
            database_acquire_timeout_seconds,
            jwt_secret,
            access_token_expiration_minutes,
            refresh_token_expiration_days,
            time_zone,
            cors_allow_origins,
            server_port,
            password_min_length,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Access token lifetime, clamped to `1..=MAX_ACCESS_TOKEN_MINUTES` for
    /// configs that did not come through [`Config::load`].
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(clamp_ttl(
            self.access_token_expiration_minutes,
            MAX_ACCESS_TOKEN_MINUTES,
        ))
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(clamp_ttl(
            self.refresh_token_expiration_days,
            MAX_REFRESH_TOKEN_DAYS,
        ))
    }
}

fn ensure_ttl(key: &str, value: u64, max: i64) -> anyhow::Result<u64> {
    match i64::try_from(value) {
        Ok(v) if (1..=max).contains(&v) => Ok(value),
        _ => bail!("{} must be between 1 and {}, got {}", key, max, value),
    }
}

fn clamp_ttl(value: u64, max: i64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX).clamp(1, max)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_origins() -> Vec<String> {
    vec![
        "http://127.0.0.1:5500".into(),
        "http://localhost:5500".into(),
        "http://127.0.0.1:8000".into(),
    ]
}
