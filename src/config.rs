/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, Auth 設定, HTTP 制限など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_leeway_seconds: u64,
    pub access_jwt_public_key_pem: String,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

const DEFAULT_SQIDS_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        // Unset → default, set but unparsable → error
        fn parsed<T: std::str::FromStr>(
            raw: Option<String>,
            key: &'static str,
            default: T,
        ) -> Result<T, ConfigError> {
            match raw {
                None => Ok(default),
                Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
            }
        }

        let port: u16 = parsed(lookup("PORT"), "PORT", 3000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let database_url = required("DATABASE_URL")?;
        let database_max_connections =
            parsed(lookup("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10)?;

        let sqids_min_length = parsed(lookup("SQIDS_MIN_LENGTH"), "SQIDS_MIN_LENGTH", 10)?;
        let sqids_alphabet =
            lookup("SQIDS_ALPHABET").unwrap_or_else(|| DEFAULT_SQIDS_ALPHABET.to_string());

        let auth_issuer = required("AUTH_ISSUER")?;
        let auth_audience = required("AUTH_AUDIENCE")?;
        let access_token_leeway_seconds = parsed(
            lookup("ACCESS_TOKEN_LEEWAY_SECONDS"),
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            60,
        )?;
        let access_jwt_public_key_pem =
            required("ACCESS_JWT_PUBLIC_KEY_PEM")?.replace("\\n", "\n");

        let timeout_secs: u64 =
            parsed(lookup("REQUEST_TIMEOUT_SECONDS"), "REQUEST_TIMEOUT_SECONDS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }
        let request_body_limit_bytes = parsed(
            lookup("REQUEST_BODY_LIMIT_BYTES"),
            "REQUEST_BODY_LIMIT_BYTES",
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            sqids_min_length,
            sqids_alphabet,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_jwt_public_key_pem,
            request_timeout: Duration::from_secs(timeout_secs),
            request_body_limit_bytes,
        })
    }
}
