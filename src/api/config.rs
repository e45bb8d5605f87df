//! Runtime configuration read from environment variables.
//!
//! | Variable                | Default           |
//! |-------------------------|-------------------|
//! | `PORT`                  | 8081              |
//! | `DATABASE_URL`          | unset (in-memory) |
//! | `APP_ENV`               | production        |
//! | `JWT_SECRET`            | required in prod  |
//! | `CORS_ALLOWED_ORIGINS`  | unset (permissive)|
//! | `RATE_LIMIT_PER_MINUTE` | 100               |

use thiserror::Error;
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-secret-do-not-use-in-production-change-me-now";
const MIN_SECRET_LEN: usize = 32;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required in production")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
    #[error("JWT_SECRET must be at least 32 characters in production")]
    WeakSecret,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub app_env: String,
    pub jwt_secret: String,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "production".to_string());
        let is_development = app_env.eq_ignore_ascii_case("development");

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(s) => s,
            None if is_development => {
                warn!(
                    "JWT_SECRET not set! Using default secret for development. DO NOT USE IN PRODUCTION!"
                );
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        if jwt_secret.len() < MIN_SECRET_LEN {
            if is_development {
                warn!("JWT_SECRET is less than 32 characters. Consider using a longer secret.");
            } else {
                return Err(ConfigError::WeakSecret);
            }
        }

        let port = parse_or("PORT", lookup("PORT"), 8081u16)?;
        let rate_limit_per_minute = parse_or(
            "RATE_LIMIT_PER_MINUTE",
            lookup("RATE_LIMIT_PER_MINUTE"),
            100u32,
        )?;
        if rate_limit_per_minute == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_PER_MINUTE",
                value: "0".to_string(),
            });
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            app_env,
            jwt_secret,
            cors_allowed_origins,
            rate_limit_per_minute,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    /// Development configuration with in-memory storage, used by tests.
    pub fn development() -> Self {
        Self {
            port: 8081,
            database_url: None,
            app_env: "development".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cors_allowed_origins: Vec::new(),
            rate_limit_per_minute: 100,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::Invalid { name, value })
        }
    }
}
