//! Server configuration loaded from environment variables.

use anyhow::{anyhow, Context};

use crate::services::auth::JwtConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_JWT_EXPIRY_DAYS: i64 = 7;

/// Runtime configuration.
///
/// | Env Var           | Required | Default                 |
/// |-------------------|----------|-------------------------|
/// | `DATABASE_URL`    | yes      |                         |
/// | `JWT_SECRET`      | yes      |                         |
/// | `HOST`            | no       | `0.0.0.0`               |
/// | `PORT`            | no       | `3000`                  |
/// | `JWT_EXPIRY_DAYS` | no       | `7`                     |
/// | `FRONTEND_URL`    | no       | `http://localhost:5173` |
/// | `RUN_MIGRATIONS`  | no       | `true`                  |
/// | `STREAK_TRACKING` | no       | `true`                  |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    /// Base URL used to build share links.
    pub frontend_url: String,
    pub run_migrations: bool,
    /// `false` turns streak tracking off even when the columns exist.
    pub streak_tracking: bool,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };

        let database_url = required("DATABASE_URL")?;
        let secret = required("JWT_SECRET")?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let expiry_days = match lookup("JWT_EXPIRY_DAYS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("JWT_EXPIRY_DAYS must be an integer, got {raw:?}"))?,
            None => DEFAULT_JWT_EXPIRY_DAYS,
        };

        let frontend_url = lookup("FRONTEND_URL")
            .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let run_migrations = parse_flag(lookup("RUN_MIGRATIONS"), "RUN_MIGRATIONS")?;
        let streak_tracking = parse_flag(lookup("STREAK_TRACKING"), "STREAK_TRACKING")?;

        Ok(Self {
            database_url,
            host,
            port,
            jwt: JwtConfig {
                secret,
                expiry_days,
            },
            frontend_url,
            run_migrations,
            streak_tracking,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Boolean flags default to on.
fn parse_flag(raw: Option<String>, key: &str) -> anyhow::Result<bool> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(true),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some(other) => Err(anyhow!("{key} must be a boolean, got {other:?}")),
    }
}
