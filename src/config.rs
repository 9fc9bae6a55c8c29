use std::{env, fmt, str::FromStr, time::Duration};

use anyhow::Context;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Lifetime of issued session tokens.
    pub token_ttl: Duration,
    /// Upper bound on a single store call before the request fails with 504.
    pub store_timeout: Duration,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_or("APP_PORT", 3000);
        let token_ttl = Duration::from_secs(env_or("TOKEN_TTL_SECS", 3600));
        let store_timeout = Duration::from_millis(env_or("STORE_TIMEOUT_MS", 5000));
        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 10);
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            token_ttl,
            store_timeout,
            max_connections,
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("store_timeout", &self.store_timeout)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}
