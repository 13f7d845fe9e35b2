use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres URL for the document store. `None` keeps everything in memory.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    /// Artificial delay applied to operations the dashboard treats as network calls.
    pub simulated_latency: Duration,
    pub body_limit_bytes: usize,
}

const DEFAULT_LATENCY_MS: u64 = 300;
const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@arreglio.local".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let latency_ms = env::var("SIMULATED_LATENCY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LATENCY_MS);
        let body_limit_bytes = env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_BODY_LIMIT);
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            admin_email,
            admin_password,
            simulated_latency: Duration::from_millis(latency_ms),
            body_limit_bytes,
        })
    }

    /// In-memory configuration with no artificial latency, used by tests and the seed tool.
    pub fn local(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: jwt_secret.into(),
            admin_email: "admin@arreglio.local".to_string(),
            admin_password: "admin123".to_string(),
            simulated_latency: Duration::ZERO,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}
