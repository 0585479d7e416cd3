/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// History entries retained per entity (default: `1000`).
    pub history_cap: usize,
    /// Seconds without a check-in before an online device is considered
    /// stale (default: `300`).
    pub stale_after_secs: u64,
    /// How often the staleness sweeper runs, in seconds (default: `30`).
    pub stale_check_interval_secs: u64,
    /// Simulated per-stage delay for background jobs, in milliseconds
    /// (default: `2000`).
    pub stage_delay_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `8000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `HISTORY_CAP`              | `1000`                     |
    /// | `STALE_AFTER_SECS`         | `300`                      |
    /// | `STALE_CHECK_INTERVAL_SECS`| `30`                       |
    /// | `STAGE_DELAY_MS`           | `2000`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let history_cap: usize = std::env::var("HISTORY_CAP")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("HISTORY_CAP must be a valid usize");

        let stale_after_secs: u64 = std::env::var("STALE_AFTER_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("STALE_AFTER_SECS must be a valid u64");

        let stale_check_interval_secs: u64 = std::env::var("STALE_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("STALE_CHECK_INTERVAL_SECS must be a valid u64");

        let stage_delay_ms: u64 = std::env::var("STAGE_DELAY_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("STAGE_DELAY_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            history_cap,
            stale_after_secs,
            stale_check_interval_secs,
            stage_delay_ms,
        }
    }
}
