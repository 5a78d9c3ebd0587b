use std::env;

/// Which storage backend the server runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-process maps, ephemeral. For development and tests.
    Memory,
    /// PostgreSQL via sqlx.
    Postgres,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Reject ride status writes that skip the pending -> matched ->
    /// in_progress -> completed sequence. Off by default for wire
    /// compatibility with existing clients.
    pub strict_ride_transitions: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres,
            other => return Err(format!("Invalid STORAGE_BACKEND: {other}")),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when STORAGE_BACKEND=postgres".to_string());
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let strict_ride_transitions = env::var("STRICT_RIDE_TRANSITIONS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Config {
            server_host,
            server_port,
            storage_backend,
            database_url,
            allowed_origins,
            environment,
            strict_ride_transitions,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
