//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Redis configuration for chat presence
    #[serde(default)]
    pub redis: RedisSettings,

    /// Caller identity settings
    pub auth: AuthSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Storage backend selection
    pub storage: StorageSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL. Required by the `postgres` backend.
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// Redis configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisSettings {
    /// Redis connection URL. Presence is kept in-process when unset.
    pub url: Option<String>,
}

/// Caller identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret used to verify bearer tokens
    pub jwt_secret: String,

    /// Accept the caller id from `user_id_header` without verification.
    /// Only safe behind an upstream gateway that sets the header itself.
    pub trust_user_id_header: bool,

    /// Name of the trusted identity header
    pub user_id_header: String,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine/worker ID (0-31)
    pub machine_id: u16,

    /// Custom epoch timestamp in milliseconds
    pub epoch: u64,
}

/// Where friend relations, chat rooms and playlist bindings live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. An empty list allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the resulting settings are inconsistent (see [`Settings::validate`]).
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.trust_user_id_header", false)?
            .set_default("auth.user_id_header", "UserId")?
            .set_default("snowflake.machine_id", 1)?
            .set_default("snowflake.epoch", 1672531200000_u64)? // 2023-01-01
            .set_default("storage.backend", "postgres")?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=8080 -> server.port = 8080
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("storage.backend", std::env::var("STORAGE_BACKEND").ok())?
            .set_override_option(
                "snowflake.machine_id",
                std::env::var("SNOWFLAKE_MACHINE_ID").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate().map(|_| settings))
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // A short secret is tolerated only when bearer tokens are never the sole identity source.
        if !self.auth.trust_user_id_header && self.auth.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters when the user id header is not trusted. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.auth.jwt_secret.len()
            )));
        }

        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Message(
                "database.url (or DATABASE_URL) is required for the postgres storage backend".into(),
            ));
        }

        if self.auth.user_id_header.trim().is_empty() {
            return Err(ConfigError::Message("auth.user_id_header must not be empty".into()));
        }

        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl AuthSettings {
    /// Whether bearer tokens can be verified at all.
    pub fn verifies_tokens(&self) -> bool {
        self.jwt_secret.len() >= MIN_JWT_SECRET_LENGTH
    }
}
