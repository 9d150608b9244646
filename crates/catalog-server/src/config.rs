use catalog_auth::AuthConfig;
use serde::Deserialize;
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Auth validation, including the required signing secret
        self.auth.validate().map_err(|e| e.to_string())?;
        // Redis validation
        if self.redis.enabled {
            if self.redis.url.trim().is_empty() {
                return Err("redis.url must not be empty when redis.enabled=true".into());
            }
            if self.redis.pool_size == 0 {
                return Err("redis.pool_size must be > 0".into());
            }
        }
        if self.redis.timeout_ms == 0 {
            return Err("redis.timeout_ms must be > 0".into());
        }
        // Cache validation
        if self.cache.product_ttl.is_zero() || self.cache.list_ttl.is_zero() {
            return Err("cache TTLs must be > 0".into());
        }
        if self.cache.max_entries == 0 {
            return Err("cache.max_entries must be > 0".into());
        }
        // Bootstrap validation
        if let Some(ref admin) = self.bootstrap.admin_user {
            if admin.email.trim().is_empty() || admin.password.is_empty() {
                return Err("bootstrap.admin_user requires email and password".into());
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        let ip: std::net::IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
        SocketAddr::from((ip, self.server.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event, for log shippers
    Json,
}

/// Redis cache configuration.
///
/// When disabled, or when Redis cannot be reached at startup, the cache runs
/// in-process.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Default: false (single-instance deployments)
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Upper bound for connecting and for every cache operation, in milliseconds
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_redis_timeout_ms() -> u64 {
    500
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Cache entry lifetimes.
///
/// # Example (TOML)
///
/// ```toml
/// [cache]
/// product_ttl = "10m"
/// list_ttl = "5m"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// TTL of single-product entries (`product:{id}`)
    #[serde(default = "default_product_ttl", with = "humantime_serde")]
    pub product_ttl: Duration,

    /// TTL of list entries (`products:...`)
    #[serde(default = "default_list_ttl", with = "humantime_serde")]
    pub list_ttl: Duration,

    /// Entry cap of the in-process cache. Ignored when Redis is in use.
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

fn default_cache_max_entries() -> usize {
    crate::cache::backend::DEFAULT_LOCAL_MAX_ENTRIES
}

fn default_product_ttl() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_list_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            product_ttl: default_product_ttl(),
            list_ttl: default_list_ttl(),
            max_entries: default_cache_max_entries(),
        }
    }
}

/// Bootstrap configuration for initial setup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BootstrapConfig {
    /// If set, creates an admin user on startup (if not already exists)
    #[serde(default)]
    pub admin_user: Option<AdminUserConfig>,
}

/// Configuration for bootstrapping an admin user
#[derive(Clone, Deserialize)]
pub struct AdminUserConfig {
    pub email: String,
    /// Plain text, hashed before storage.
    /// Prefer CATALOG__BOOTSTRAP__ADMIN_USER__PASSWORD over the config file.
    pub password: String,
    #[serde(default = "default_admin_first_name")]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

fn default_admin_first_name() -> String {
    "Admin".into()
}

impl std::fmt::Debug for AdminUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File, FileFormat};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_PATH: &str = "catalog.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., CATALOG__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("CATALOG")
                .try_parsing(true)
                .separator("__"),
        );
        finish(builder)
    }

    /// Loads configuration from TOML text, without environment overrides.
    pub fn load_config_from_str(toml: &str) -> Result<AppConfig, String> {
        finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<AppConfig, String> {
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        // Validate
        merged.validate()?;
        Ok(merged)
    }
}
