use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::Category;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub data_store: DataStoreSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub recommendations: RecommendationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Rest,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataStoreSettings {
    pub backend: StoreBackend,
    #[serde(default = "default_vendors_table")]
    pub vendors_table: String,
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
    pub rest: Option<RestSettings>,
    pub postgres: Option<PostgresSettings>,
}

fn default_vendors_table() -> String { "vendors".to_string() }
fn default_profiles_table() -> String { "profiles".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct RestSettings {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret of the hosted auth service; without it every caller is anonymous
    pub jwt_secret: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_category_limit")]
    pub category_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_categories")]
    pub default_categories: Vec<Category>,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            category_limit: default_category_limit(),
            max_limit: default_max_limit(),
            default_categories: default_categories(),
        }
    }
}

fn default_limit() -> usize { crate::core::DEFAULT_LIMIT }
fn default_category_limit() -> usize { crate::core::DEFAULT_CATEGORY_LIMIT }
fn default_max_limit() -> usize { crate::core::MAX_LIMIT }
fn default_categories() -> Vec<Category> {
    vec![
        Category::Venue,
        Category::Photographer,
        Category::Dj,
        Category::Flowers,
        Category::Catering,
        Category::Makeup,
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Layer explicit level/format overrides on top of the configured values
    pub fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    /// `LOG_LEVEL` and `LOG_FORMAT` win over the config file
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok())
    }

    pub fn is_pretty(&self) -> bool {
        self.format == "pretty"
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VENDOR_RECS)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VENDOR_RECS__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = apply_platform_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("VENDOR_RECS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the hosted platform's conventional variables on top of the loaded config
///
/// `DATABASE_URL`, `SUPABASE_URL` and `SUPABASE_SERVICE_KEY` win over file values.
fn apply_platform_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("data_store.postgres.url", url)?;
    }
    if let Ok(url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("data_store.rest.url", url)?;
    }
    if let Ok(key) = env::var("SUPABASE_SERVICE_KEY") {
        builder = builder.set_override("data_store.rest.api_key", key)?;
    }
    if let Ok(secret) = env::var("SUPABASE_JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}
