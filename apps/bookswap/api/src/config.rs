use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_optional, env_parse, server::ServerConfig,
};
use database::postgres::PostgresConfig;
use domain_items::PostingConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where items and users are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Postgres,
    /// Process-local maps, lost on restart
    Memory,
}

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
    /// Present when `storage` is `Postgres`
    pub database: Option<PostgresConfig>,
    pub run_migrations: bool,
    /// Comma-separated origins; CORS is off when unset
    pub cors_allowed_origin: Option<String>,
    pub posting: PostingConfig,
}

impl Config {
    /// In-memory storage with default server and posting settings.
    pub fn in_memory() -> Self {
        Self {
            app: app_info!(),
            environment: Environment::Development,
            server: ServerConfig::default(),
            storage: StorageBackend::Memory,
            database: None,
            run_migrations: false,
            cors_allowed_origin: None,
            posting: PostingConfig::default(),
        }
    }
}

impl FromEnv for Config {
    /// - STORAGE_BACKEND: `postgres` (default) or `memory`
    /// - DATABASE_URL: required for `postgres`, see [`PostgresConfig`]
    /// - RUN_MIGRATIONS: defaults to true
    /// - CORS_ALLOWED_ORIGIN: optional
    fn from_env() -> Result<Self, ConfigError> {
        let storage: StorageBackend = env_parse("STORAGE_BACKEND", "postgres")?;
        let database = match storage {
            StorageBackend::Postgres => Some(PostgresConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            storage,
            database,
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            cors_allowed_origin: env_optional("CORS_ALLOWED_ORIGIN"),
            posting: PostingConfig::from_env()?,
        })
    }
}
