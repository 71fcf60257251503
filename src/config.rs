use serde::Deserialize;

use std::{env, fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDatabaseConfig")]
pub enum DatabaseConfig {
    Postgres { dsn: String },
    Memory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Backend {
    #[default]
    Postgres,
    Memory,
}

/// `database` section as written in the file, checked by `TryFrom`.
#[derive(Debug, Deserialize)]
struct RawDatabaseConfig {
    #[serde(default)]
    backend: Backend,
    dsn: Option<String>,
}

impl TryFrom<RawDatabaseConfig> for DatabaseConfig {
    type Error = ConfigError;

    fn try_from(raw: RawDatabaseConfig) -> Result<Self, Self::Error> {
        match (raw.backend, raw.dsn) {
            (Backend::Postgres, Some(dsn)) => Ok(Self::Postgres { dsn }),
            (Backend::Postgres, None) => Err(ConfigError::MissingDsn),
            (Backend::Memory, _) => Ok(Self::Memory),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("database.dsn is required for the postgres backend")]
    MissingDsn,

    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("Failed to parse {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Builds the config from variables resolved through `var`
/// (`HOST`, `PORT`, `DATABASE_BACKEND`, `PG_DSN`).
fn load_from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let host = var("HOST").unwrap_or_else(default_host);

    let port = match var("PORT") {
        Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidVar {
            name: "PORT",
            value,
        })?,
        None => default_port(),
    };

    let backend = var("DATABASE_BACKEND").unwrap_or_else(|| "postgres".to_string());
    let database = match backend.as_str() {
        "postgres" => DatabaseConfig::Postgres {
            dsn: var("PG_DSN").ok_or(ConfigError::MissingVar("PG_DSN"))?,
        },
        "memory" => DatabaseConfig::Memory,
        _ => {
            return Err(ConfigError::InvalidVar {
                name: "DATABASE_BACKEND",
                value: backend,
            });
        }
    };

    Ok(Config {
        host,
        port,
        database,
    })
}

fn resolve_config(
    config_path: &Path,
    fallback_path: &Path,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    // Try env path
    if config_path.exists() {
        return load_from_file(config_path);
    }

    // Fallback to config.yaml
    if fallback_path.exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to '{}'",
            config_path.display(),
            fallback_path.display()
        );
        return load_from_file(fallback_path);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_vars(var)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = env::var("NOTES_API_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    resolve_config(Path::new(&config_path), Path::new("config.yaml"), |name| {
        env::var(name).ok()
    })
}
