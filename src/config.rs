//! Runtime configuration.
//!
//! Settings are read from a TOML file and then overridden by `COHORT_*`
//! environment variables. Every field has a default, so an empty document is
//! a valid configuration.
//!
//! ```toml
//! [storage]
//! upload_dir = "/var/lib/cohort/uploads"
//!
//! [database]
//! url = "postgres://cohort@localhost/cohort"
//! pool_size = 8
//!
//! [logging]
//! filter = "cohort=debug"
//! format = "json"
//!
//! [credentials]
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use serde::Deserialize;
use std::io;
use thiserror::Error;

/// Environment variable overriding [`StorageSettings::upload_dir`].
pub const UPLOAD_DIR_ENV: &str = "COHORT_UPLOAD_DIR";
/// Environment variable overriding [`DatabaseSettings::url`].
pub const DATABASE_URL_ENV: &str = "COHORT_DATABASE_URL";
/// Environment variable overriding [`LoggingSettings::filter`].
pub const LOG_FILTER_ENV: &str = "COHORT_LOG";
/// Environment variable overriding [`LoggingSettings::format`].
pub const LOG_FORMAT_ENV: &str = "COHORT_LOG_FORMAT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Blob storage settings.
    pub storage: StorageSettings,
    /// Database settings.
    pub database: DatabaseSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Credential hashing settings.
    pub credentials: CredentialSettings,
}

/// Blob storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// Root directory for uploaded files.
    pub upload_dir: Utf8PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: Utf8PathBuf::from("uploads"),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSettings {
    /// `PostgreSQL` connection URL. No pool is built when unset.
    pub url: Option<String>,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 8,
        }
    }
}

impl DatabaseSettings {
    /// Builds an r2d2 connection pool of at most `pool_size` connections.
    ///
    /// Returns `Ok(None)` when no URL is configured, leaving the caller to
    /// fall back to the in-memory repositories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero pool size and
    /// [`ConfigError::Pool`] when the initial connections cannot be opened.
    pub fn connection_pool(
        &self,
    ) -> Result<Option<Pool<ConnectionManager<PgConnection>>>, ConfigError> {
        let Some(url) = self.url.as_deref() else {
            return Ok(None);
        };
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "database.pool_size",
                value: self.pool_size.to_string(),
            });
        }
        let pool = Pool::builder()
            .max_size(self.pool_size)
            .build(ConnectionManager::<PgConnection>::new(url))?;
        tracing::debug!(pool_size = self.pool_size, "database pool ready");
        Ok(Some(pool))
    }
}

/// Output format of log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl TryFrom<&str> for LogFormat {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: LOG_FORMAT_ENV,
                value: value.to_owned(),
            }),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// `tracing-subscriber` filter directive.
    pub filter: String,
    /// Event output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "cohort=info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CredentialSettings {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// File that failed to load.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration document is not valid TOML for [`Settings`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The database pool could not be built.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),

    /// An override carries an unusable value.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Setting or variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl Settings {
    /// Parses settings from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Loads settings from `path` when given (defaults otherwise) and applies
    /// the process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] for file
    /// problems and [`ConfigError::InvalidValue`] for bad overrides.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(file) => Self::from_toml_str(&read_document(file)?)?,
            None => Self::default(),
        };
        base.apply_env(|key| std::env::var(key).ok())
    }

    /// Applies `COHORT_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown log format.
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(UPLOAD_DIR_ENV) {
            self.storage.upload_dir = Utf8PathBuf::from(dir);
        }
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            self.database.url = Some(url);
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            self.logging.filter = filter;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            self.logging.format = LogFormat::try_from(format.as_str())?;
        }
        Ok(self)
    }
}

fn read_document(file: &Utf8Path) -> Result<String, ConfigError> {
    let read_error = |source: io::Error| ConfigError::Read {
        path: file.to_owned(),
        source,
    };
    let name = file.file_name().ok_or_else(|| {
        read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path does not name a file",
        ))
    })?;
    let parent = file
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read_to_string(name).map_err(read_error)
}
