//! `proposals.toml` settings.
//!
//! Every key is optional. Command-line flags are applied on top with
//! [`AppConfig::with_overrides`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use proposal_core::db::DbConfig;
use proposal_core::{DEFAULT_CURRENCY, DEFAULT_TAX_RATE};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "proposals.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub defaults: DefaultsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub backend: String,
    pub connection: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DbConfig::default();
        Self {
            backend: db.backend,
            connection: db.connection_string,
        }
    }
}

/// Values filled into drafts that leave them out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub currency: String,
    pub tax_rate: String,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            tax_rate: DEFAULT_TAX_RATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// A bare level or any `EnvFilter` directive.
    pub level: String,
    /// Append log records here as well as to stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings.
    ///
    /// With `explicit` set the file must exist. Otherwise
    /// [`DEFAULT_CONFIG_FILE`] in the working directory is used when
    /// present and built-in defaults when it is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded config file");
                Self::from_toml_str(&text, &path)
            }
            Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn with_overrides(
        mut self,
        backend: Option<String>,
        connection: Option<String>,
    ) -> Self {
        if let Some(backend) = backend {
            self.database.backend = backend;
        }
        if let Some(connection) = connection {
            self.database.connection = connection;
        }
        self
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.database.backend.clone(),
            connection_string: self.database.connection.clone(),
        }
    }
}
