use crate::error::{CollapseToolError, ErrorCode};
use ::config::{Config, Environment, File, FileFormat};
use directories::BaseDirs;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Credential file looked up in the home directory when no path is given.
pub const CONFIG_FILE: &str = ".ndexutils.conf";
pub const DEFAULT_PROFILE: &str = "ndexnetworkcollapse";
pub const USER: &str = "user";
pub const PASSWORD: &str = "password";
pub const SERVER: &str = "server";

const ENV_PREFIX: &str = "NDEXCOLLAPSE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),
    #[error("could not resolve home directory for {CONFIG_FILE}")]
    NoHomeDir,
    #[error("missing '{field}' in profile [{profile}]")]
    MissingField {
        profile: String,
        field: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ::config::ConfigError),
}

impl CollapseToolError for ConfigError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}

/// NDEx account and server for one profile of the credential file.
#[derive(Clone, PartialEq, Eq)]
pub struct NdexCredentials {
    pub user: String,
    pub password: String,
    pub server: String,
}

impl fmt::Debug for NdexCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdexCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("server", &self.server)
            .finish()
    }
}

impl NdexCredentials {
    /// Load `[profile]` from an INI credential file.
    ///
    /// Values can be overridden with `NDEXCOLLAPSE_<PROFILE>__<KEY>` environment variables.
    pub fn load(conf_file: Option<&Path>, profile: &str) -> Result<Self, ConfigError> {
        let path = match conf_file {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path));
        }

        let settings = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Ini))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let creds = Self {
            user: required(&settings, profile, USER)?,
            password: required(&settings, profile, PASSWORD)?,
            server: required(&settings, profile, SERVER)?,
        };
        debug!(profile, path = %path.display(), server = %creds.server, "loaded credentials");
        Ok(creds)
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(CONFIG_FILE))
        .ok_or(ConfigError::NoHomeDir)
}

fn required(settings: &Config, profile: &str, field: &'static str) -> Result<String, ConfigError> {
    match settings.get_string(&format!("{}.{}", profile, field)) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Ok(_) | Err(::config::ConfigError::NotFound(_)) => Err(ConfigError::MissingField {
            profile: profile.to_string(),
            field,
        }),
        Err(err) => Err(err.into()),
    }
}
