//! Process configuration read from environment variables.
//!
//! Every required variable must be present and non-empty. `ENVIRONMENT`
//! selects the export host and defaults to `prod`; `METADATA_EXPORT`
//! toggles the metadata sub-step and defaults to on.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::export::{PatternError, UrlPattern};

pub const INTEGRATION_ID_KEY: &str = "INTEGRATION_ID";
pub const INPUT_DIRECTORY_KEY: &str = "INPUT_DIR";
pub const OUTPUT_DIRECTORY_KEY: &str = "OUTPUT_DIR";
pub const SESSION_TOKEN_KEY: &str = "SESSION_TOKEN";
pub const API_HOST_KEY: &str = "PENNSIEVE_API_HOST";
pub const API2_HOST_KEY: &str = "PENNSIEVE_API_HOST2";
pub const ENVIRONMENT_KEY: &str = "ENVIRONMENT";
pub const METADATA_EXPORT_KEY: &str = "METADATA_EXPORT";

/// Export host for the production environment.
pub const PROD_EXPORT_HOST: &str = "https://cassava.ucsd.edu";

/// Export host for the development environment.
pub const DEV_EXPORT_HOST: &str =
    "http://test-sparc-curation-export-source.s3-website-us-east-1.amazonaws.com";

/// Errors while building [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("no {key} set")]
    Missing {
        /// Variable name.
        key: &'static str,
    },

    /// `ENVIRONMENT` holds something other than `dev` or `prod`.
    #[error(
        "unexpected value for ENVIRONMENT; expect either \"dev\" or \"prod\" (case insensitive): {value}"
    )]
    UnknownEnvironment {
        /// The rejected value.
        value: String,
    },

    /// A boolean flag variable could not be parsed.
    #[error("invalid value for {key}: {value:?}. Expected true/false, 1/0 or yes/no")]
    InvalidFlag {
        /// Variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The export URL template derived from the environment is invalid.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Deployment environment, selecting the export host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Dev,
    #[default]
    Prod,
}

impl Environment {
    /// Host serving export files for this environment.
    #[must_use]
    pub fn export_host(self) -> &'static str {
        match self {
            Self::Dev => DEV_EXPORT_HOST,
            Self::Prod => PROD_EXPORT_HOST,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("dev") {
            Ok(Self::Dev)
        } else if value.eq_ignore_ascii_case("prod") {
            Ok(Self::Prod)
        } else {
            Err(ConfigError::UnknownEnvironment {
                value: value.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dev => f.write_str("dev"),
            Self::Prod => f.write_str("prod"),
        }
    }
}

/// Everything the pipeline needs to run once.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub integration_id: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub session_token: String,
    pub api_host: String,
    pub api2_host: String,
    pub environment: Environment,
    pub metadata_export: bool,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an absent required variable,
    /// [`ConfigError::UnknownEnvironment`] for an unrecognized
    /// `ENVIRONMENT`, and [`ConfigError::InvalidFlag`] for a malformed
    /// `METADATA_EXPORT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing { key });

        let integration_id = required(INTEGRATION_ID_KEY)?;
        let input_dir = PathBuf::from(required(INPUT_DIRECTORY_KEY)?);
        let output_dir = PathBuf::from(required(OUTPUT_DIRECTORY_KEY)?);
        let session_token = required(SESSION_TOKEN_KEY)?;
        let api_host = required(API_HOST_KEY)?;
        let api2_host = required(API2_HOST_KEY)?;

        let environment = match optional(ENVIRONMENT_KEY) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let metadata_export = match optional(METADATA_EXPORT_KEY) {
            Some(value) => parse_flag(METADATA_EXPORT_KEY, &value)?,
            None => true,
        };

        Ok(Self {
            integration_id,
            input_dir,
            output_dir,
            session_token,
            api_host,
            api2_host,
            environment,
            metadata_export,
        })
    }

    /// Export URL template for the configured environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if the template is malformed.
    pub fn url_pattern(&self) -> Result<UrlPattern, ConfigError> {
        Ok(UrlPattern::for_host(self.environment.export_host())?)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("integration_id", &self.integration_id)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("api_host", &self.api_host)
            .field("api2_host", &self.api2_host)
            .field("environment", &self.environment)
            .field("metadata_export", &self.metadata_export)
            .finish_non_exhaustive()
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
