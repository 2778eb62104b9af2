#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";

/// Effective settings after merging file and command-line values.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
    pub default_course_interest: Option<String>,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
            default_course_interest: None,
            log_level: None,
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        Ok(Self {
            api_base_url: config.api_base_url().to_string(),
            request_timeout: config.request_timeout(),
            default_course_interest: config.default_course_interest().map(str::to_string),
            log_level: config.log_level().map(str::to_string),
            log_format: config.log_format()?,
        })
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn default_course_interest(&self) -> Option<&str> {
        self.default_course_interest.as_deref()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        if let Some(timeout) = self.request_timeout {
            validate_range("timeout_seconds", timeout.as_secs(), 1, 300)?;
        }
        if let Some(interest) = &self.default_course_interest {
            validate_non_empty_string("default_course_interest", interest)?;
        }
        Ok(())
    }
}
