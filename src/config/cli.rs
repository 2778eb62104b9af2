use super::{Settings, TomlConfig};
use crate::domain::model::LevelFilter;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "bootcamp-portal")]
#[command(about = "Course catalog and enrollment client for the bootcamp backend")]
pub struct CliConfig {
    /// Backend base URL; requests go to <base>/api
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Pre-filled course interest, restored after each enrollment
    #[arg(long, global = true)]
    pub default_course_interest: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List courses, optionally filtered by level
    Courses {
        #[arg(long, default_value = "all")]
        level: LevelFilter,

        /// Filter on the server instead of locally
        #[arg(long)]
        remote: bool,

        #[arg(long, requires = "remote")]
        duration: Option<String>,
    },

    /// Submit the enrollment form
    Enroll {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        experience_level: Option<String>,
        #[arg(long)]
        course_interest: Option<String>,
    },

    /// Submit the contact form
    Contact {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },

    /// Check backend health
    Health,
}

impl CliConfig {
    /// 設定檔為基礎，命令列參數覆蓋
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_toml(&TomlConfig::from_file(path)?)?,
            None => Settings::default(),
        };

        if let Some(url) = &self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.request_timeout = Some(Duration::from_secs(timeout));
        }
        if let Some(interest) = &self.default_course_interest {
            settings.default_course_interest = Some(interest.clone());
        }
        if self.json_logs {
            settings.log_format = LogFormat::Json;
        }

        Ok(settings)
    }
}
