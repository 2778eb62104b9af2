pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::HttpBackend;
pub use config::{Settings, TomlConfig};
pub use core::catalog::CatalogViewModel;
pub use core::forms::{ContactController, EnrollmentController, FormController, SubmitOutcome};
pub use domain::model::{ContactForm, Course, EnrollmentForm, Level, LevelFilter, SubmitStatus};
pub use utils::error::{PortalError, Result};
