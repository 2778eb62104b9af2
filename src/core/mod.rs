pub mod catalog;
pub mod forms;

pub use crate::domain::model::{Course, LevelFilter, SubmitStatus};
pub use crate::domain::ports::{BackendApi, ConfigProvider};
pub use crate::utils::error::Result;
