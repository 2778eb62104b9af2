use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid value for field {field} ({value}): {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Backend rejected request with status {status}")]
    Rejected {
        status: u16,
        body: Option<serde_json::Value>,
    },
}

impl PortalError {
    /// 後端回應的錯誤內容 (只有非 2xx 回應才會有)
    pub fn error_body(&self) -> Option<&serde_json::Value> {
        match self {
            PortalError::Rejected { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PortalError::ConfigError { .. } | PortalError::InvalidConfigValueError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::Http(e) if e.is_connect() => {
                "Could not reach the backend. Check the API base URL.".to_string()
            }
            PortalError::Http(e) if e.is_timeout() => "The backend did not answer in time.".to_string(),
            PortalError::Http(_) => "Request to the backend failed.".to_string(),
            PortalError::Rejected { status, .. } => {
                format!("The backend rejected the request (HTTP {}).", status)
            }
            PortalError::InvalidFieldValue { field, reason, .. } => {
                format!("{}: {}", field, reason)
            }
            other if other.is_config_error() => format!("Configuration problem: {}", other),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
