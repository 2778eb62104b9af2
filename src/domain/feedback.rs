//! User-facing text for failed submissions.
//!
//! Error bodies look like `{ "detail": string | [{ "msg": string, .. }] }`.
//! Anything else falls back to the fixed message of the form.

use crate::domain::model::FormKind;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// `detail` is a list of validation errors; one `msg` per entry.
    Validation(Vec<String>),
    /// `detail` is a plain string.
    Message(String),
    Unrecognized,
}

impl ErrorDetail {
    pub fn parse(body: Option<&Value>) -> Self {
        match body.and_then(|b| b.get("detail")) {
            Some(Value::Array(items)) => ErrorDetail::Validation(
                items
                    .iter()
                    .map(|item| match item.get("msg") {
                        Some(Value::String(msg)) => msg.clone(),
                        Some(other) if !other.is_null() => other.to_string(),
                        _ => String::new(),
                    })
                    .collect(),
            ),
            Some(Value::String(message)) if !message.is_empty() => {
                ErrorDetail::Message(message.clone())
            }
            _ => ErrorDetail::Unrecognized,
        }
    }

    pub fn into_message(self, kind: FormKind) -> String {
        match self {
            ErrorDetail::Validation(messages) => messages.join(", "),
            ErrorDetail::Message(message) => message,
            ErrorDetail::Unrecognized => kind.fallback_message().to_string(),
        }
    }
}

pub fn derive_error_message(kind: FormKind, body: Option<&Value>) -> String {
    ErrorDetail::parse(body).into_message(kind)
}
