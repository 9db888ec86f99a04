//! UI/backend events and error modeling for the board GUI.

use client_core::{Notice, SyncEvent};

pub enum UiEvent {
    Info(String),
    Sync(SyncEvent),
    Submitted(Notice),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Sync,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("returned http")
            || message_lower.contains("success=false")
        {
            UiErrorCategory::Server
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("unusable body")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("request to")
            || message_lower.contains("disconnected")
            || message_lower.contains("startup failure")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Validation => "Data",
        UiErrorCategory::Unknown => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_http_status_failures_as_server_errors() {
        let err = UiError::from_message(
            UiErrorContext::Sync,
            "http://127.0.0.1:5000/api/get_pixel returned HTTP 500",
        );
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(err.context(), UiErrorContext::Sync);
    }

    #[test]
    fn classifies_refused_connection_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::Sync,
            "request to http://127.0.0.1:5000/api/get_pixel failed: error sending request",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err_label(err.category()), "Connection");
    }

    #[test]
    fn classifies_command_processor_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_bad_payload_as_validation_error() {
        let err = UiError::from_message(
            UiErrorContext::Sync,
            "http://h/api/get_user_details returned an unusable body: missing field `user_data`",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(
            err.message(),
            "http://h/api/get_user_details returned an unusable body: missing field `user_data`"
        );
    }
}
