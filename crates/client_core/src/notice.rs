use crate::{
    backend::BackendError,
    submission::{SubmitError, SubmitOutcome, ValidationError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message for whatever presents toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn from_submission(result: &Result<SubmitOutcome, SubmitError>) -> Self {
        match result {
            Ok(SubmitOutcome::Accepted { .. }) => {
                Self::new(NoticeLevel::Success, "Pixel updated successfully!")
            }
            Ok(SubmitOutcome::RetryRequested { message }) => {
                Self::new(NoticeLevel::Info, message.clone())
            }
            Err(SubmitError::Validation(ValidationError::NoPixelSelected)) => {
                Self::new(NoticeLevel::Warning, "Please click a pixel first!")
            }
            Err(SubmitError::Validation(ValidationError::MissingUser)) => {
                Self::new(NoticeLevel::Warning, "Please enter your name!")
            }
            Err(SubmitError::Network(BackendError::Unacknowledged { .. })) => {
                Self::new(NoticeLevel::Error, "Update failed!")
            }
            Err(SubmitError::Network(_)) => Self::new(NoticeLevel::Error, "Error updating pixel!"),
        }
    }
}
