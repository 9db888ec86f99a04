use std::sync::Arc;

use shared::{
    domain::{CellCoord, HexColor},
    protocol::UpdatePixelRequest,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    backend::{BackendError, PixelBackend},
    sync::RefreshTrigger,
};

/// Substring the server puts in its reply when a write was not applied and
/// should be retried later (rate limit, contended pixel).
const RETRY_INDICATOR: &str = "try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no pixel selected")]
    NoPixelSelected,
    #[error("missing user")]
    MissingUser,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("pixel update failed: {0}")]
    Network(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { message: String },
    /// The server answered but asked the client to retry later.
    RetryRequested { message: String },
}

pub struct SubmissionController {
    backend: Arc<dyn PixelBackend>,
    refresh: Arc<dyn RefreshTrigger>,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn PixelBackend>, refresh: Arc<dyn RefreshTrigger>) -> Self {
        Self { backend, refresh }
    }

    /// Checks the preconditions that must hold before anything goes on the wire.
    pub fn validate(
        selection: Option<CellCoord>,
        user: &str,
    ) -> Result<CellCoord, ValidationError> {
        let coord = selection.ok_or(ValidationError::NoPixelSelected)?;
        if user.trim().is_empty() {
            return Err(ValidationError::MissingUser);
        }
        Ok(coord)
    }

    /// Proposes `color` for the selected cell. Local state is never touched:
    /// the new color only shows up through the refresh this triggers.
    pub async fn submit(
        &self,
        selection: Option<CellCoord>,
        user: &str,
        color: HexColor,
    ) -> Result<SubmitOutcome, SubmitError> {
        let coord = Self::validate(selection, user)?;
        let request = UpdatePixelRequest::single(user, coord, color);

        let reply = match self.backend.update_pixel(&request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%coord, user, %err, "pixel update failed");
                return Err(err.into());
            }
        };

        let outcome = if reply
            .message
            .to_ascii_lowercase()
            .contains(RETRY_INDICATOR)
        {
            info!(%coord, user, message = %reply.message, "server asked to retry pixel update");
            SubmitOutcome::RetryRequested {
                message: reply.message,
            }
        } else {
            info!(%coord, user, %color, "pixel update accepted");
            SubmitOutcome::Accepted {
                message: reply.message,
            }
        };
        self.refresh.trigger_now();
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
