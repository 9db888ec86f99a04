use std::sync::Arc;

use shared::domain::{Cell, CellCoord, HexColor, Scoreboard};
use tokio::sync::broadcast;
use tracing::info;

pub mod backend;
pub mod config;
pub mod grid_state;
pub mod interaction;
pub mod notice;
pub mod render;
pub mod session;
pub mod submission;
pub mod sync;

pub use backend::{BackendError, HttpPixelBackend, PixelBackend};
pub use config::{load_settings, ClientSettings, ConfigError};
pub use grid_state::GridState;
pub use interaction::{
    DragState, InteractionController, ListenerGuard, PanOffset, PointerEvent, ScreenPoint,
};
pub use notice::{Notice, NoticeLevel};
pub use render::{RasterSurface, RenderEngine, Surface};
pub use session::CanvasSession;
pub use submission::{SubmissionController, SubmitError, SubmitOutcome, ValidationError};
pub use sync::{FetchFamily, RefreshTrigger, SyncEvent, SyncHandle, SyncScheduler};

/// The network side of a board client: background polling plus writes.
/// Everything it learns is published as [`SyncEvent`]s; it holds no board
/// state of its own.
pub struct BoardClient {
    backend: Arc<dyn PixelBackend>,
    scheduler: SyncScheduler,
    submission: SubmissionController,
}

impl BoardClient {
    /// Starts polling right away. Must be called inside a tokio runtime.
    pub fn start(backend: Arc<dyn PixelBackend>) -> (Self, broadcast::Receiver<SyncEvent>) {
        let (scheduler, events) = SyncScheduler::start(Arc::clone(&backend));
        let refresh = Arc::new(scheduler.handle());
        let submission = SubmissionController::new(Arc::clone(&backend), refresh);
        let client = Self {
            backend,
            scheduler,
            submission,
        };
        (client, events)
    }

    pub fn connect(settings: &ClientSettings) -> (Self, broadcast::Receiver<SyncEvent>) {
        info!(backend_url = %settings.backend_url, "connecting to pixel backend");
        Self::start(Arc::new(HttpPixelBackend::new(&settings.backend_url)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.scheduler.subscribe()
    }

    pub fn refresh(&self) {
        self.scheduler.trigger_now();
    }

    pub async fn submit(
        &self,
        selection: Option<CellCoord>,
        user: &str,
        color: HexColor,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.submission.submit(selection, user, color).await
    }

    pub fn backend(&self) -> Arc<dyn PixelBackend> {
        Arc::clone(&self.backend)
    }

    pub async fn shutdown(self) {
        self.scheduler.stop().await;
    }
}

/// One-shot fetch of both halves of the board state.
pub async fn fetch_snapshot(
    backend: &dyn PixelBackend,
) -> Result<(Vec<Cell>, Scoreboard), BackendError> {
    let (cells, scoreboard) = tokio::join!(backend.fetch_pixels(), backend.fetch_scoreboard());
    Ok((cells?, scoreboard?))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
