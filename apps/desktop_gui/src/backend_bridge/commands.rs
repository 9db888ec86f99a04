//! Backend commands queued from UI to backend worker.

use shared::domain::{CellCoord, HexColor};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    SubmitPixel {
        selection: Option<CellCoord>,
        user: String,
        color: HexColor,
    },
    Refresh,
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitPixel { .. } => "submit_pixel",
            Self::Refresh => "refresh",
            Self::Shutdown => "shutdown",
        }
    }
}
