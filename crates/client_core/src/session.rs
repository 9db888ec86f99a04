//! The board as one UI-thread object: replica state, both surfaces and the
//! pointer controller, mutated only through its methods.

use shared::domain::{CellCoord, Scoreboard};
use tracing::{debug, info, warn};

use crate::{
    grid_state::GridState,
    interaction::{InteractionController, ListenerGuard, PanOffset, PointerEvent, ScreenPoint},
    render::{RasterSurface, RenderEngine},
    sync::{FetchFamily, SyncEvent},
};

pub const INITIAL_STATUS: &str = "Clicked Box: (x, y)";

pub struct CanvasSession {
    grid: GridState,
    scoreboard: Scoreboard,
    renderer: RenderEngine,
    interaction: InteractionController,
    base: RasterSurface,
    overlay: RasterSurface,
    status: String,
    last_grid_seq: u64,
    last_scoreboard_seq: u64,
    grid_error: Option<String>,
    scoreboard_error: Option<String>,
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new(RenderEngine::default())
    }
}

impl CanvasSession {
    pub fn new(renderer: RenderEngine) -> Self {
        let grid = GridState::new();
        let mut base = renderer.new_surface();
        let mut overlay = renderer.new_surface();
        renderer.draw_base(&mut base, &grid);
        renderer.draw_overlay(&mut overlay, &grid, None);
        Self {
            grid,
            scoreboard: Scoreboard::default(),
            renderer,
            interaction: InteractionController::new(renderer.box_size()),
            base,
            overlay,
            status: INITIAL_STATUS.to_string(),
            last_grid_seq: 0,
            last_scoreboard_seq: 0,
            grid_error: None,
            scoreboard_error: None,
        }
    }

    /// Hold the returned guard for as long as the overlay is on screen.
    pub fn attach_pointer_listeners(&self) -> ListenerGuard {
        self.interaction.attach()
    }

    pub fn set_surface_origin(&mut self, origin: ScreenPoint) {
        self.interaction.set_surface_origin(origin);
    }

    /// Folds one sync result into the replica. Results from a cycle older
    /// than the newest one already applied are dropped. Returns whether
    /// anything visible changed.
    pub fn apply_sync_event(&mut self, event: SyncEvent) -> bool {
        match event {
            SyncEvent::GridFetched { seq, cells } => {
                if seq <= self.last_grid_seq {
                    debug!(seq, newest = self.last_grid_seq, "discarding stale grid");
                    return false;
                }
                self.last_grid_seq = seq;
                self.grid_error = None;
                self.grid.replace(cells);
                self.redraw();
                true
            }
            SyncEvent::ScoreboardFetched { seq, scoreboard } => {
                if seq <= self.last_scoreboard_seq {
                    debug!(seq, newest = self.last_scoreboard_seq, "discarding stale scoreboard");
                    return false;
                }
                self.last_scoreboard_seq = seq;
                self.scoreboard_error = None;
                self.scoreboard = scoreboard;
                true
            }
            SyncEvent::FetchFailed { seq, family, error } => {
                warn!(seq, ?family, %error, "sync failed; showing cached data");
                let slot = match family {
                    FetchFamily::Grid => &mut self.grid_error,
                    FetchFamily::Scoreboard => &mut self.scoreboard_error,
                };
                let changed = slot.as_deref() != Some(error.as_str());
                *slot = Some(error);
                changed
            }
        }
    }

    /// Routes a pointer event through the controller. A completed click
    /// selects the cell under the pointer and repaints the overlay.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<CellCoord> {
        let clicked = self.interaction.handle(event)?;
        self.select(clicked);
        Some(clicked)
    }

    pub fn select(&mut self, coord: CellCoord) {
        self.grid.set_selection(coord);
        self.status = match self.grid.lookup(coord) {
            Some(cell) => format!(
                "Clicked Box: {coord}, Color: {}, User: {}",
                cell.color, cell.owner
            ),
            None => format!("Clicked Box: {coord}"),
        };
        info!(%coord, "cell selected");
        self.renderer
            .draw_overlay(&mut self.overlay, &self.grid, Some(coord));
    }

    fn redraw(&mut self) {
        self.renderer.draw_base(&mut self.base, &self.grid);
        self.renderer
            .draw_overlay(&mut self.overlay, &self.grid, self.grid.selection());
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn selection(&self) -> Option<CellCoord> {
        self.grid.selection()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Most recent failure for `family`, cleared by its next applied result.
    pub fn sync_error(&self, family: FetchFamily) -> Option<&str> {
        match family {
            FetchFamily::Grid => self.grid_error.as_deref(),
            FetchFamily::Scoreboard => self.scoreboard_error.as_deref(),
        }
    }

    pub fn base_surface(&self) -> &RasterSurface {
        &self.base
    }

    pub fn overlay_surface(&self) -> &RasterSurface {
        &self.overlay
    }

    pub fn pan_offset(&self) -> PanOffset {
        self.interaction.pan_offset()
    }

    pub fn displayed_offset(&self) -> PanOffset {
        self.interaction.displayed_offset()
    }

    pub fn overlay_origin(&self) -> ScreenPoint {
        self.interaction.overlay_origin()
    }

    pub fn box_size(&self) -> u32 {
        self.renderer.box_size()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
