//! Full-repaint rendering of the board onto two stacked surfaces.
//!
//! The base surface only ever shows grid data. The overlay shows the same
//! data plus the selection outline and is the one the host moves around when
//! the user pans. Both are sized to hold the whole board so a screen position
//! maps 1:1 to a board position before any pan is applied.

use shared::domain::{CellCoord, HexColor, GRID_COLS, GRID_ROWS};
use tracing::trace;

use crate::grid_state::GridState;

/// Edge length of one board cell in surface pixels.
pub const BOX_SIZE: u32 = 10;
pub const BACKGROUND_COLOR: HexColor = HexColor::WHITE;
pub const SELECTION_COLOR: HexColor = HexColor::BLACK;
pub const SELECTION_LINE_WIDTH: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A drawing target the [`RenderEngine`] paints into.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Resets every pixel to fully transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: PixelRect, color: HexColor);
    /// Outlines `rect` with a border `line_width` pixels thick drawn inside it.
    fn stroke_rect(&mut self, rect: PixelRect, color: HexColor, line_width: u32);
}

/// CPU-side RGBA8 surface. `revision` changes on every mutation so a host can
/// tell when its uploaded copy is stale.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    revision: u64,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
            revision: 0,
        }
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    fn put_span(&mut self, y: u32, x_start: u32, x_end: u32, color: [u8; 4]) {
        let row = y as usize * self.width as usize;
        for x in x_start..x_end {
            let offset = (row + x as usize) * 4;
            self.rgba[offset..offset + 4].copy_from_slice(&color);
        }
    }

    fn clip(&self, rect: PixelRect) -> Option<(u32, u32, u32, u32)> {
        let x_end = rect.x.saturating_add(rect.width).min(self.width);
        let y_end = rect.y.saturating_add(rect.height).min(self.height);
        if rect.x >= x_end || rect.y >= y_end {
            return None;
        }
        Some((rect.x, rect.y, x_end, y_end))
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn opaque(color: HexColor) -> [u8; 4] {
    let [r, g, b] = color.rgb();
    [r, g, b, 0xff]
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.rgba.fill(0);
        self.bump();
    }

    fn fill_rect(&mut self, rect: PixelRect, color: HexColor) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let color = opaque(color);
        for y in y0..y1 {
            self.put_span(y, x0, x1, color);
        }
        self.bump();
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: HexColor, line_width: u32) {
        let line = line_width.min(rect.width).min(rect.height);
        if line == 0 {
            return;
        }
        let edges = [
            PixelRect { height: line, ..rect },
            PixelRect {
                y: rect.y + rect.height.saturating_sub(line),
                height: line,
                ..rect
            },
            PixelRect { width: line, ..rect },
            PixelRect {
                x: rect.x + rect.width.saturating_sub(line),
                width: line,
                ..rect
            },
        ];
        for edge in edges {
            self.fill_rect(edge, color);
        }
    }
}

/// Paints grid data onto surfaces. Every call is a full clear-and-redraw.
#[derive(Debug, Clone, Copy)]
pub struct RenderEngine {
    box_size: u32,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self { box_size: BOX_SIZE }
    }
}

impl RenderEngine {
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (
            u32::from(GRID_COLS) * self.box_size,
            u32::from(GRID_ROWS) * self.box_size,
        )
    }

    pub fn new_surface(&self) -> RasterSurface {
        let (width, height) = self.surface_size();
        RasterSurface::new(width, height)
    }

    pub fn box_rect(&self, coord: CellCoord) -> PixelRect {
        PixelRect {
            x: u32::from(coord.x()) * self.box_size,
            y: u32::from(coord.y()) * self.box_size,
            width: self.box_size,
            height: self.box_size,
        }
    }

    pub fn draw_base<S: Surface + ?Sized>(&self, surface: &mut S, grid: &GridState) {
        self.paint_grid(surface, grid);
        trace!(cells = grid.len(), "repainted base surface");
    }

    pub fn draw_overlay<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        grid: &GridState,
        selection: Option<CellCoord>,
    ) {
        self.paint_grid(surface, grid);
        if let Some(coord) = selection {
            surface.stroke_rect(self.box_rect(coord), SELECTION_COLOR, SELECTION_LINE_WIDTH);
        }
        trace!(cells = grid.len(), ?selection, "repainted overlay surface");
    }

    fn paint_grid<S: Surface + ?Sized>(&self, surface: &mut S, grid: &GridState) {
        surface.clear();
        for coord in CellCoord::all() {
            let color = grid
                .lookup(coord)
                .map(|cell| cell.color)
                .unwrap_or(BACKGROUND_COLOR);
            surface.fill_rect(self.box_rect(coord), color);
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
