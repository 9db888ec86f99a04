use super::*;
use shared::domain::Cell;

const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const BLACK: [u8; 4] = [0, 0, 0, 0xff];
const RED: [u8; 4] = [0xff, 0, 0, 0xff];

fn coord(x: i64, y: i64) -> CellCoord {
    CellCoord::new(x, y).expect("coord")
}

fn red_cell(x: i64, y: i64) -> Cell {
    Cell {
        coord: coord(x, y),
        color: HexColor::from_rgb(0xff, 0, 0),
        owner: "ada".to_string(),
        updated_at: None,
    }
}

/// Counts draw calls without touching pixels.
#[derive(Default)]
struct CountingSurface {
    clears: usize,
    fills: usize,
    strokes: Vec<PixelRect>,
}

impl Surface for CountingSurface {
    fn width(&self) -> u32 {
        1500
    }

    fn height(&self) -> u32 {
        800
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn fill_rect(&mut self, _rect: PixelRect, _color: HexColor) {
        self.fills += 1;
    }

    fn stroke_rect(&mut self, rect: PixelRect, _color: HexColor, _line_width: u32) {
        self.strokes.push(rect);
    }
}

#[test]
fn surfaces_hold_the_whole_board() {
    let engine = RenderEngine::default();
    assert_eq!(engine.surface_size(), (1500, 800));
    let surface = engine.new_surface();
    assert_eq!((surface.width(), surface.height()), (1500, 800));
    assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(surface.pixel(1500, 0), None);
}

#[test]
fn base_paints_every_box_with_cell_or_background() {
    let engine = RenderEngine::default();
    let mut grid = GridState::new();
    grid.replace(vec![red_cell(20, 20)]);
    let mut surface = engine.new_surface();

    engine.draw_base(&mut surface, &grid);

    assert_eq!(surface.pixel(200, 200), Some(RED));
    assert_eq!(surface.pixel(209, 209), Some(RED));
    assert_eq!(surface.pixel(210, 200), Some(WHITE));
    assert_eq!(surface.pixel(0, 0), Some(WHITE));
    assert_eq!(surface.pixel(1499, 799), Some(WHITE));
}

#[test]
fn every_draw_is_a_full_repaint() {
    let engine = RenderEngine::default();
    let grid = GridState::new();
    let mut counting = CountingSurface::default();

    engine.draw_base(&mut counting, &grid);
    engine.draw_base(&mut counting, &grid);

    assert_eq!(counting.clears, 2);
    assert_eq!(counting.fills, 2 * 150 * 80);
    assert!(counting.strokes.is_empty());
}

#[test]
fn base_repaint_drops_cells_removed_by_sync() {
    let engine = RenderEngine::default();
    let mut grid = GridState::new();
    grid.replace(vec![red_cell(1, 1)]);
    let mut surface = engine.new_surface();
    engine.draw_base(&mut surface, &grid);
    assert_eq!(surface.pixel(15, 15), Some(RED));

    grid.replace(Vec::new());
    engine.draw_base(&mut surface, &grid);
    assert_eq!(surface.pixel(15, 15), Some(WHITE));
}

#[test]
fn overlay_strokes_unoccupied_selection() {
    let engine = RenderEngine::default();
    let grid = GridState::new();
    let mut surface = engine.new_surface();

    engine.draw_overlay(&mut surface, &grid, Some(coord(10, 5)));

    // outline runs along the box edges, interior keeps the background
    assert_eq!(surface.pixel(100, 50), Some(BLACK));
    assert_eq!(surface.pixel(109, 50), Some(BLACK));
    assert_eq!(surface.pixel(100, 59), Some(BLACK));
    assert_eq!(surface.pixel(109, 59), Some(BLACK));
    assert_eq!(surface.pixel(104, 54), Some(WHITE));
    assert_eq!(surface.pixel(110, 50), Some(WHITE));
}

#[test]
fn overlay_strokes_occupied_selection_over_cell_color() {
    let engine = RenderEngine::default();
    let mut grid = GridState::new();
    grid.replace(vec![red_cell(3, 4)]);
    let mut counting = CountingSurface::default();
    let mut surface = engine.new_surface();

    engine.draw_overlay(&mut counting, &grid, Some(coord(3, 4)));
    engine.draw_overlay(&mut surface, &grid, Some(coord(3, 4)));

    assert_eq!(counting.strokes, vec![engine.box_rect(coord(3, 4))]);
    assert_eq!(surface.pixel(30, 40), Some(BLACK));
    assert_eq!(surface.pixel(35, 45), Some(RED));
}

#[test]
fn overlay_without_selection_matches_base() {
    let engine = RenderEngine::default();
    let mut grid = GridState::new();
    grid.replace(vec![red_cell(7, 7), red_cell(149, 79)]);
    let mut base = engine.new_surface();
    let mut overlay = engine.new_surface();

    engine.draw_base(&mut base, &grid);
    engine.draw_overlay(&mut overlay, &grid, None);

    assert_eq!(base.rgba(), overlay.rgba());
}

#[test]
fn revision_moves_on_repaint() {
    let engine = RenderEngine::default();
    let grid = GridState::new();
    let mut surface = engine.new_surface();
    let before = surface.revision();
    engine.draw_base(&mut surface, &grid);
    assert_ne!(surface.revision(), before);
}
