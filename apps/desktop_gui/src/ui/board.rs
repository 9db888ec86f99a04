//! Draws the two board surfaces and turns egui pointer input into the
//! overlay's pointer events.

use client_core::{CanvasSession, PointerEvent, RasterSurface, ScreenPoint, Surface};
use eframe::egui;
use egui::{
    Color32, ColorImage, LayerId, Pos2, Rect, Sense, Stroke, StrokeKind, TextureHandle,
    TextureOptions,
};

const OVERLAY_BORDER: Stroke = Stroke {
    width: 1.0,
    color: Color32::BLACK,
};

/// One frame's worth of pointer state, reduced to what the overlay needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSample {
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    /// Another layer (popup, color picker, toast) is on top at `pos`.
    pub covered: bool,
}

impl PointerSample {
    fn read(ctx: &egui::Context, layer: LayerId) -> Self {
        let mut sample = ctx.input(|input| Self {
            pos: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
            covered: false,
        });
        sample.covered = sample
            .pos
            .is_some_and(|pos| ctx.layer_id_at(pos) != Some(layer));
        sample
    }
}

/// Tracks whether the pointer was over the overlay last frame so crossings
/// can be reported as `Leave`.
#[derive(Debug, Default)]
pub struct OverlayPointer {
    inside: bool,
    last_pos: Option<Pos2>,
}

impl OverlayPointer {
    /// Translates a sample into events in the order a browser would fire
    /// them: move, then down or up, then leave. Only the part of `overlay`
    /// inside `clip` takes input.
    pub fn events(
        &mut self,
        sample: PointerSample,
        overlay: Rect,
        clip: Rect,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let visible = overlay.intersect(clip);
        let inside = !sample.covered && sample.pos.is_some_and(|pos| visible.contains(pos));

        if let Some(pos) = sample.pos.filter(|_| inside) {
            let point = ScreenPoint::new(pos.x, pos.y);
            if self.last_pos != Some(pos) {
                events.push(PointerEvent::Move(point));
            }
            if sample.pressed {
                events.push(PointerEvent::Down(point));
            }
            if sample.released {
                events.push(PointerEvent::Up(point));
            }
        }
        if self.inside && !inside {
            events.push(PointerEvent::Leave);
        }

        self.inside = inside;
        self.last_pos = sample.pos;
        events
    }
}

struct SurfaceTexture {
    name: &'static str,
    handle: Option<TextureHandle>,
    revision: Option<u64>,
}

impl SurfaceTexture {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: None,
            revision: None,
        }
    }

    /// Re-uploads the surface only when it changed since the last frame.
    fn sync(&mut self, ctx: &egui::Context, surface: &RasterSurface) -> egui::TextureId {
        let revision = surface.revision();
        let image = || {
            ColorImage::from_rgba_unmultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.rgba(),
            )
        };
        let id = match &mut self.handle {
            Some(handle) => {
                if self.revision != Some(revision) {
                    handle.set(image(), TextureOptions::NEAREST);
                }
                handle.id()
            }
            None => {
                let handle = ctx.load_texture(self.name, image(), TextureOptions::NEAREST);
                let id = handle.id();
                self.handle = Some(handle);
                id
            }
        };
        self.revision = Some(revision);
        id
    }
}

pub struct BoardView {
    base: SurfaceTexture,
    overlay: SurfaceTexture,
    pointer: OverlayPointer,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            base: SurfaceTexture::new("board-base"),
            overlay: SurfaceTexture::new("board-overlay"),
            pointer: OverlayPointer::default(),
        }
    }
}

impl BoardView {
    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut CanvasSession) {
        let (width, height) = (
            session.base_surface().width() as f32,
            session.base_surface().height() as f32,
        );
        let (base_rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
        session.set_surface_origin(ScreenPoint::new(base_rect.min.x, base_rect.min.y));

        let overlay_rect = |session: &CanvasSession| {
            let origin = session.overlay_origin();
            Rect::from_min_size(Pos2::new(origin.x, origin.y), base_rect.size())
        };

        let sample = PointerSample::read(ui.ctx(), ui.layer_id());
        for event in self.pointer.events(sample, overlay_rect(session), ui.clip_rect()) {
            session.handle_pointer(event);
        }

        let ctx = ui.ctx().clone();
        let base_id = self.base.sync(&ctx, session.base_surface());
        let overlay_id = self.overlay.sync(&ctx, session.overlay_surface());
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        let overlay_rect = overlay_rect(session);

        let painter = ui.painter_at(ui.clip_rect());
        painter.image(base_id, base_rect, uv, Color32::WHITE);
        painter.image(overlay_id, overlay_rect, uv, Color32::WHITE);
        painter.rect_stroke(overlay_rect, 0.0, OVERLAY_BORDER, StrokeKind::Outside);
    }
}
