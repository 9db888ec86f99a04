//! Application shell: drains backend events into the session and lays out
//! the board, controls, leaderboard and toasts.

use std::time::{Duration, Instant};

use client_core::{CanvasSession, FetchFamily, ListenerGuard, Notice, NoticeLevel};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::HexColor;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{err_label, UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::board::BoardView;

const TOAST_TTL: Duration = Duration::from_secs(3);
const MAX_TOASTS: usize = 4;

struct Toast {
    notice: Notice,
    shown_at: Instant,
}

pub struct PixelBoardApp {
    // dropped first so the overlay stops taking input before the session goes
    _listeners: ListenerGuard,
    session: CanvasSession,
    board: BoardView,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
    user: String,
    color: [u8; 3],
    toasts: Vec<Toast>,
}

impl PixelBoardApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let session = CanvasSession::default();
        let listeners = session.attach_pointer_listeners();
        Self {
            _listeners: listeners,
            session,
            board: BoardView::default(),
            cmd_tx,
            ui_rx,
            status: "Starting...".to_string(),
            user: String::new(),
            color: HexColor::BLACK.rgb(),
            toasts: Vec::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Sync(event) => {
                    self.session.apply_sync_event(event);
                }
                UiEvent::Submitted(notice) => self.push_toast(notice),
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        self.status = format!("{} error: {}", err_label(err.category()), err.message());
        if err.context() != UiErrorContext::Sync {
            self.push_toast(Notice::new(NoticeLevel::Error, self.status.clone()));
        }
    }

    fn push_toast(&mut self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "showing notice");
        self.toasts.push(Toast {
            notice,
            shown_at: Instant::now(),
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }

    fn submit(&mut self) {
        let [r, g, b] = self.color;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SubmitPixel {
                selection: self.session.selection(),
                user: self.user.clone(),
                color: HexColor::from_rgb(r, g, b),
            },
            &mut self.status,
        );
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Pixel");
        ui.label(self.session.status());
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Color");
            egui::color_picker::color_edit_button_srgb(ui, &mut self.color);
        });
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.add(egui::TextEdit::singleline(&mut self.user).hint_text("Enter your name"));
        });
        if ui.button("Update Pixel").clicked() {
            self.submit();
        }
        if ui.button("Refresh now").clicked() {
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Refresh, &mut self.status);
        }

        ui.separator();
        egui::CollapsingHeader::new("Leaderboard")
            .default_open(false)
            .show(ui, |ui| {
                let scoreboard = self.session.scoreboard();
                if scoreboard.is_empty() {
                    ui.weak("No pixels placed yet");
                }
                for entry in scoreboard.entries() {
                    ui.label(format!("{}: {} pixels", entry.user, entry.score));
                }
            });
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(&self.status);
            for (family, what) in [
                (FetchFamily::Grid, "board"),
                (FetchFamily::Scoreboard, "leaderboard"),
            ] {
                let Some(error) = self.session.sync_error(family) else {
                    continue;
                };
                let err = UiError::from_message(UiErrorContext::Sync, error);
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(175, 96, 96),
                    format!(
                        "{} error while refreshing {what}: {}",
                        err_label(err.category()),
                        err.message()
                    ),
                );
            }
        });
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        self.toasts.retain(|toast| toast.shown_at.elapsed() < TOAST_TTL);
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let fill = match toast.notice.level {
                        NoticeLevel::Success => egui::Color32::from_rgb(46, 125, 50),
                        NoticeLevel::Info => egui::Color32::from_rgb(2, 119, 189),
                        NoticeLevel::Warning => egui::Color32::from_rgb(239, 108, 0),
                        NoticeLevel::Error => egui::Color32::from_rgb(111, 53, 53),
                    };
                    egui::Frame::new()
                        .fill(fill)
                        .corner_radius(8)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&toast.notice.message)
                                    .color(egui::Color32::WHITE),
                            );
                        });
                    ui.add_space(6.0);
                }
            });
    }
}

impl eframe::App for PixelBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.show_status_bar(ui));
        egui::SidePanel::right("controls")
            .resizable(false)
            .min_width(220.0)
            .show(ctx, |ui| self.show_controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            self.board.show(ui, &mut self.session);
        });
        self.show_toasts(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl Drop for PixelBoardApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
