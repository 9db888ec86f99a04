//! UI layer for the board GUI: app shell and the board view.

pub mod app;
pub mod board;

pub use app::PixelBoardApp;
