//! Inkboard Application
//!
//! A headless shell around the core engine: loads a board, inserts images,
//! fits the view and writes the result back out.

mod app;
mod shortcuts;

pub use app::{App, AppConfig, AppError, BoardSummary};
pub use shortcuts::ShortcutRegistry;
