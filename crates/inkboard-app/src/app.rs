//! Headless application: load, edit, summarize and save a board.

use inkboard_core::{
    Board, ConfigError, ElementId, ElementRegistry, EngineConfig, FileImageSource, ImageError,
    ImageRequest, ImageSource, Interaction, InteractionRequest, MouseButton, PointerEvent,
    ToolKind,
};
use clap::Parser;
use kurbo::{Point, Rect};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop the shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{} is not a valid board file", .0.display())]
    InvalidBoard(PathBuf),
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application configuration, taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(name = "inkboard", version, about = "Load, edit and save whiteboard files")]
pub struct AppConfig {
    /// Board file to load.
    #[arg(value_name = "BOARD")]
    pub board_path: Option<PathBuf>,
    /// Engine settings as JSON.
    #[arg(short, long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
    /// Image to insert at the viewport center. May be repeated.
    #[arg(short, long = "image", value_name = "FILE")]
    pub images: Vec<PathBuf>,
    /// Where to save the resulting board.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Print the keyboard shortcuts and exit.
    #[arg(long = "shortcuts")]
    pub list_shortcuts: bool,
}

/// What ended up on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSummary {
    pub elements: usize,
    pub by_type: BTreeMap<&'static str, usize>,
    pub bounds: Option<Rect>,
    pub zoom: f64,
    pub history_entries: usize,
}

impl fmt::Display for BoardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} elements", self.elements)?;
        for (kind, count) in &self.by_type {
            writeln!(f, "  {:10} {}", kind, count)?;
        }
        if let Some(b) = self.bounds {
            writeln!(
                f,
                "bounds: ({:.0}, {:.0}) to ({:.0}, {:.0})",
                b.x0, b.y0, b.x1, b.y1
            )?;
        }
        write!(f, "zoom: {:.2}, history: {}", self.zoom, self.history_entries)
    }
}

/// Main application state.
pub struct App {
    board: Board,
    interaction: Interaction,
}

impl App {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            board: Board::new(engine, ElementRegistry::with_defaults()),
            interaction: Interaction::new(),
        }
    }

    /// Run the shell once over `config`.
    pub async fn run(config: AppConfig) -> Result<BoardSummary, AppError> {
        let engine = match &config.config_path {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        let mut app = App::new(engine);

        if let Some(path) = &config.board_path {
            app.load_board(path)?;
        }

        let source = FileImageSource::new();
        for path in &config.images {
            if let Err(e) = app.insert_image(&source, path).await {
                log::warn!("Skipping {}: {}", path.display(), e);
            }
        }

        app.board.fit_to_content();
        let summary = app.summary();
        println!("{}", summary);

        if let Some(path) = &config.output {
            app.save_board(path)?;
        }
        Ok(summary)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn load_board(&mut self, path: &Path) -> Result<usize, AppError> {
        let json = std::fs::read_to_string(path)?;
        let count = self
            .board
            .from_json(&json)
            .ok_or_else(|| AppError::InvalidBoard(path.to_path_buf()))?;
        log::info!("Loaded {} elements from {}", count, path.display());
        Ok(count)
    }

    pub fn save_board(&self, path: &Path) -> Result<(), AppError> {
        std::fs::write(path, self.board.to_json()?)?;
        log::info!("Saved board to {}", path.display());
        Ok(())
    }

    /// Insert an image the way the image tool does, at the viewport center.
    pub async fn insert_image(&mut self, source: &dyn ImageSource, path: &Path) -> Result<ElementId, AppError> {
        let viewport = self.board.viewport();
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.interaction.set_tool(ToolKind::Image);
        let down = PointerEvent::Down {
            position: center,
            button: MouseButton::Left,
        };
        let request = match self.interaction.handle_pointer_event(&mut self.board, down) {
            Some(InteractionRequest::Image(request)) => request,
            _ => ImageRequest {
                position: self.board.screen_to_canvas(center),
            },
        };
        self.interaction.handle_pointer_event(
            &mut self.board,
            PointerEvent::Up {
                position: center,
                button: MouseButton::Left,
            },
        );

        let reference = path.to_string_lossy();
        let result = source.acquire(&reference).await;
        let id = self.interaction.complete_image(&mut self.board, request, result)?;
        Ok(id)
    }

    pub fn summary(&self) -> BoardSummary {
        let mut by_type = BTreeMap::new();
        for element in self.board.elements() {
            *by_type.entry(element.element_type().as_str()).or_insert(0) += 1;
        }
        BoardSummary {
            elements: self.board.len(),
            by_type,
            bounds: self.board.content_bounds(),
            zoom: self.board.zoom(),
            history_entries: self.board.history_info().len,
        }
    }
}
