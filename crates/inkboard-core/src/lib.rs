//! Inkboard Core Library
//!
//! Platform-agnostic document model, editing operations and interaction
//! logic for the Inkboard whiteboard. Drawing is left to the host through
//! [`view::ViewSink`].

pub mod board;
pub mod camera;
pub mod config;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod history;
pub mod image_source;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shortcuts;
pub mod snap;
pub mod tools;
pub mod view;

pub use board::{Alignment, Board, BoardData, BoardEvent, Direction, ElementUpdate};
pub use camera::{Camera, Transform};
pub use config::EngineConfig;
pub use elements::{Element, ElementId, ElementKind, ElementRegistry, ElementType, ShapeKind};
pub use error::{BoardError, ConfigError, ImageError, ImageResult};
pub use history::{HistoryInfo, HistoryManager};
pub use image_source::{AcquiredImage, DataUrlImageSource, ImageSource, MemoryImageSource};
#[cfg(not(target_arch = "wasm32"))]
pub use image_source::FileImageSource;
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{EditRequest, ImageRequest, Interaction, InteractionRequest, InteractionState};
pub use selection::{Handle, HandleKind};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use snap::{GRID_SIZE, snap_to_grid};
pub use tools::{ToolKind, ToolManager};
pub use view::{RenderScheduler, ViewSink, ViewSynchronizer};
