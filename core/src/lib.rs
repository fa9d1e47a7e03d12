pub mod board;
pub mod catalog;
pub mod config;
pub mod connector;
pub mod drag;
pub mod engine;
pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;
pub mod scene;
pub mod shape;

pub use board::{Board, Piece};
pub use catalog::{
    difficulty, difficulty_by_label, difficulty_index, Difficulty, LevelCursor,
    DEFAULT_DIFFICULTY, DIFFICULTIES,
};
pub use config::PuzzleOptions;
pub use connector::{Connector, ConnectorGraph, ConnectorId, EdgeState, PieceId, Side};
pub use drag::{DragController, DragOutcome, DragSession, DragState};
pub use engine::{PointerEvent, PuzzleEngine, MAX_PIECES};
pub use error::{PuzzleError, UnknownShape};
pub use geom::{Affine, Point, Rect};
pub use grid::{Grid, Shadow, Slot, SlotRef, Zone, ZoneGeometry};
pub use layout::{compute_layout, LayoutParams, Viewport, ZoneLayout};
pub use scene::{BorderRect, PieceDef, PieceUse, Scene, ShadowUse};
pub use shape::{ConnectorShape, GeometryGenerator, Outline, PathCommand, PieceMetrics};
