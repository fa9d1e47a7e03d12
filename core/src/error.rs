use thiserror::Error;

use crate::connector::PieceId;
use crate::grid::Zone;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown connector shape {0:?}")]
pub struct UnknownShape(pub String);

#[derive(Clone, Debug, PartialEq, Error)]
pub enum PuzzleError {
    #[error("puzzle grid must have between 1 and {} pieces, got {cols}x{rows}", crate::engine::MAX_PIECES)]
    InvalidGrid { cols: usize, rows: usize },
    #[error("source image must have a positive finite size, got {width}x{height}")]
    InvalidImage { width: f32, height: f32 },
    #[error("{zone} slot ({col}, {row}) is outside the {cols}x{rows} grid")]
    SlotOutOfRange {
        zone: Zone,
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    },
    #[error("{zone} slot ({col}, {row}) already holds piece {occupant}")]
    SlotOccupied {
        zone: Zone,
        col: usize,
        row: usize,
        occupant: PieceId,
    },
    #[error("no piece with id {0}")]
    UnknownPiece(PieceId),
}
