use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::connector::PieceId;
use crate::geom::Point;
use crate::grid::SlotRef;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub piece: PieceId,
    pub source: SlotRef,
    pub candidate: Option<SlotRef>,
    /// Pointer position relative to the piece's top-left corner.
    pub offset: Point,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DragOutcome {
    Ignored,
    Started {
        piece: PieceId,
        from: SlotRef,
    },
    Moved {
        piece: PieceId,
        candidate: Option<SlotRef>,
    },
    Dropped {
        piece: PieceId,
        from: SlotRef,
        to: SlotRef,
        complete: bool,
    },
    Returned {
        piece: PieceId,
        slot: SlotRef,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// A second press while dragging finishes the drag as a release would.
    pub fn pointer_down(&mut self, board: &mut Board, p: Point) -> DragOutcome {
        if self.is_dragging() {
            return self.pointer_up(board, p);
        }
        let Some(source) = board.hit_test(p) else {
            return DragOutcome::Ignored;
        };
        let Some(piece) = board.piece_at(source) else {
            return DragOutcome::Ignored;
        };
        let offset = p - board.slot_position(source);
        board.bring_to_front(piece);
        log::debug!("drag start: piece {piece} from {source}");
        self.state = DragState::Dragging(DragSession {
            piece,
            source,
            candidate: None,
            offset,
        });
        DragOutcome::Started {
            piece,
            from: source,
        }
    }

    pub fn pointer_move(&mut self, board: &mut Board, p: Point) -> DragOutcome {
        let DragState::Dragging(session) = &mut self.state else {
            return DragOutcome::Ignored;
        };
        if let Some(previous) = session.candidate.take() {
            board.set_highlight(previous, session.piece, false);
        }
        let source = session.source;
        session.candidate = board
            .hit_test(p)
            .filter(|&slot| slot == source || board.piece_at(slot).is_none());
        if let Some(candidate) = session.candidate {
            board.set_highlight(candidate, session.piece, true);
        }
        board.set_piece_position(session.piece, p - session.offset);
        DragOutcome::Moved {
            piece: session.piece,
            candidate: session.candidate,
        }
    }

    /// The drop target is the last valid candidate seen while moving.
    pub fn pointer_up(&mut self, board: &mut Board, _p: Point) -> DragOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DragOutcome::Ignored;
        };
        let Some(candidate) = session.candidate else {
            board.snap_back(session.piece);
            log::debug!("drag end: piece {} returned to {}", session.piece, session.source);
            return DragOutcome::Returned {
                piece: session.piece,
                slot: session.source,
            };
        };
        board.set_highlight(candidate, session.piece, false);
        if let Err(err) = board.place(session.piece, candidate) {
            log::warn!("drop rejected: {err}");
            board.snap_back(session.piece);
            return DragOutcome::Returned {
                piece: session.piece,
                slot: session.source,
            };
        }
        let complete = board.is_solved();
        log::debug!(
            "drag end: piece {} moved {} -> {candidate}",
            session.piece,
            session.source
        );
        if complete {
            log::info!("puzzle complete");
        }
        DragOutcome::Dropped {
            piece: session.piece,
            from: session.source,
            to: candidate,
            complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ConnectorGraph;
    use crate::grid::ZoneGeometry;
    use crate::shape::{ConnectorShape, GeometryGenerator, PieceMetrics};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Tiles at x in [100, 120), assembly at x in [0, 20); cells are 10 wide.
    fn board() -> Board {
        let graph = ConnectorGraph::build(2, 2, &mut StdRng::seed_from_u64(1));
        let generator =
            GeometryGenerator::new(PieceMetrics::new(10.0, 10.0, 0.15), ConnectorShape::Spline);
        let mut board = Board::new(&graph, &generator);
        board.do_layout(
            ZoneGeometry::new(Point::new(100.0, 0.0), 10.0, 10.0),
            ZoneGeometry::new(Point::ORIGIN, 10.0, 10.0),
        );
        board
    }

    #[test]
    fn press_on_empty_space_is_ignored() {
        let mut board = board();
        let mut drag = DragController::default();
        assert_eq!(drag.pointer_down(&mut board, Point::new(50.0, 5.0)), DragOutcome::Ignored);
        assert_eq!(drag.pointer_down(&mut board, Point::new(5.0, 5.0)), DragOutcome::Ignored);
        assert!(!drag.is_dragging());
        assert_eq!(drag.pointer_move(&mut board, Point::new(5.0, 5.0)), DragOutcome::Ignored);
        assert_eq!(drag.pointer_up(&mut board, Point::new(5.0, 5.0)), DragOutcome::Ignored);
    }

    #[test]
    fn drag_follows_pointer_and_drops_on_empty_slot() {
        let mut board = board();
        let mut drag = DragController::default();
        let started = drag.pointer_down(&mut board, Point::new(113.0, 4.0));
        assert_eq!(
            started,
            DragOutcome::Started {
                piece: 1,
                from: SlotRef::tile(1, 0)
            }
        );
        assert_eq!(board.z_order().last(), Some(&1));
        let moved = drag.pointer_move(&mut board, Point::new(14.0, 6.0));
        assert_eq!(
            moved,
            DragOutcome::Moved {
                piece: 1,
                candidate: Some(SlotRef::assembly(1, 0))
            }
        );
        assert_eq!(board.piece(1).map(|p| p.position()), Some(Point::new(11.0, 2.0)));
        let dropped = drag.pointer_up(&mut board, Point::new(14.0, 6.0));
        assert_eq!(
            dropped,
            DragOutcome::Dropped {
                piece: 1,
                from: SlotRef::tile(1, 0),
                to: SlotRef::assembly(1, 0),
                complete: false
            }
        );
        assert_eq!(board.piece(1).map(|p| p.position()), Some(Point::new(10.0, 0.0)));
        board.check_invariants().expect("invariants");
    }

    #[test]
    fn occupied_slot_is_not_a_candidate() {
        let mut board = board();
        let mut drag = DragController::default();
        drag.pointer_down(&mut board, Point::new(101.0, 1.0));
        let moved = drag.pointer_move(&mut board, Point::new(111.0, 1.0));
        assert_eq!(
            moved,
            DragOutcome::Moved {
                piece: 0,
                candidate: None
            }
        );
        let released = drag.pointer_up(&mut board, Point::new(111.0, 1.0));
        assert_eq!(
            released,
            DragOutcome::Returned {
                piece: 0,
                slot: SlotRef::tile(0, 0)
            }
        );
        assert_eq!(board.piece(0).map(|p| p.position()), Some(Point::new(100.0, 0.0)));
        assert_eq!(board.piece_at(SlotRef::tile(0, 0)), Some(0));
    }

    #[test]
    fn highlight_follows_candidate() {
        let mut board = board();
        let mut drag = DragController::default();
        drag.pointer_down(&mut board, Point::new(101.0, 1.0));
        drag.pointer_move(&mut board, Point::new(1.0, 1.0));
        let selected = |board: &Board, col, row| {
            board
                .grid(crate::grid::Zone::Assembly)
                .slot(col, row)
                .and_then(|slot| slot.shadow())
                .map(|shadow| shadow.selected)
        };
        assert_eq!(selected(&board, 0, 0), Some(true));
        drag.pointer_move(&mut board, Point::new(1.0, 11.0));
        assert_eq!(selected(&board, 0, 0), Some(false));
        assert_eq!(selected(&board, 0, 1), Some(true));
        drag.pointer_up(&mut board, Point::new(1.0, 11.0));
        assert_eq!(selected(&board, 0, 1), Some(false));
    }

    #[test]
    fn second_press_while_dragging_acts_as_release() {
        let mut board = board();
        let mut drag = DragController::default();
        drag.pointer_down(&mut board, Point::new(101.0, 1.0));
        drag.pointer_move(&mut board, Point::new(1.0, 1.0));
        let outcome = drag.pointer_down(&mut board, Point::new(1.0, 1.0));
        assert!(matches!(outcome, DragOutcome::Dropped { to, .. } if to == SlotRef::assembly(0, 0)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn dropping_on_source_keeps_the_piece() {
        let mut board = board();
        let mut drag = DragController::default();
        drag.pointer_down(&mut board, Point::new(101.0, 1.0));
        drag.pointer_move(&mut board, Point::new(103.0, 2.0));
        let outcome = drag.pointer_up(&mut board, Point::new(103.0, 2.0));
        assert!(matches!(outcome, DragOutcome::Dropped { from, to, .. } if from == to));
        assert_eq!(board.piece_at(SlotRef::tile(0, 0)), Some(0));
        board.check_invariants().expect("invariants");
    }
}
