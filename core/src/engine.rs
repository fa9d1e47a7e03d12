use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::PuzzleOptions;
use crate::connector::{ConnectorGraph, PieceId};
use crate::drag::{DragController, DragOutcome, DragState};
use crate::error::{PuzzleError, UnknownShape};
use crate::geom::{Affine, Point, Rect};
use crate::grid::{SlotRef, Zone};
use crate::layout::{compute_layout, LayoutParams, Viewport, ZoneLayout};
use crate::scene::{shadow_class, BorderRect, PieceDef, PieceUse, Scene, ShadowUse};
use crate::shape::{ConnectorShape, GeometryGenerator, PieceMetrics};

/// A pointer event as delivered by the host: a client-space position and
/// the matrix mapping client space to puzzle space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub client: Point,
    pub client_to_local: Affine,
}

impl PointerEvent {
    pub fn new(client: Point, client_to_local: Affine) -> Self {
        Self {
            client,
            client_to_local,
        }
    }

    /// Event whose client space already is puzzle space.
    pub fn local_at(p: Point) -> Self {
        Self::new(p, Affine::IDENTITY)
    }

    pub fn local(&self) -> Point {
        self.client_to_local.transform_point(self.client)
    }
}

pub const MAX_PIECES: usize = 1 << 20;

#[derive(Clone, Debug)]
pub struct PuzzleEngine {
    source: Rect,
    generator: GeometryGenerator,
    params: LayoutParams,
    graph: ConnectorGraph,
    board: Board,
    drag: DragController,
    layout: ZoneLayout,
    shape_warning: Option<UnknownShape>,
}

impl PuzzleEngine {
    /// Builds the pieces in solved order inside the tile grid and lays the
    /// board out for `viewport`. The assembly grid starts empty.
    pub fn new<R: Rng + ?Sized>(
        source: Rect,
        cols: usize,
        rows: usize,
        options: &PuzzleOptions,
        viewport: Viewport,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let pieces = cols.checked_mul(rows).unwrap_or(usize::MAX);
        if pieces == 0 || pieces > MAX_PIECES {
            return Err(PuzzleError::InvalidGrid { cols, rows });
        }
        let valid_size = |v: f32| v.is_finite() && v > 0.0;
        if !valid_size(source.width) || !valid_size(source.height) {
            return Err(PuzzleError::InvalidImage {
                width: source.width,
                height: source.height,
            });
        }
        let (shape, shape_warning) = options.shape();
        let params = options.layout_params();
        let metrics = PieceMetrics::for_grid(source, cols, rows, params.connector_ratio);
        let generator = GeometryGenerator::new(metrics, shape);
        let graph = ConnectorGraph::build(cols, rows, rng);
        let board = Board::new(&graph, &generator);
        let layout = compute_layout(viewport, source, cols, rows, &params);
        let mut engine = Self {
            source,
            generator,
            params,
            graph,
            board,
            drag: DragController::default(),
            layout,
            shape_warning,
        };
        engine.apply_layout();
        log::debug!(
            "built {cols}x{rows} puzzle with {shape} connectors over {}x{} source",
            source.width,
            source.height
        );
        Ok(engine)
    }

    pub fn cols(&self) -> usize {
        self.graph.cols()
    }

    pub fn rows(&self) -> usize {
        self.graph.rows()
    }

    pub fn source(&self) -> Rect {
        self.source
    }

    pub fn metrics(&self) -> &PieceMetrics {
        self.generator.metrics()
    }

    pub fn shape(&self) -> ConnectorShape {
        self.generator.shape()
    }

    pub fn shape_warning(&self) -> Option<&UnknownShape> {
        self.shape_warning.as_ref()
    }

    pub fn graph(&self) -> &ConnectorGraph {
        &self.graph
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Any drag in progress is abandoned.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.drag.reset();
        self.board.shuffle(rng);
    }

    pub fn do_layout(&mut self, viewport: Viewport) {
        self.layout = compute_layout(
            viewport,
            self.source,
            self.cols(),
            self.rows(),
            &self.params,
        );
        self.apply_layout();
    }

    fn apply_layout(&mut self) {
        self.board
            .do_layout(self.layout.tile_grid, self.layout.assembly_grid);
    }

    pub fn is_landscape(&self) -> bool {
        self.layout.landscape
    }

    pub fn needs_layout(&self, viewport: Viewport) -> bool {
        viewport.is_landscape() != self.is_landscape()
    }

    /// Re-runs layout only when the orientation flips. Returns whether it did.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !self.needs_layout(viewport) {
            return false;
        }
        self.do_layout(viewport);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.board.is_solved()
    }

    pub fn piece_at(&self, slot: SlotRef) -> Option<PieceId> {
        self.board.piece_at(slot)
    }

    pub fn place(&mut self, piece: PieceId, slot: SlotRef) -> Result<(), PuzzleError> {
        self.board.place(piece, slot)
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> DragOutcome {
        self.pointer_down_at(event.local())
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> DragOutcome {
        self.pointer_move_at(event.local())
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> DragOutcome {
        self.pointer_up_at(event.local())
    }

    pub fn pointer_down_at(&mut self, p: Point) -> DragOutcome {
        self.drag.pointer_down(&mut self.board, p)
    }

    pub fn pointer_move_at(&mut self, p: Point) -> DragOutcome {
        self.drag.pointer_move(&mut self.board, p)
    }

    pub fn pointer_up_at(&mut self, p: Point) -> DragOutcome {
        self.drag.pointer_up(&mut self.board, p)
    }

    pub fn scene(&self) -> Scene {
        let metrics = self.metrics();
        let pieces = self.board.pieces();
        let piece_defs = pieces
            .iter()
            .map(|piece| PieceDef {
                label: piece.label(),
                path_data: piece.outline.to_path_data(),
                clip_offset: Point::ORIGIN
                    - self.source.origin()
                    - Point::new(piece.col as f32, piece.row as f32)
                        .scale(metrics.piece_width, metrics.piece_height),
            })
            .collect();
        let assembly = self.board.grid(Zone::Assembly);
        let assembly_shadows = assembly
            .iter()
            .filter_map(|(col, row, slot)| {
                let shadow = slot.shadow()?;
                let label = self.board.piece(self.graph.piece_id(col, row))?.label();
                Some(ShadowUse {
                    label,
                    position: shadow.position,
                    class: shadow_class(true, shadow.selected),
                })
            })
            .collect();
        let tile_shadows = pieces
            .iter()
            .map(|piece| ShadowUse {
                label: piece.label(),
                position: piece.shadow().position,
                class: shadow_class(false, piece.shadow().selected),
            })
            .collect();
        let piece_uses = self
            .board
            .z_order()
            .iter()
            .filter_map(|&id| self.board.piece(id))
            .map(|piece| PieceUse {
                label: piece.label(),
                position: piece.position(),
            })
            .collect();
        Scene {
            view_box: self.layout.view_box,
            source_view_box: self.source,
            assembly_border: BorderRect {
                rect: self.layout.assembly_border,
                radius: self.layout.corner_radius,
            },
            assembly_content: self.layout.puzzle,
            piece_defs,
            assembly_shadows,
            tile_shadows,
            pieces: piece_uses,
        }
    }
}
