use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::connector::{ConnectorGraph, EdgeState, PieceId};
use crate::error::PuzzleError;
use crate::geom::Point;
use crate::grid::{Grid, Shadow, SlotRef, Zone, ZoneGeometry};
use crate::shape::{GeometryGenerator, Outline};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    /// Original (solved) coordinates.
    pub col: usize,
    pub row: usize,
    pub edges: [EdgeState; 4],
    pub outline: Outline,
    position: Point,
    slot: SlotRef,
    /// Drop hint borrowed by tile slots, which have none of their own.
    shadow: Shadow,
}

impl Piece {
    pub fn label(&self) -> String {
        format!("{}-{}", self.col, self.row)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn slot(&self) -> SlotRef {
        self.slot
    }

    pub fn shadow(&self) -> &Shadow {
        &self.shadow
    }

    pub fn is_home(&self) -> bool {
        self.slot == SlotRef::assembly(self.col, self.row)
    }
}

/// Pieces plus the two grids that hold them. Every piece sits in exactly one
/// slot and slots point back at the piece they hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cols: usize,
    rows: usize,
    pieces: Vec<Piece>,
    tiles: Grid,
    assembly: Grid,
    z_order: Vec<PieceId>,
}

impl Board {
    /// Every piece starts in the tile slot matching its own coordinates.
    pub fn new(graph: &ConnectorGraph, generator: &GeometryGenerator) -> Self {
        let cols = graph.cols();
        let rows = graph.rows();
        let mut tiles = Grid::new(Zone::Tile, cols, rows, false);
        let assembly = Grid::new(Zone::Assembly, cols, rows, true);
        let mut pieces = Vec::with_capacity(graph.piece_count());
        for id in 0..graph.piece_count() {
            let (col, row) = graph.coords(id);
            let edges = graph.edge_states(id);
            pieces.push(Piece {
                id,
                col,
                row,
                edges,
                outline: generator.outline(edges),
                position: Point::ORIGIN,
                slot: SlotRef::tile(col, row),
                shadow: Shadow::default(),
            });
            let placed = tiles.set_piece(col, row, Some(id));
            debug_assert!(placed.is_ok(), "tile ({col}, {row}) rejected piece {id}: {placed:?}");
        }
        Self {
            cols,
            rows,
            z_order: (0..pieces.len()).collect(),
            pieces,
            tiles,
            assembly,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// Back to front.
    pub fn z_order(&self) -> &[PieceId] {
        &self.z_order
    }

    pub fn grid(&self, zone: Zone) -> &Grid {
        match zone {
            Zone::Tile => &self.tiles,
            Zone::Assembly => &self.assembly,
        }
    }

    fn grid_mut(&mut self, zone: Zone) -> &mut Grid {
        match zone {
            Zone::Tile => &mut self.tiles,
            Zone::Assembly => &mut self.assembly,
        }
    }

    pub fn piece_at(&self, slot: SlotRef) -> Option<PieceId> {
        self.grid(slot.zone).get_piece(slot.col, slot.row)
    }

    pub fn slot_position(&self, slot: SlotRef) -> Point {
        self.grid(slot.zone).slot_position(slot.col, slot.row)
    }

    /// Tile grid first, then the assembly grid.
    pub fn hit_test(&self, p: Point) -> Option<SlotRef> {
        self.tiles.hit_test(p).or_else(|| self.assembly.hit_test(p))
    }

    /// Moves `id` into `slot`, vacating the slot it came from. The target must
    /// be empty or already hold `id`.
    pub fn place(&mut self, id: PieceId, slot: SlotRef) -> Result<(), PuzzleError> {
        let from = self
            .pieces
            .get(id)
            .map(|piece| piece.slot)
            .ok_or(PuzzleError::UnknownPiece(id))?;
        let grid = self.grid_mut(slot.zone);
        match grid.get_piece(slot.col, slot.row) {
            Some(occupant) if occupant != id => {
                return Err(PuzzleError::SlotOccupied {
                    zone: slot.zone,
                    col: slot.col,
                    row: slot.row,
                    occupant,
                });
            }
            _ => {}
        }
        grid.set_piece(slot.col, slot.row, Some(id))?;
        if from != slot {
            self.grid_mut(from.zone).set_piece(from.col, from.row, None)?;
        }
        let position = self.slot_position(slot);
        let piece = &mut self.pieces[id];
        piece.slot = slot;
        piece.position = position;
        Ok(())
    }

    pub fn set_piece_position(&mut self, id: PieceId, position: Point) {
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.position = position;
        }
    }

    pub fn snap_back(&mut self, id: PieceId) {
        if let Some(slot) = self.pieces.get(id).map(|piece| piece.slot) {
            let position = self.slot_position(slot);
            self.pieces[id].position = position;
        }
    }

    pub fn bring_to_front(&mut self, id: PieceId) {
        if id >= self.pieces.len() {
            return;
        }
        self.z_order.retain(|&other| other != id);
        self.z_order.push(id);
    }

    /// Highlights `slot` as a drop candidate for `dragged`. Slots without a
    /// shadow of their own borrow the dragged piece's tile shadow.
    pub fn set_highlight(&mut self, slot: SlotRef, dragged: PieceId, selected: bool) {
        if self.grid_mut(slot.zone).set_selected(slot.col, slot.row, selected) {
            return;
        }
        let position = self.slot_position(slot);
        if let Some(piece) = self.pieces.get_mut(dragged) {
            piece.shadow = Shadow { position, selected };
        }
    }

    /// Empties the assembly grid and deals every piece into the tile grid
    /// by repeatedly drawing from the remaining pool.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.assembly.clear();
        self.tiles.clear();
        let mut pool: Vec<PieceId> = (0..self.pieces.len()).collect();
        for col in 0..self.cols {
            for row in 0..self.rows {
                let id = pool.remove(rng.random_range(0..pool.len()));
                let placed = self.tiles.set_piece(col, row, Some(id));
                debug_assert!(placed.is_ok(), "tile ({col}, {row}) rejected piece {id}: {placed:?}");
                let position = self.tiles.slot_position(col, row);
                let piece = &mut self.pieces[id];
                piece.slot = SlotRef::tile(col, row);
                piece.position = position;
                piece.shadow.selected = false;
            }
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.assembly.set_selected(col, row, false);
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        self.assembly.iter().all(|(col, row, slot)| {
            slot.piece()
                .and_then(|id| self.pieces.get(id))
                .is_some_and(|piece| piece.col == col && piece.row == row)
        })
    }

    pub fn do_layout(&mut self, tiles: ZoneGeometry, assembly: ZoneGeometry) {
        self.tiles.do_layout(tiles);
        self.assembly.do_layout(assembly);
        for index in 0..self.pieces.len() {
            let slot = self.pieces[index].slot;
            self.pieces[index].position = self.slot_position(slot);
        }
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen = vec![0usize; self.pieces.len()];
        for zone in [Zone::Tile, Zone::Assembly] {
            for (col, row, slot) in self.grid(zone).iter() {
                let Some(id) = slot.piece() else {
                    continue;
                };
                let piece = self
                    .pieces
                    .get(id)
                    .ok_or_else(|| format!("{zone} slot ({col}, {row}) holds unknown piece {id}"))?;
                let here = SlotRef::new(zone, col, row);
                if piece.slot != here {
                    return Err(format!(
                        "piece {} is recorded at {} but found at {here}",
                        piece.label(),
                        piece.slot
                    ));
                }
                seen[id] += 1;
            }
        }
        if let Some(id) = seen.iter().position(|&count| count != 1) {
            return Err(format!("piece {id} occupies {} slots", seen[id]));
        }
        let mut order = self.z_order.clone();
        order.sort_unstable();
        if order != (0..self.pieces.len()).collect::<Vec<_>>() {
            return Err("render order is not a permutation of the pieces".to_string());
        }
        Ok(())
    }
}
