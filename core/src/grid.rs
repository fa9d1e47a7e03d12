use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connector::PieceId;
use crate::error::PuzzleError;
use crate::geom::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Tile,
    Assembly,
}

impl Zone {
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Tile => "tile",
            Zone::Assembly => "assembly",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub zone: Zone,
    pub col: usize,
    pub row: usize,
}

impl SlotRef {
    pub fn new(zone: Zone, col: usize, row: usize) -> Self {
        Self { zone, col, row }
    }

    pub fn tile(col: usize, row: usize) -> Self {
        Self::new(Zone::Tile, col, row)
    }

    pub fn assembly(col: usize, row: usize) -> Self {
        Self::new(Zone::Assembly, col, row)
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.zone, self.col, self.row)
    }
}

/// Where a zone renders: slot `(u, v)` sits at `origin + (u * cell_width, v * cell_height)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneGeometry {
    pub origin: Point,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl ZoneGeometry {
    pub fn new(origin: Point, cell_width: f32, cell_height: f32) -> Self {
        Self {
            origin,
            cell_width,
            cell_height,
        }
    }

    pub fn cell_position(&self, col: usize, row: usize) -> Point {
        self.origin + Point::new(col as f32, row as f32).scale(self.cell_width, self.cell_height)
    }

    /// Floor division into cell coordinates, half-open on both axes.
    pub fn locate(&self, p: Point, cols: usize, rows: usize) -> Option<(usize, usize)> {
        let local = p - self.origin;
        let cell = Point::new(local.x / self.cell_width, local.y / self.cell_height).floor();
        let inside = cell.x >= 0.0
            && cell.x < cols as f32
            && cell.y >= 0.0
            && cell.y < rows as f32;
        inside.then(|| (cell.x as usize, cell.y as usize))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub position: Point,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    piece: Option<PieceId>,
    shadow: Option<Shadow>,
}

impl Slot {
    pub fn piece(&self) -> Option<PieceId> {
        self.piece
    }

    pub fn shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    zone: Zone,
    cols: usize,
    rows: usize,
    geometry: ZoneGeometry,
    slots: Vec<Slot>,
}

impl Grid {
    /// `with_shadows` gives every slot its own drop hint.
    pub fn new(zone: Zone, cols: usize, rows: usize, with_shadows: bool) -> Self {
        let slot = Slot {
            piece: None,
            shadow: with_shadows.then(Shadow::default),
        };
        Self {
            zone,
            cols,
            rows,
            geometry: ZoneGeometry::default(),
            slots: vec![slot; cols * rows],
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn geometry(&self) -> &ZoneGeometry {
        &self.geometry
    }

    fn index(&self, col: usize, row: usize) -> Result<usize, PuzzleError> {
        if col < self.cols && row < self.rows {
            Ok(row * self.cols + col)
        } else {
            Err(PuzzleError::SlotOutOfRange {
                zone: self.zone,
                col,
                row,
                cols: self.cols,
                rows: self.rows,
            })
        }
    }

    pub fn slot(&self, col: usize, row: usize) -> Option<&Slot> {
        self.index(col, row).ok().map(|index| &self.slots[index])
    }

    pub fn slot_ref(&self, col: usize, row: usize) -> SlotRef {
        SlotRef::new(self.zone, col, row)
    }

    pub fn get_piece(&self, col: usize, row: usize) -> Option<PieceId> {
        self.slot(col, row).and_then(Slot::piece)
    }

    /// Replaces the occupant and returns the previous one.
    pub fn set_piece(
        &mut self,
        col: usize,
        row: usize,
        piece: Option<PieceId>,
    ) -> Result<Option<PieceId>, PuzzleError> {
        let index = self.index(col, row)?;
        Ok(std::mem::replace(&mut self.slots[index].piece, piece))
    }

    pub fn slot_position(&self, col: usize, row: usize) -> Point {
        self.geometry.cell_position(col, row)
    }

    pub fn hit_test(&self, p: Point) -> Option<SlotRef> {
        self.geometry
            .locate(p, self.cols, self.rows)
            .map(|(col, row)| self.slot_ref(col, row))
    }

    /// Returns false when the slot has no shadow of its own.
    pub fn set_selected(&mut self, col: usize, row: usize, selected: bool) -> bool {
        let position = self.slot_position(col, row);
        let Ok(index) = self.index(col, row) else {
            return false;
        };
        match self.slots[index].shadow.as_mut() {
            Some(shadow) => {
                shadow.position = position;
                shadow.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn do_layout(&mut self, geometry: ZoneGeometry) {
        self.geometry = geometry;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let position = geometry.cell_position(col, row);
                if let Some(shadow) = self.slots[row * self.cols + col].shadow.as_mut() {
                    shadow.position = position;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.piece = None;
        }
    }

    /// Slots in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(move |(index, slot)| (index % self.cols, index / self.cols, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        let mut grid = Grid::new(Zone::Assembly, 3, 2, true);
        grid.do_layout(ZoneGeometry::new(Point::new(10.0, 20.0), 50.0, 40.0));
        grid
    }

    #[test]
    fn hit_test_is_half_open() {
        let grid = grid();
        assert_eq!(grid.hit_test(Point::new(10.0, 20.0)), Some(SlotRef::assembly(0, 0)));
        assert_eq!(grid.hit_test(Point::new(159.9, 99.9)), Some(SlotRef::assembly(2, 1)));
        assert_eq!(grid.hit_test(Point::new(160.0, 100.0)), None);
        assert_eq!(grid.hit_test(Point::new(9.9, 30.0)), None);
        assert_eq!(grid.hit_test(Point::new(f32::NAN, 30.0)), None);
    }

    #[test]
    fn set_piece_returns_previous_occupant() {
        let mut grid = grid();
        assert_eq!(grid.set_piece(1, 1, Some(4)), Ok(None));
        assert_eq!(grid.set_piece(1, 1, Some(5)), Ok(Some(4)));
        assert_eq!(grid.get_piece(1, 1), Some(5));
        assert!(matches!(
            grid.set_piece(3, 0, Some(1)),
            Err(PuzzleError::SlotOutOfRange { col: 3, .. })
        ));
    }

    #[test]
    fn layout_moves_shadows_with_slots() {
        let mut grid = grid();
        assert!(grid.set_selected(2, 1, true));
        grid.do_layout(ZoneGeometry::new(Point::ORIGIN, 10.0, 10.0));
        let shadow = grid.slot(2, 1).and_then(Slot::shadow).copied();
        assert_eq!(
            shadow,
            Some(Shadow {
                position: Point::new(20.0, 10.0),
                selected: true
            })
        );
    }

    #[test]
    fn tile_slots_have_no_shadow() {
        let mut grid = Grid::new(Zone::Tile, 2, 2, false);
        assert!(!grid.set_selected(0, 0, true));
        assert!(grid.iter().all(|(_, _, slot)| slot.shadow().is_none()));
    }
}
