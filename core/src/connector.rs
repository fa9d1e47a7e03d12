use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pieces live in a flat arena: `id = row * cols + col`.
pub type PieceId = usize;
pub type ConnectorId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// Clockwise from the top-left corner, the order outlines are traced in.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    pub fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::East => 1,
            Side::South => 2,
            Side::West => 3,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }
}

/// Directed relation between two adjacent pieces. Which piece is `src`
/// decides which one renders the tab and which one the notch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    pub src: PieceId,
    pub dest: PieceId,
}

impl Connector {
    pub fn new<R: Rng + ?Sized>(a: PieceId, b: PieceId, rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self { src: a, dest: b }
        } else {
            Self { src: b, dest: a }
        }
    }

    pub fn is_source(&self, piece: PieceId) -> bool {
        self.src == piece
    }

    pub fn joins(&self, piece: PieceId) -> bool {
        self.src == piece || self.dest == piece
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeState {
    Absent,
    Tab,
    Notch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceEdges([Option<ConnectorId>; 4]);

impl PieceEdges {
    pub fn get(&self, side: Side) -> Option<ConnectorId> {
        self.0[side.index()]
    }

    pub fn set(&mut self, side: Side, connector: ConnectorId) {
        self.0[side.index()] = Some(connector);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorGraph {
    cols: usize,
    rows: usize,
    connectors: Vec<Connector>,
    edges: Vec<PieceEdges>,
}

impl ConnectorGraph {
    /// `cols * rows` must not overflow; `PuzzleEngine::new` checks the size first.
    pub fn build<R: Rng + ?Sized>(cols: usize, rows: usize, rng: &mut R) -> Self {
        let total = cols * rows;
        let mut connectors = Vec::with_capacity(total * 2);
        let mut edges = vec![PieceEdges::default(); total];
        for col in 0..cols.saturating_sub(1) {
            for row in 0..rows {
                let west = row * cols + col;
                let east = west + 1;
                let id = connectors.len();
                connectors.push(Connector::new(west, east, rng));
                edges[west].set(Side::East, id);
                edges[east].set(Side::West, id);
            }
        }
        for col in 0..cols {
            for row in 0..rows.saturating_sub(1) {
                let north = row * cols + col;
                let south = north + cols;
                let id = connectors.len();
                connectors.push(Connector::new(north, south, rng));
                edges[north].set(Side::South, id);
                edges[south].set(Side::North, id);
            }
        }
        Self {
            cols,
            rows,
            connectors,
            edges,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn piece_count(&self) -> usize {
        self.edges.len()
    }

    pub fn piece_id(&self, col: usize, row: usize) -> PieceId {
        row * self.cols + col
    }

    pub fn coords(&self, id: PieceId) -> (usize, usize) {
        (id % self.cols, id / self.cols)
    }

    pub fn neighbor(&self, id: PieceId, side: Side) -> Option<PieceId> {
        let (col, row) = self.coords(id);
        match side {
            Side::North if row > 0 => Some(id - self.cols),
            Side::East if col + 1 < self.cols => Some(id + 1),
            Side::South if row + 1 < self.rows => Some(id + self.cols),
            Side::West if col > 0 => Some(id - 1),
            _ => None,
        }
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id)
    }

    pub fn edges(&self, piece: PieceId) -> PieceEdges {
        self.edges.get(piece).copied().unwrap_or_default()
    }

    pub fn connector_at(&self, piece: PieceId, side: Side) -> Option<&Connector> {
        self.edges(piece)
            .get(side)
            .and_then(|id| self.connectors.get(id))
    }

    /// North/south connectors give the tab to their source, east/west
    /// connectors to their destination, so the two pieces sharing an edge
    /// always disagree.
    pub fn edge_state(&self, piece: PieceId, side: Side) -> EdgeState {
        let Some(connector) = self.connector_at(piece, side) else {
            return EdgeState::Absent;
        };
        let is_source = connector.is_source(piece);
        let tab = match side {
            Side::North | Side::South => is_source,
            Side::East | Side::West => !is_source,
        };
        if tab {
            EdgeState::Tab
        } else {
            EdgeState::Notch
        }
    }

    pub fn edge_states(&self, piece: PieceId) -> [EdgeState; 4] {
        Side::ALL.map(|side| self.edge_state(piece, side))
    }
}
