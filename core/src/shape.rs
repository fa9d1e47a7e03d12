use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::connector::{EdgeState, Side};
use crate::error::UnknownShape;
use crate::geom::{Point, Rect};

pub const CONNECTOR_RATIO_DEFAULT: f32 = 0.15;

/// Tangent length that makes a cubic Bezier approximate a quarter circle.
pub const K: f32 = (std::f32::consts::SQRT_2 - 1.0) * 4.0 / 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorShape {
    None,
    Square,
    #[default]
    Spline,
}

impl ConnectorShape {
    pub const ALL: [ConnectorShape; 3] = [
        ConnectorShape::None,
        ConnectorShape::Square,
        ConnectorShape::Spline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectorShape::None => "none",
            ConnectorShape::Square => "square",
            ConnectorShape::Spline => "spline",
        }
    }

    /// Unknown names fall back to the default shape; the rejected name is
    /// handed back so the caller can surface it.
    pub fn parse_or_default(raw: &str) -> (ConnectorShape, Option<UnknownShape>) {
        match raw.parse::<ConnectorShape>() {
            Ok(shape) => (shape, None),
            Err(err) => {
                let fallback = ConnectorShape::default();
                log::warn!("{err}, using {fallback}");
                (fallback, Some(err))
            }
        }
    }

    fn emitter(self) -> Option<ConnectorFn> {
        match self {
            ConnectorShape::None => None,
            ConnectorShape::Square => Some(square_connector),
            ConnectorShape::Spline => Some(spline_connector),
        }
    }
}

impl FromStr for ConnectorShape {
    type Err = UnknownShape;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ConnectorShape::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownShape(value.to_string()))
    }
}

impl fmt::Display for ConnectorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

impl PathCommand {
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    commands: Vec<PathCommand>,
}

impl Outline {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn first_point(&self) -> Option<Point> {
        self.commands.first().and_then(PathCommand::end_point)
    }

    pub fn last_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(PathCommand::end_point)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
            && self.first_point().is_some()
            && self.first_point() == self.last_point()
    }

    pub fn to_path_data(&self) -> String {
        let mut path = String::new();
        for command in &self.commands {
            if !path.is_empty() {
                path.push(' ');
            }
            let _ = match *command {
                PathCommand::MoveTo(p) => write!(path, "M {} {}", fmt_f32(p.x), fmt_f32(p.y)),
                PathCommand::LineTo(p) => write!(path, "L {} {}", fmt_f32(p.x), fmt_f32(p.y)),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    path,
                    "C {} {} {} {} {} {}",
                    fmt_f32(c1.x),
                    fmt_f32(c1.y),
                    fmt_f32(c2.x),
                    fmt_f32(c2.y),
                    fmt_f32(to.x),
                    fmt_f32(to.y)
                ),
                PathCommand::Close => write!(path, "Z"),
            };
        }
        path
    }
}

/// Shortest decimal that parses back to the same `f32`. Negative zero prints as `0`.
pub fn fmt_f32(value: f32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceMetrics {
    pub piece_width: f32,
    pub piece_height: f32,
    pub connector_width: f32,
    pub connector_height: f32,
}

impl PieceMetrics {
    pub fn new(piece_width: f32, piece_height: f32, connector_ratio: f32) -> Self {
        Self {
            piece_width,
            piece_height,
            connector_width: piece_width * connector_ratio,
            connector_height: piece_height * connector_ratio,
        }
    }

    pub fn for_grid(source: Rect, cols: usize, rows: usize, connector_ratio: f32) -> Self {
        let cols = cols.max(1) as f32;
        let rows = rows.max(1) as f32;
        Self::new(source.width / cols, source.height / rows, connector_ratio)
    }

    /// Tile cells leave room for tabs on both sides plus `slack` of the
    /// piece size, so neighbouring tiles never overlap.
    pub fn tile_size(&self, slack: f32) -> (f32, f32) {
        (
            2.0 * self.connector_width + (1.0 + slack) * self.piece_width,
            2.0 * self.connector_height + (1.0 + slack) * self.piece_height,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One edge of a piece in its own coordinates: `along` runs the edge,
/// `across` is the offset from the edge line.
#[derive(Clone, Copy, Debug)]
struct EdgeFrame {
    axis: Axis,
    line: f32,
    len: f32,
    end: f32,
    dir: f32,
    outward: f32,
    along_size: f32,
    across_size: f32,
}

impl EdgeFrame {
    fn for_side(side: Side, m: &PieceMetrics) -> Self {
        let (axis, line, len, dir, outward) = match side {
            Side::North => (Axis::Horizontal, 0.0, m.piece_width, 1.0, -1.0),
            Side::East => (Axis::Vertical, m.piece_width, m.piece_height, 1.0, 1.0),
            Side::South => (Axis::Horizontal, m.piece_height, m.piece_width, -1.0, 1.0),
            Side::West => (Axis::Vertical, 0.0, m.piece_height, -1.0, -1.0),
        };
        let (along_size, across_size) = match axis {
            Axis::Horizontal => (m.connector_width, m.connector_height),
            Axis::Vertical => (m.connector_height, m.connector_width),
        };
        Self {
            axis,
            line,
            len,
            end: if dir > 0.0 { len } else { 0.0 },
            dir,
            outward,
            along_size,
            across_size,
        }
    }

    fn point(&self, along: f32, across: f32) -> Point {
        match self.axis {
            Axis::Horizontal => Point::new(along, self.line + across),
            Axis::Vertical => Point::new(self.line + across, along),
        }
    }

    fn delta(&self, along: f32, across: f32) -> Point {
        match self.axis {
            Axis::Horizontal => Point::new(along, across),
            Axis::Vertical => Point::new(across, along),
        }
    }
}

struct PathBuilder {
    commands: Vec<PathCommand>,
    current: Point,
}

impl PathBuilder {
    fn new(start: Point) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(start)],
            current: start,
        }
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::LineTo(p));
        self.current = p;
    }

    fn line_by(&mut self, delta: Point) {
        self.line_to(self.current + delta);
    }

    /// Relative cubic: control points and end are offsets from the current point.
    fn curve_by(&mut self, c1: Point, c2: Point, to: Point) {
        let origin = self.current;
        let to = origin + to;
        self.commands.push(PathCommand::CubicTo {
            c1: origin + c1,
            c2: origin + c2,
            to,
        });
        self.current = to;
    }

    fn finish(mut self) -> Outline {
        self.commands.push(PathCommand::Close);
        Outline {
            commands: self.commands,
        }
    }
}

/// `bump` is +1 when the connector leaves the piece along the frame's
/// across axis and -1 when it cuts into it.
type ConnectorFn = fn(&EdgeFrame, f32, &mut PathBuilder);

fn square_connector(frame: &EdgeFrame, bump: f32, path: &mut PathBuilder) {
    let start = 0.5 * (frame.len - frame.dir * frame.along_size);
    let across = bump * frame.across_size;
    path.line_to(frame.point(start, 0.0));
    path.line_by(frame.delta(0.0, across));
    path.line_by(frame.delta(frame.dir * frame.along_size, 0.0));
    path.line_by(frame.delta(0.0, -across));
}

fn spline_connector(frame: &EdgeFrame, bump: f32, path: &mut PathBuilder) {
    let start = 0.5 * (frame.len - 0.5 * frame.dir * frame.along_size);
    let ka = 0.5 * K * frame.dir * frame.along_size;
    let ko = 0.5 * K * bump * frame.across_size;
    let a2 = 0.5 * frame.dir * frame.along_size;
    let a4 = 0.25 * frame.dir * frame.along_size;
    let o2 = 0.5 * bump * frame.across_size;
    path.line_to(frame.point(start, 0.0));
    path.curve_by(frame.delta(0.0, ko), frame.delta(-a4, o2 - ko), frame.delta(-a4, o2));
    path.curve_by(frame.delta(0.0, ko), frame.delta(a2 - ka, o2), frame.delta(a2, o2));
    path.curve_by(frame.delta(ka, 0.0), frame.delta(a2, ko - o2), frame.delta(a2, -o2));
    path.curve_by(frame.delta(0.0, -ko), frame.delta(-a4, ko - o2), frame.delta(-a4, -o2));
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryGenerator {
    metrics: PieceMetrics,
    shape: ConnectorShape,
}

impl GeometryGenerator {
    pub fn new(metrics: PieceMetrics, shape: ConnectorShape) -> Self {
        Self { metrics, shape }
    }

    pub fn metrics(&self) -> &PieceMetrics {
        &self.metrics
    }

    pub fn shape(&self) -> ConnectorShape {
        self.shape
    }

    /// Traces the outline clockwise from the top-left corner; `edges` is
    /// indexed by [`Side::index`].
    pub fn outline(&self, edges: [EdgeState; 4]) -> Outline {
        let emit = self.shape.emitter();
        let mut path = PathBuilder::new(Point::ORIGIN);
        for side in Side::ALL {
            let frame = EdgeFrame::for_side(side, &self.metrics);
            let bump = match edges[side.index()] {
                EdgeState::Absent => None,
                EdgeState::Tab => Some(frame.outward),
                EdgeState::Notch => Some(-frame.outward),
            };
            if let (Some(emit), Some(bump)) = (emit, bump) {
                emit(&frame, bump, &mut path);
            }
            path.line_to(frame.point(frame.end, 0.0));
        }
        path.finish()
    }
}
