use kakera_core::{
    ConnectorGraph, ConnectorShape, EdgeState, GeometryGenerator, Grid, Outline, PathCommand,
    PieceMetrics, Point, Side, SlotRef, Zone, ZoneGeometry,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn commands_per_edge(shape: ConnectorShape, state: EdgeState) -> usize {
    match (shape, state) {
        (_, EdgeState::Absent) | (ConnectorShape::None, _) => 1,
        (ConnectorShape::Square, _) => 5,
        (ConnectorShape::Spline, _) => 6,
    }
}

/// Every point an edge touches, control points included, starting at the
/// corner it leaves from.
fn edge_points(outline: &Outline, shape: ConnectorShape, edges: [EdgeState; 4], side: Side) -> Vec<Point> {
    let commands = outline.commands();
    let mut start = 1;
    for before in &Side::ALL[..side.index()] {
        start += commands_per_edge(shape, edges[before.index()]);
    }
    let end = start + commands_per_edge(shape, edges[side.index()]);
    let mut points = vec![commands[start - 1].end_point().expect("corner")];
    for command in &commands[start..end] {
        match *command {
            PathCommand::LineTo(p) => points.push(p),
            PathCommand::CubicTo { c1, c2, to } => points.extend([c1, c2, to]),
            other => panic!("unexpected {other:?}"),
        }
    }
    points
}

fn assert_mirrored(a: &[Point], b: &[Point], shift: Point) {
    assert_eq!(a.len(), b.len());
    for (p, q) in a.iter().zip(b.iter().rev()) {
        let q = *q + shift;
        assert!(p.distance_to(q) < 1e-3, "{p:?} != {q:?}");
    }
}

fn shape_strategy() -> impl Strategy<Value = ConnectorShape> {
    prop_oneof![
        Just(ConnectorShape::None),
        Just(ConnectorShape::Square),
        Just(ConnectorShape::Spline),
    ]
}

fn edge_strategy() -> impl Strategy<Value = EdgeState> {
    prop_oneof![
        Just(EdgeState::Absent),
        Just(EdgeState::Tab),
        Just(EdgeState::Notch),
    ]
}

proptest! {
    #[test]
    fn outlines_always_close(
        shape in shape_strategy(),
        edges in proptest::array::uniform4(edge_strategy()),
        width in 1.0f32..500.0,
        height in 1.0f32..500.0,
        ratio in 0.0f32..0.3,
    ) {
        let generator = GeometryGenerator::new(PieceMetrics::new(width, height, ratio), shape);
        let outline = generator.outline(edges);
        prop_assert!(outline.is_closed());
        prop_assert_eq!(outline.first_point(), Some(Point::ORIGIN));
    }

    #[test]
    fn neighbouring_edges_trace_the_same_curve(
        shape in shape_strategy(),
        cols in 2usize..6,
        rows in 2usize..6,
        seed in any::<u64>(),
    ) {
        let graph = ConnectorGraph::build(cols, rows, &mut StdRng::seed_from_u64(seed));
        let metrics = PieceMetrics::new(60.0, 40.0, 0.15);
        let generator = GeometryGenerator::new(metrics, shape);
        for id in 0..graph.piece_count() {
            let edges = graph.edge_states(id);
            let outline = generator.outline(edges);
            if let Some(east) = graph.neighbor(id, Side::East) {
                let other = graph.edge_states(east);
                let mine = edge_points(&outline, shape, edges, Side::East);
                let theirs = edge_points(&generator.outline(other), shape, other, Side::West);
                assert_mirrored(&mine, &theirs, Point::new(metrics.piece_width, 0.0));
            }
            if let Some(south) = graph.neighbor(id, Side::South) {
                let other = graph.edge_states(south);
                let mine = edge_points(&outline, shape, edges, Side::South);
                let theirs = edge_points(&generator.outline(other), shape, other, Side::North);
                assert_mirrored(&mine, &theirs, Point::new(0.0, metrics.piece_height));
            }
        }
    }

    #[test]
    fn hit_test_bounds_are_half_open(
        cols in 1usize..10,
        rows in 1usize..10,
        ox in -200i32..200,
        oy in -200i32..200,
        cw in 1u16..300,
        ch in 1u16..300,
    ) {
        let mut grid = Grid::new(Zone::Tile, cols, rows, false);
        let origin = Point::new(ox as f32, oy as f32);
        grid.do_layout(ZoneGeometry::new(origin, cw as f32, ch as f32));
        prop_assert_eq!(grid.hit_test(origin), Some(SlotRef::tile(0, 0)));
        let far = origin + Point::new(cols as f32 * cw as f32, rows as f32 * ch as f32);
        prop_assert_eq!(grid.hit_test(far), None);
        let last = far - Point::new(0.5, 0.5);
        prop_assert_eq!(grid.hit_test(last), Some(SlotRef::tile(cols - 1, rows - 1)));
    }
}

#[test]
fn square_and_spline_agree_on_tab_direction() {
    let graph = ConnectorGraph::build(2, 1, &mut StdRng::seed_from_u64(8));
    let metrics = PieceMetrics::new(100.0, 100.0, 0.15);
    for id in 0..2 {
        let edges = graph.edge_states(id);
        let side = if id == 0 { Side::East } else { Side::West };
        let outward = if id == 0 { 1.0 } else { -1.0 };
        for shape in [ConnectorShape::Square, ConnectorShape::Spline] {
            let outline = GeometryGenerator::new(metrics, shape).outline(edges);
            let points = edge_points(&outline, shape, edges, side);
            let edge_x = if id == 0 { 100.0 } else { 0.0 };
            let reach = points
                .iter()
                .map(|p| (p.x - edge_x) * outward)
                .fold(f32::NEG_INFINITY, f32::max);
            match edges[side.index()] {
                EdgeState::Tab => assert!((reach - 15.0).abs() < 1e-3, "{shape} {reach}"),
                EdgeState::Notch => assert!(reach.abs() < 1e-3, "{shape} {reach}"),
                EdgeState::Absent => panic!("shared edge without connector"),
            }
        }
    }
}
