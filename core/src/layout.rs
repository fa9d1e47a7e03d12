use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::grid::ZoneGeometry;
use crate::shape::{PieceMetrics, CONNECTOR_RATIO_DEFAULT};

pub const BORDER_RATIO: f32 = 0.075;
pub const BORDER_CORNER_RATIO: f32 = 0.025;
pub const MARGIN_RATIO: f32 = 0.04;
pub const TILE_SLACK: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_landscape(&self) -> bool {
        self.width >= self.height
    }
}

/// Proportions of the board decoration, all relative to the source image
/// except `connector_ratio` and `tile_slack`, which are relative to a piece.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub connector_ratio: f32,
    pub border_ratio: f32,
    pub border_corner_ratio: f32,
    pub margin_ratio: f32,
    pub tile_slack: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            connector_ratio: CONNECTOR_RATIO_DEFAULT,
            border_ratio: BORDER_RATIO,
            border_corner_ratio: BORDER_CORNER_RATIO,
            margin_ratio: MARGIN_RATIO,
            tile_slack: TILE_SLACK,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub landscape: bool,
    pub view_box: Rect,
    pub assembly_border: Rect,
    pub corner_radius: Point,
    pub puzzle: Rect,
    pub tile_zone: Rect,
    pub tile_grid: ZoneGeometry,
    pub assembly_grid: ZoneGeometry,
}

/// Places the assembly zone and the tile zone side by side (landscape) or
/// stacked (portrait). Depends only on its arguments.
pub fn compute_layout(
    viewport: Viewport,
    source: Rect,
    cols: usize,
    rows: usize,
    params: &LayoutParams,
) -> ZoneLayout {
    let landscape = viewport.is_landscape();
    let src_w = source.width;
    let src_h = source.height;
    let metrics = PieceMetrics::for_grid(source, cols, rows, params.connector_ratio);
    let (tile_w, tile_h) = metrics.tile_size(params.tile_slack);

    let border_w = params.border_ratio * src_w;
    let border_h = params.border_ratio * src_h;
    let tile_zone_w = cols as f32 * tile_w;
    let tile_zone_h = rows as f32 * tile_h;
    let assembly_w = 2.0 * border_w + src_w;
    let assembly_h = 2.0 * border_h + src_h;

    let (assembly_x, assembly_y, tile_zone_x, tile_zone_y) = if landscape {
        (
            0.0,
            0.5 * (tile_zone_h - assembly_h),
            assembly_w + params.margin_ratio * src_w,
            0.0,
        )
    } else {
        (
            0.5 * (tile_zone_w - assembly_w),
            0.0,
            0.0,
            assembly_h + params.margin_ratio * src_h,
        )
    };
    let puzzle = Rect::new(assembly_x + border_w, assembly_y + border_h, src_w, src_h);
    let (total_w, total_h) = if landscape {
        (tile_zone_x + tile_zone_w, tile_zone_h)
    } else {
        (tile_zone_w, tile_zone_y + tile_zone_h)
    };

    log::debug!(
        "layout {}: view box {total_w}x{total_h}, tiles at ({tile_zone_x}, {tile_zone_y})",
        if landscape { "landscape" } else { "portrait" }
    );

    ZoneLayout {
        landscape,
        view_box: Rect::new(0.0, 0.0, total_w, total_h),
        assembly_border: Rect::new(assembly_x, assembly_y, assembly_w, assembly_h),
        corner_radius: Point::new(
            params.border_corner_ratio * src_w,
            params.border_corner_ratio * src_h,
        ),
        puzzle,
        tile_zone: Rect::new(tile_zone_x, tile_zone_y, tile_zone_w, tile_zone_h),
        tile_grid: ZoneGeometry::new(
            Point::new(
                tile_zone_x + metrics.connector_width,
                tile_zone_y + metrics.connector_height,
            ),
            tile_w,
            tile_h,
        ),
        assembly_grid: ZoneGeometry::new(
            puzzle.origin(),
            metrics.piece_width,
            metrics.piece_height,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn landscape_puts_tiles_right_of_assembly() {
        let layout = compute_layout(
            Viewport::new(1600.0, 900.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            1,
            1,
            &LayoutParams::default(),
        );
        assert!(layout.landscape);
        assert!(close(layout.assembly_border.width, 115.0));
        assert!(close(layout.tile_zone.x, 119.0));
        assert!(close(layout.tile_grid.origin.x, 134.0));
        assert!(close(layout.tile_grid.origin.y, 15.0));
        assert!(close(layout.tile_grid.cell_width, 131.0));
        assert!(close(layout.assembly_border.y, 8.0));
        assert!(close(layout.puzzle.x, 7.5));
        assert!(close(layout.puzzle.y, 15.5));
        assert!(close(layout.view_box.width, 250.0));
        assert!(close(layout.view_box.height, 131.0));
        assert!(close(layout.corner_radius.x, 2.5));
    }

    #[test]
    fn portrait_stacks_tiles_below_assembly() {
        let layout = compute_layout(
            Viewport::new(600.0, 900.0),
            Rect::new(0.0, 0.0, 300.0, 200.0),
            3,
            2,
            &LayoutParams::default(),
        );
        assert!(!layout.landscape);
        assert!(close(layout.tile_zone.x, 0.0));
        assert!(close(layout.tile_zone.y, 230.0 + 8.0));
        assert!(close(layout.tile_zone.width, 3.0 * 131.0));
        assert!(close(layout.assembly_border.x, 0.5 * (393.0 - 345.0)));
        assert!(close(layout.assembly_grid.cell_width, 100.0));
        assert!(close(layout.view_box.height, 238.0 + 2.0 * 131.0));
    }

    #[test]
    fn square_viewport_counts_as_landscape() {
        assert!(Viewport::new(500.0, 500.0).is_landscape());
        assert!(!Viewport::new(499.0, 500.0).is_landscape());
    }
}
