use serde::{Deserialize, Serialize};

use crate::error::UnknownShape;
use crate::layout::{LayoutParams, BORDER_CORNER_RATIO, BORDER_RATIO, MARGIN_RATIO, TILE_SLACK};
use crate::shape::{ConnectorShape, CONNECTOR_RATIO_DEFAULT};

pub const CONNECTOR_RATIO_MAX: f32 = 0.3;

/// User facing puzzle settings. Every field has a default so partial TOML
/// or JSON documents deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleOptions {
    pub connector_shape: String,
    pub connector_ratio: f32,
    pub border_ratio: f32,
    pub border_corner_ratio: f32,
    pub margin_ratio: f32,
    pub tile_slack: f32,
}

impl Default for PuzzleOptions {
    fn default() -> Self {
        Self {
            connector_shape: ConnectorShape::default().to_string(),
            connector_ratio: CONNECTOR_RATIO_DEFAULT,
            border_ratio: BORDER_RATIO,
            border_corner_ratio: BORDER_CORNER_RATIO,
            margin_ratio: MARGIN_RATIO,
            tile_slack: TILE_SLACK,
        }
    }
}

impl PuzzleOptions {
    pub fn with_shape(mut self, shape: ConnectorShape) -> Self {
        self.connector_shape = shape.to_string();
        self
    }

    pub fn shape(&self) -> (ConnectorShape, Option<UnknownShape>) {
        ConnectorShape::parse_or_default(&self.connector_shape)
    }

    pub fn connector_ratio(&self) -> f32 {
        if self.connector_ratio.is_finite() {
            self.connector_ratio.clamp(0.0, CONNECTOR_RATIO_MAX)
        } else {
            CONNECTOR_RATIO_DEFAULT
        }
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            connector_ratio: self.connector_ratio(),
            border_ratio: non_negative(self.border_ratio, BORDER_RATIO),
            border_corner_ratio: non_negative(self.border_corner_ratio, BORDER_CORNER_RATIO),
            margin_ratio: non_negative(self.margin_ratio, MARGIN_RATIO),
            tile_slack: non_negative(self.tile_slack, TILE_SLACK),
        }
    }
}

fn non_negative(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let options: PuzzleOptions =
            serde_json::from_str(r#"{"connector_shape":"Square"}"#).expect("parse");
        assert_eq!(options.shape(), (ConnectorShape::Square, None));
        assert_eq!(options.layout_params(), LayoutParams::default());
    }

    #[test]
    fn connector_ratio_is_clamped() {
        let mut options = PuzzleOptions {
            connector_ratio: 0.9,
            ..PuzzleOptions::default()
        };
        assert_eq!(options.connector_ratio(), CONNECTOR_RATIO_MAX);
        options.connector_ratio = -1.0;
        assert_eq!(options.connector_ratio(), 0.0);
        options.connector_ratio = f32::NAN;
        assert_eq!(options.connector_ratio(), CONNECTOR_RATIO_DEFAULT);
    }

    #[test]
    fn unknown_shape_reports_warning() {
        let options = PuzzleOptions {
            connector_shape: "zigzag".to_string(),
            ..PuzzleOptions::default()
        };
        let (shape, warning) = options.shape();
        assert_eq!(shape, ConnectorShape::Spline);
        assert!(warning.is_some());
    }
}
