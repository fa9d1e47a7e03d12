use serde::Serialize;

use crate::geom::{Point, Rect};

pub const CLASS_PIECE: &str = "piece";
pub const CLASS_PIECE_CONTENT: &str = "piece-content";
pub const CLASS_PIECE_BORDER: &str = "piece-border";
pub const CLASS_ASSEMBLY_BORDER: &str = "assembly-border";
pub const CLASS_ASSEMBLY_CONTENT_1: &str = "assembly-content-1";
pub const CLASS_ASSEMBLY_CONTENT_2: &str = "assembly-content-2";
pub const CLASS_ASSEMBLY_SHADOW: &str = "assembly-shadow";
pub const CLASS_ASSEMBLY_SHADOW_SELECTED: &str = "assembly-shadow-selected";
pub const CLASS_TILE_SHADOW: &str = "tile-shadow";
pub const CLASS_TILE_SHADOW_SELECTED: &str = "tile-shadow-selected";

pub const ID_PIECE: &str = "piece";
pub const ID_PIECE_PATH: &str = "piecep";
pub const ID_PIECE_CLIP: &str = "piecec";

pub fn shadow_class(assembly: bool, selected: bool) -> &'static str {
    match (assembly, selected) {
        (true, false) => CLASS_ASSEMBLY_SHADOW,
        (true, true) => CLASS_ASSEMBLY_SHADOW_SELECTED,
        (false, false) => CLASS_TILE_SHADOW,
        (false, true) => CLASS_TILE_SHADOW_SELECTED,
    }
}

/// Reusable definition of one piece: its outline plus the offset that
/// brings the matching part of the source image under it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieceDef {
    pub label: String,
    pub path_data: String,
    pub clip_offset: Point,
}

impl PieceDef {
    pub fn element_id(&self) -> String {
        format!("{ID_PIECE}{}", self.label)
    }

    pub fn path_id(&self) -> String {
        format!("{ID_PIECE_PATH}{}", self.label)
    }

    pub fn clip_id(&self) -> String {
        format!("{ID_PIECE_CLIP}{}", self.label)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShadowUse {
    pub label: String,
    pub position: Point,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieceUse {
    pub label: String,
    pub position: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BorderRect {
    pub rect: Rect,
    pub radius: Point,
}

/// Everything a host needs to draw the board, in drawing order within each
/// list. Pieces are listed back to front.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub view_box: Rect,
    pub source_view_box: Rect,
    pub assembly_border: BorderRect,
    pub assembly_content: Rect,
    pub piece_defs: Vec<PieceDef>,
    pub assembly_shadows: Vec<ShadowUse>,
    pub tile_shadows: Vec<ShadowUse>,
    pub pieces: Vec<PieceUse>,
}

impl Scene {
    pub fn piece_def(&self, label: &str) -> Option<&PieceDef> {
        self.piece_defs.iter().find(|def| def.label == label)
    }

    pub fn piece_use(&self, label: &str) -> Option<&PieceUse> {
        self.pieces.iter().find(|piece| piece.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_use_piece_label() {
        let def = PieceDef {
            label: "2-1".to_string(),
            path_data: String::new(),
            clip_offset: Point::ORIGIN,
        };
        assert_eq!(def.element_id(), "piece2-1");
        assert_eq!(def.path_id(), "piecep2-1");
        assert_eq!(def.clip_id(), "piecec2-1");
    }

    #[test]
    fn shadow_classes() {
        assert_eq!(shadow_class(true, true), "assembly-shadow-selected");
        assert_eq!(shadow_class(false, false), "tile-shadow");
    }
}
