use kakera_core::scene::{
    CLASS_ASSEMBLY_BORDER, CLASS_ASSEMBLY_CONTENT_1, CLASS_ASSEMBLY_CONTENT_2, CLASS_PIECE,
    CLASS_PIECE_BORDER, CLASS_PIECE_CONTENT, ID_PIECE, ID_PIECE_PATH,
};
use kakera_core::shape::fmt_f32;
use kakera_core::{Rect, Scene, ShadowUse};
use serde::{Deserialize, Serialize};

use crate::source::SourceSvg;

pub const ID_IMAGE: &str = "puzzle";

const DEFAULT_STYLE: &str = "\
.piece-content{fill:none;stroke:none}\
.piece-border{fill:none;stroke:#333;stroke-width:0.5}\
.assembly-border{fill:#ddd;stroke:#999}\
.assembly-content-1{fill:#fff}\
.assembly-content-2{fill:none;stroke:#999}\
.assembly-shadow{fill:none;stroke:#bbb;stroke-dasharray:2 2}\
.assembly-shadow-selected{fill:#8c8;fill-opacity:0.5}\
.tile-shadow{fill:none;stroke:none}\
.tile-shadow-selected{fill:#8c8;fill-opacity:0.5}";

/// Host rendering choices that are not part of the board itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    pub embed_style: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self { embed_style: true }
    }
}

/// Serializes a scene into a standalone SVG document. Piece definitions
/// live in `<defs>`; each piece on the board is a `<use>` of its definition.
pub fn render_scene(scene: &Scene, source: &SourceSvg, options: &SvgOptions) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" viewBox=\"{}\" width=\"100%\" height=\"100%\">",
        view_box_attr(&scene.view_box)
    ));
    if options.embed_style {
        svg.push_str(&format!("<style>{DEFAULT_STYLE}</style>"));
    }

    svg.push_str("<defs>");
    svg.push_str(&format!("<g id=\"{ID_IMAGE}\">{}</g>", source.content));
    for def in &scene.piece_defs {
        let path_ref = format!("#{}", def.path_id());
        svg.push_str(&format!("<g id=\"{}\">", def.element_id()));
        svg.push_str(&format!(
            "<clipPath id=\"{}\"><path id=\"{}\" d=\"{}\"/></clipPath>",
            def.clip_id(),
            def.path_id(),
            def.path_data
        ));
        svg.push_str(&use_element(&path_ref, 0.0, 0.0, Some(CLASS_PIECE_CONTENT)));
        svg.push_str(&format!(
            "<g style=\"clip-path:url(#{})\"><g transform=\"translate({} {})\">{}</g></g>",
            def.clip_id(),
            fmt_f32(def.clip_offset.x),
            fmt_f32(def.clip_offset.y),
            use_element(&format!("#{ID_IMAGE}"), 0.0, 0.0, None)
        ));
        svg.push_str(&use_element(&path_ref, 0.0, 0.0, Some(CLASS_PIECE_BORDER)));
        svg.push_str("</g>");
    }
    svg.push_str("</defs>");

    let border = &scene.assembly_border;
    svg.push_str("<g>");
    svg.push_str(&format!(
        "<rect class=\"{CLASS_ASSEMBLY_BORDER}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" ry=\"{}\"/>",
        fmt_f32(border.rect.x),
        fmt_f32(border.rect.y),
        fmt_f32(border.rect.width),
        fmt_f32(border.rect.height),
        fmt_f32(border.radius.x),
        fmt_f32(border.radius.y)
    ));
    svg.push_str(&rect_element(CLASS_ASSEMBLY_CONTENT_1, &scene.assembly_content));
    push_shadows(&mut svg, &scene.assembly_shadows);
    svg.push_str(&rect_element(CLASS_ASSEMBLY_CONTENT_2, &scene.assembly_content));
    svg.push_str("</g>");
    push_shadows(&mut svg, &scene.tile_shadows);

    for piece in &scene.pieces {
        svg.push_str(&use_element(
            &format!("#{ID_PIECE}{}", piece.label),
            piece.position.x,
            piece.position.y,
            Some(CLASS_PIECE),
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn push_shadows(svg: &mut String, shadows: &[ShadowUse]) {
    svg.push_str("<g>");
    for shadow in shadows {
        svg.push_str(&use_element(
            &format!("#{ID_PIECE_PATH}{}", shadow.label),
            shadow.position.x,
            shadow.position.y,
            Some(shadow.class),
        ));
    }
    svg.push_str("</g>");
}

fn use_element(href: &str, x: f32, y: f32, class: Option<&str>) -> String {
    let class = class
        .map(|class| format!(" class=\"{class}\""))
        .unwrap_or_default();
    format!(
        "<use{class} x=\"{}\" y=\"{}\" href=\"{href}\" xlink:href=\"{href}\"/>",
        fmt_f32(x),
        fmt_f32(y)
    )
}

fn rect_element(class: &str, rect: &Rect) -> String {
    format!(
        "<rect class=\"{class}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
        fmt_f32(rect.x),
        fmt_f32(rect.y),
        fmt_f32(rect.width),
        fmt_f32(rect.height)
    )
}

fn view_box_attr(rect: &Rect) -> String {
    format!(
        "{} {} {} {}",
        fmt_f32(rect.x),
        fmt_f32(rect.y),
        fmt_f32(rect.width),
        fmt_f32(rect.height)
    )
}
