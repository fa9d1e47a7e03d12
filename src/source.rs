use std::ops::Range;

use kakera_core::Rect;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static SVG_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<svg((?:\s[^>]*)?/?)>").unwrap());
static SVG_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</svg\s*>").unwrap());
static VIEW_BOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)viewBox\s*=\s*["']([^"']*)["']"#).unwrap());
static WIDTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)width\s*=\s*["']\s*([-+0-9.eE]+)"#).unwrap());
static HEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|\s)height\s*=\s*["']\s*([-+0-9.eE]+)"#).unwrap());

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SourceError {
    #[error("document has no <svg> root element")]
    MissingRoot,
    #[error("<svg> root has neither a viewBox nor a width and height")]
    MissingViewBox,
    #[error("malformed viewBox {0:?}")]
    MalformedViewBox(String),
}

/// The image a puzzle is cut from: its view box and the markup inside the
/// root element, kept verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSvg {
    pub view_box: Rect,
    pub content: String,
}

impl SourceSvg {
    pub fn new(view_box: Rect, content: impl Into<String>) -> Self {
        Self {
            view_box,
            content: content.into(),
        }
    }

    pub fn parse(document: &str) -> Result<Self, SourceError> {
        let comments: Vec<Range<usize>> =
            COMMENT_RE.find_iter(document).map(|m| m.range()).collect();
        let outside_comments = |at: usize| !comments.iter().any(|c| c.contains(&at));
        let open = SVG_OPEN_RE
            .captures_iter(document)
            .find(|c| c.get(0).is_some_and(|m| outside_comments(m.start())))
            .ok_or(SourceError::MissingRoot)?;
        let whole = open.get(0).ok_or(SourceError::MissingRoot)?;
        let attrs = open.get(1).map_or("", |m| m.as_str());
        let view_box = parse_view_box(attrs)?;
        let content = if attrs.ends_with('/') {
            String::new()
        } else {
            let end = SVG_CLOSE_RE
                .find_iter(document)
                .filter(|m| m.start() >= whole.end() && outside_comments(m.start()))
                .last()
                .map_or(document.len(), |m| m.start());
            document[whole.end()..end].trim().to_string()
        };
        log::debug!(
            "source view box {} {} {} {}, {} bytes of content",
            view_box.x,
            view_box.y,
            view_box.width,
            view_box.height,
            content.len()
        );
        Ok(Self { view_box, content })
    }
}

fn parse_view_box(attrs: &str) -> Result<Rect, SourceError> {
    if let Some(raw) = VIEW_BOX_RE.captures(attrs).and_then(|c| c.get(1)) {
        let raw = raw.as_str();
        let values: Vec<f32> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| SourceError::MalformedViewBox(raw.to_string()))?;
        return match values.as_slice() {
            [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
            _ => Err(SourceError::MalformedViewBox(raw.to_string())),
        };
    }
    let number = |re: &Regex| {
        re.captures(attrs)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f32>().ok())
    };
    match (number(&WIDTH_RE), number(&HEIGHT_RE)) {
        (Some(width), Some(height)) => Ok(Rect::new(0.0, 0.0, width, height)),
        _ => Err(SourceError::MissingViewBox),
    }
}
