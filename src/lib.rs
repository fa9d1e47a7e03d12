pub mod host;
pub mod session;
pub mod source;
pub mod svg_view;

pub use host::HostParams;
pub use session::{LevelSource, Session, SessionError};
pub use source::{SourceError, SourceSvg};
pub use svg_view::{render_scene, SvgOptions};
