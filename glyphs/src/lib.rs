pub mod annotation;
pub mod compositor;
pub mod error;
pub mod geom;
pub mod loader;
pub mod planner;
pub mod registry;
pub mod text;

pub use annotation::{AnnotationLine, render_labels};
pub use compositor::{ComposeCfg, Placement, ResolvedGlyph, compose_row};
pub use error::{GlyphError, GlyphResult};
pub use geom::GlyphBox;
pub use loader::{GlyphBitmap, LoadCfg, MAX_GLYPH_SIDE, load_glyph};
pub use planner::{PlannedGlyph, plan_sentence};
pub use registry::{CHARSET, GlyphEntry, GlyphRegistry};
