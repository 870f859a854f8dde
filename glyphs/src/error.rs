use std::path::PathBuf;

pub type GlyphResult<T> = Result<T, GlyphError>;

#[derive(thiserror::Error, Debug)]
pub enum GlyphError {
    #[error("decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glyph '{0}' is blank (max sample value is zero)")]
    BlankGlyph(PathBuf),

    #[error("glyph '{0}' is fully transparent after background removal")]
    TransparentGlyph(PathBuf),

    #[error("no glyph variants for '{symbol}' in '{dir}'")]
    MissingVariants { symbol: char, dir: PathBuf },

    #[error("background error: {0}")]
    Background(String),

    #[error("glyph '{path}' would be {width}x{height} after scaling")]
    OversizedGlyph {
        path: PathBuf,
        width: f64,
        height: f64,
    },

    #[error("scale ratio must be finite and > 0, got {0}")]
    InvalidScale(f32),
}

impl GlyphError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn background(msg: impl Into<String>) -> Self {
        Self::Background(msg.into())
    }
}
