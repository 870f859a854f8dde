use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use glyphs::{GlyphError, GlyphResult};
use rand::Rng;

const BACKGROUND_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Where canvases come from. Resolved once at startup.
#[derive(Debug)]
pub enum BackgroundSource {
    /// Uniform pick per sample from a sorted directory listing.
    Pool(Vec<PathBuf>),
    /// The same file for every sample.
    Fixed(PathBuf),
}

impl BackgroundSource {
    /// `name` selects `<dir>/<name>.png`, falling back to `.jpg`. Without a
    /// name, `path` is either a single image or a directory of them.
    pub fn resolve(path: &Path, name: Option<&str>) -> GlyphResult<Self> {
        if let Some(name) = name {
            return ["png", "jpg"]
                .iter()
                .map(|ext| path.join(format!("{name}.{ext}")))
                .find(|p| p.is_file())
                .map(Self::Fixed)
                .ok_or_else(|| {
                    GlyphError::background(format!(
                        "no '{name}.png' or '{name}.jpg' in '{}'",
                        path.display()
                    ))
                });
        }

        if path.is_file() {
            return Ok(Self::Fixed(path.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = read_dir(path)
            .map_err(|e| GlyphError::io(path, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_background_extension(p))
            .collect();
        if files.is_empty() {
            return Err(GlyphError::background(format!(
                "no background images in '{}'",
                path.display()
            )));
        }
        files.sort();
        Ok(Self::Pool(files))
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Path {
        match self {
            Self::Pool(files) => &files[rng.random_range(0..files.len())],
            Self::Fixed(path) => path,
        }
    }

    /// Prefix of output file names.
    pub fn stem(&self) -> String {
        match self {
            Self::Pool(_) => "random_result".to_string(),
            Self::Fixed(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "background".to_string()),
        }
    }
}

fn has_background_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some(ext) if BACKGROUND_EXTENSIONS.iter().any(|k| ext.eq_ignore_ascii_case(k))
    )
}
