use std::{
    collections::HashMap,
    fs::read_dir,
    path::{Path, PathBuf},
};

use rand::Rng;

use crate::error::{GlyphError, GlyphResult};

/// Supported symbols with their asset folder names. The position in this
/// table is the class id.
pub const CHARSET: [(char, &str); 38] = [
    ('0', "0"),
    ('1', "1"),
    ('2', "2"),
    ('3', "3"),
    ('4', "4"),
    ('5', "5"),
    ('6', "6"),
    ('7', "7"),
    ('8', "8"),
    ('9', "9"),
    ('A', "A"),
    ('B', "B"),
    ('C', "C"),
    ('D', "D"),
    ('E', "E"),
    ('F', "F"),
    ('G', "G"),
    ('H', "H"),
    ('I', "I"),
    ('J', "J"),
    ('K', "K"),
    ('L', "L"),
    ('M', "M"),
    ('N', "N"),
    ('O', "O"),
    ('P', "P"),
    ('Q', "Q"),
    ('R', "R"),
    ('S', "S"),
    ('T', "T"),
    ('U', "U"),
    ('V', "V"),
    ('W', "W"),
    ('X', "X"),
    ('Y', "Y"),
    ('Z', "Z"),
    (':', "Colon"),
    ('/', "Slash"),
];

const GLYPH_EXTENSIONS: [&str; 6] = ["png", "tif", "tiff", "bmp", "jpg", "jpeg"];

#[derive(Debug, Clone)]
pub struct GlyphEntry {
    pub symbol: char,
    pub class_id: u32,
    pub dir: PathBuf,
    /// Interchangeable bitmaps for this symbol, sorted, never empty.
    pub variants: Vec<PathBuf>,
}

impl GlyphEntry {
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Path {
        &self.variants[rng.random_range(0..self.variants.len())]
    }
}

/// Immutable symbol → (folder, class id, variants) table, built once per run.
#[derive(Debug, Clone)]
pub struct GlyphRegistry {
    entries: Vec<GlyphEntry>,
}

impl GlyphRegistry {
    /// Lists every symbol folder under `root` once.
    pub fn scan(root: impl AsRef<Path>) -> GlyphResult<Self> {
        Self::build(root.as_ref(), |_, dir| list_variants(dir))
    }

    /// Builds the registry from an explicit symbol → files manifest.
    pub fn from_manifest(
        root: impl AsRef<Path>,
        manifest: &HashMap<char, Vec<PathBuf>>,
    ) -> GlyphResult<Self> {
        Self::build(root.as_ref(), |symbol, _| {
            let mut files = manifest.get(&symbol).cloned().unwrap_or_default();
            files.sort();
            Ok(files)
        })
    }

    fn build(
        root: &Path,
        mut variants_for: impl FnMut(char, &Path) -> GlyphResult<Vec<PathBuf>>,
    ) -> GlyphResult<Self> {
        let mut entries = Vec::with_capacity(CHARSET.len());
        for (class_id, (symbol, folder)) in CHARSET.iter().enumerate() {
            let dir = root.join(folder);
            let variants = variants_for(*symbol, &dir)?;
            if variants.is_empty() {
                return Err(GlyphError::MissingVariants {
                    symbol: *symbol,
                    dir,
                });
            }
            entries.push(GlyphEntry {
                symbol: *symbol,
                class_id: class_id as u32,
                dir,
                variants,
            });
        }
        tracing::debug!(root = %root.display(), symbols = entries.len(), "glyph registry ready");
        Ok(Self { entries })
    }

    pub fn lookup(&self, symbol: char) -> Option<&GlyphEntry> {
        CHARSET
            .iter()
            .position(|(c, _)| *c == symbol)
            .map(|idx| &self.entries[idx])
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.lookup(symbol).is_some()
    }

    pub fn entries(&self) -> &[GlyphEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn list_variants(dir: &Path) -> GlyphResult<Vec<PathBuf>> {
    let rd = read_dir(dir).map_err(|e| GlyphError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in rd {
        let path = entry.map_err(|e| GlyphError::io(dir, e))?.path();
        if path.is_file() && has_glyph_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_glyph_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            GLYPH_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;

    pub(crate) fn fake_registry(per_symbol: usize) -> GlyphRegistry {
        let manifest: HashMap<char, Vec<PathBuf>> = CHARSET
            .iter()
            .map(|(c, folder)| {
                let files = (0..per_symbol)
                    .map(|i| PathBuf::from("assets").join(folder).join(format!("{i}.png")))
                    .collect();
                (*c, files)
            })
            .collect();
        GlyphRegistry::from_manifest("assets", &manifest).unwrap()
    }

    #[test]
    fn class_ids_cover_0_to_37_exactly_once() {
        let reg = fake_registry(1);
        assert_eq!(reg.len(), 38);
        let ids: HashSet<u32> = reg.entries().iter().map(|e| e.class_id).collect();
        assert_eq!(ids, (0..38).collect::<HashSet<u32>>());

        let symbols: HashSet<char> = reg.entries().iter().map(|e| e.symbol).collect();
        assert_eq!(symbols.len(), 38);
    }

    #[test]
    fn lookup_maps_symbols_to_folders_and_ids() {
        let reg = fake_registry(1);
        let colon = reg.lookup(':').unwrap();
        assert_eq!(colon.class_id, 36);
        assert_eq!(colon.dir, Path::new("assets").join("Colon"));
        assert_eq!(reg.lookup('/').unwrap().class_id, 37);
        assert_eq!(reg.lookup('A').unwrap().class_id, 10);
        assert_eq!(reg.lookup('9').unwrap().class_id, 9);
        assert!(reg.lookup('a').is_none());
        assert!(!reg.contains('-'));
    }

    #[test]
    fn empty_symbol_is_rejected() {
        let mut manifest: HashMap<char, Vec<PathBuf>> = CHARSET
            .iter()
            .map(|(c, _)| (*c, vec![PathBuf::from("x.png")]))
            .collect();
        manifest.remove(&'Q');
        let err = GlyphRegistry::from_manifest("assets", &manifest).unwrap_err();
        assert!(matches!(err, GlyphError::MissingVariants { symbol: 'Q', .. }));
    }

    #[test]
    fn choose_stays_within_variants() {
        let reg = fake_registry(4);
        let entry = reg.lookup('7').unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        for _ in 0..32 {
            assert!(entry.variants.iter().any(|v| v == entry.choose(&mut rng)));
        }
    }

    #[test]
    fn scan_lists_sorted_image_files() {
        let tmp = tempfile::tempdir().unwrap();
        for (_, folder) in CHARSET.iter() {
            let dir = tmp.path().join(folder);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("b.png"), b"").unwrap();
            std::fs::write(dir.join("a.TIF"), b"").unwrap();
            std::fs::write(dir.join("notes.txt"), b"").unwrap();
        }
        let reg = GlyphRegistry::scan(tmp.path()).unwrap();
        let names: Vec<_> = reg
            .lookup('S')
            .unwrap()
            .variants
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.TIF", "b.png"]);
    }

    #[test]
    fn scan_fails_on_missing_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let err = GlyphRegistry::scan(tmp.path()).unwrap_err();
        assert!(matches!(err, GlyphError::Io { .. }));
    }
}
