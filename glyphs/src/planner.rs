use std::path::PathBuf;

use rand::Rng;

use crate::registry::GlyphRegistry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedGlyph {
    /// Informational position centred on zero; placement uses the cursor.
    pub layout_index: i32,
    pub symbol: char,
    pub class_id: u32,
    pub source: PathBuf,
}

/// Resolves every registered character of `sentence` to one randomly chosen
/// variant. Unregistered characters are logged and skipped.
pub fn plan_sentence<R: Rng + ?Sized>(
    sentence: &str,
    registry: &GlyphRegistry,
    rng: &mut R,
) -> Vec<PlannedGlyph> {
    let len = sentence.chars().count() as i32;
    let mut layout_index = -(len / 2);
    let mut planned = Vec::with_capacity(len as usize);

    for symbol in sentence.chars() {
        let Some(entry) = registry.lookup(symbol) else {
            tracing::warn!(%symbol, sentence, "character not found in the registry, skipped");
            continue;
        };
        planned.push(PlannedGlyph {
            layout_index,
            symbol,
            class_id: entry.class_id,
            source: entry.choose(rng).to_path_buf(),
        });
        layout_index += 1;
    }

    planned
}
