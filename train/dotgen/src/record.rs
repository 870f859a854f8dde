use glyphs::GlyphBox;
use serde::Serialize;

/// One line of `index.jsonl`.
#[derive(Serialize, Debug)]
pub struct JsonRecord<'a> {
    pub schema: &'static str,
    pub image: String,
    pub labels: String,
    pub background: String,
    pub seed: u64,
    pub text: &'a [Vec<String>],
    pub classes: Vec<u32>,
    pub boxes: Vec<GlyphBox>,
}
