use serde::Serialize;

/// Axis-aligned pixel rectangle of a placed glyph, in canvas coordinates.
/// The origin may be negative or past the canvas edge before clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GlyphBox {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl GlyphBox {
    pub fn new(x: i64, y: i64, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i64 {
        self.x + i64::from(self.w)
    }

    pub fn bottom(&self) -> i64 {
        self.y + i64::from(self.h)
    }

    /// Intersection with a `width`×`height` canvas; `None` when nothing is left.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<GlyphBox> {
        let x0 = self.x.clamp(0, i64::from(width));
        let y0 = self.y.clamp(0, i64::from(height));
        let x1 = self.right().clamp(0, i64::from(width));
        let y1 = self.bottom().clamp(0, i64::from(height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(GlyphBox::new(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}
