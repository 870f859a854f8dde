use std::fmt;

use crate::{compositor::Placement, geom::GlyphBox};

/// One label line: class id and the four box corners as canvas fractions,
/// clockwise from the top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationLine {
    pub class_id: u32,
    pub corners: [(f64, f64); 4],
}

impl AnnotationLine {
    /// `None` when the rectangle does not overlap the canvas at all.
    pub fn from_rect(class_id: u32, rect: GlyphBox, canvas: (u32, u32)) -> Option<Self> {
        let (cw, ch) = canvas;
        let b = rect.clip_to(cw, ch)?;
        let fx = |v: i64| v as f64 / f64::from(cw);
        let fy = |v: i64| v as f64 / f64::from(ch);

        let (x1, y1) = (fx(b.x), fy(b.y));
        let (x2, y2) = (fx(b.right()), fy(b.bottom()));
        Some(Self {
            class_id,
            corners: [(x1, y1), (x2, y1), (x2, y2), (x1, y2)],
        })
    }

    pub fn from_placement(placement: &Placement, canvas: (u32, u32)) -> Option<Self> {
        let line = Self::from_rect(placement.class_id, placement.rect, canvas);
        if line.is_none() {
            tracing::warn!(symbol = %placement.symbol, rect = ?placement.rect, "glyph fell outside the canvas, no label written");
        }
        line
    }
}

impl fmt::Display for AnnotationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_id)?;
        for (x, y) in self.corners {
            write!(f, " {x} {y}")?;
        }
        Ok(())
    }
}

/// Label file body: one line per placement in placement order.
pub fn render_labels(lines: &[AnnotationLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
