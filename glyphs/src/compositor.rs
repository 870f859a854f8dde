use std::ops::{Range, RangeInclusive};

use image::{Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use rand::Rng;

use crate::{
    error::GlyphResult,
    geom::GlyphBox,
    loader::{GlyphBitmap, LoadCfg, load_glyph},
    planner::PlannedGlyph,
};

#[derive(Clone, Debug)]
pub struct ComposeCfg {
    /// Per-glyph alpha multiplier range (print intensity).
    pub alpha_jitter: Range<f32>,
    /// Gaussian sigma applied to each glyph; 0 disables the pass.
    pub blur_sigma: f32,
    /// Horizontal gap after every glyph.
    pub char_gap: RangeInclusive<i64>,
    /// Extra gap before every group but the first on a row.
    pub group_gap: RangeInclusive<i64>,
}

impl Default for ComposeCfg {
    fn default() -> Self {
        Self {
            alpha_jitter: 0.8..0.9,
            blur_sigma: 1.0,
            char_gap: 10..=15,
            group_gap: 20..=40,
        }
    }
}

pub struct ResolvedGlyph {
    pub glyph: PlannedGlyph,
    pub bitmap: GlyphBitmap,
}

impl ResolvedGlyph {
    pub fn load(glyph: PlannedGlyph, cfg: &LoadCfg) -> GlyphResult<Self> {
        let bitmap = load_glyph(&glyph.source, cfg)?;
        Ok(Self { glyph, bitmap })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub symbol: char,
    pub class_id: u32,
    /// Unclipped rectangle the glyph was pasted into.
    pub rect: GlyphBox,
}

/// Lays one text row out left to right starting at `origin`, pasting into
/// `canvas`. Groups share the row's y and are separated by an extra gap.
pub fn compose_row<R: Rng + ?Sized>(
    canvas: &mut RgbaImage,
    groups: Vec<Vec<ResolvedGlyph>>,
    origin: (i64, i64),
    cfg: &ComposeCfg,
    rng: &mut R,
) -> Vec<Placement> {
    let (mut cursor_x, y) = origin;
    let mut placements = Vec::new();

    for (gi, group) in groups.into_iter().enumerate() {
        if gi > 0 {
            cursor_x += rng.random_range(cfg.group_gap.clone());
        }
        for ResolvedGlyph { glyph, mut bitmap } in group {
            jitter_alpha(&mut bitmap, rng.random_range(cfg.alpha_jitter.clone()));
            let bitmap = soften(&bitmap, cfg.blur_sigma);
            paste_masked(canvas, &bitmap, cursor_x, y);

            let rect = GlyphBox::new(cursor_x, y, bitmap.width(), bitmap.height());
            tracing::debug!(symbol = %glyph.symbol, x = rect.x, y = rect.y, w = rect.w, h = rect.h, "glyph placed");
            placements.push(Placement {
                symbol: glyph.symbol,
                class_id: glyph.class_id,
                rect,
            });

            cursor_x += i64::from(bitmap.width()) + rng.random_range(cfg.char_gap.clone());
        }
    }

    placements
}

fn jitter_alpha(bitmap: &mut GlyphBitmap, factor: f32) {
    for p in bitmap.pixels_mut() {
        p[3] = (f32::from(p[3]) * factor) as u8;
    }
}

/// Gaussian blur on premultiplied colour, so keyed-out fill never bleeds in.
pub fn soften(bitmap: &GlyphBitmap, sigma: f32) -> GlyphBitmap {
    if sigma <= 0.0 {
        return bitmap.clone();
    }
    let mut premul = bitmap.clone();
    for p in premul.pixels_mut() {
        let a = u16::from(p[3]);
        for c in 0..3 {
            p[c] = ((u16::from(p[c]) * a + 127) / 255) as u8;
        }
    }

    let mut out = gaussian_blur_f32(&premul, sigma);
    for p in out.pixels_mut() {
        let a = u32::from(p[3]);
        if a == 0 {
            *p = Rgba([0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            p[c] = ((u32::from(p[c]) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Straight-alpha paste using the glyph's own alpha as mask. Pixels that
/// fall outside the canvas are dropped.
pub fn paste_masked(canvas: &mut RgbaImage, glyph: &GlyphBitmap, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for (gx, gy, p) in glyph.enumerate_pixels() {
        let a = u16::from(p[3]);
        if a == 0 {
            continue;
        }
        let cx = x + i64::from(gx);
        let cy = y + i64::from(gy);
        if cx < 0 || cy < 0 || cx >= cw || cy >= ch {
            continue;
        }
        let d = canvas.get_pixel_mut(cx as u32, cy as u32);
        let inv = 255 - a;
        for c in 0..3 {
            d[c] = ((u16::from(p[c]) * a + u16::from(d[c]) * inv + 127) / 255) as u8;
        }
        d[3] = (a + (u16::from(d[3]) * inv + 127) / 255).min(255) as u8;
    }
}
