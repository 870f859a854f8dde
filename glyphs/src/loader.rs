use std::path::Path;

use image::{DynamicImage, Rgba, RgbaImage, imageops};

use crate::error::{GlyphError, GlyphResult};

/// Largest side a rescaled glyph may have.
pub const MAX_GLYPH_SIDE: u32 = 4096;

/// Cropped straight-alpha RGBA glyph, origin at the crop corner.
pub type GlyphBitmap = RgbaImage;

#[derive(Clone, Copy, Debug)]
pub struct LoadCfg {
    /// Margin kept before the first inked pixel, both axes.
    pub margin_low: u32,
    /// Exclusive margin after the last inked pixel, both axes.
    pub margin_high: u32,
    /// RGB written into removed background pixels (alpha is always 0).
    pub removed_fill: [u8; 3],
    pub scale: f32,
}

impl Default for LoadCfg {
    fn default() -> Self {
        Self {
            margin_low: 2,
            margin_high: 4,
            removed_fill: [128, 128, 128],
            scale: 1.0,
        }
    }
}

pub fn load_glyph(path: &Path, cfg: &LoadCfg) -> GlyphResult<GlyphBitmap> {
    let img = image::open(path).map_err(|e| GlyphError::decode(path, e))?;
    prepare_glyph(&img, path, cfg)
}

/// Normalize, key out white, crop to ink and rescale an already decoded bitmap.
/// `path` only labels errors.
pub fn prepare_glyph(img: &DynamicImage, path: &Path, cfg: &LoadCfg) -> GlyphResult<GlyphBitmap> {
    if !cfg.scale.is_finite() || cfg.scale <= 0.0 {
        return Err(GlyphError::InvalidScale(cfg.scale));
    }

    let mut rgba =
        normalize_to_rgba8(img).ok_or_else(|| GlyphError::BlankGlyph(path.to_path_buf()))?;
    remove_background(&mut rgba, cfg.removed_fill);

    let cropped = crop_to_ink(&rgba, cfg.margin_low, cfg.margin_high)
        .ok_or_else(|| GlyphError::TransparentGlyph(path.to_path_buf()))?;

    if cfg.scale == 1.0 {
        return Ok(cropped);
    }
    let (w, h) = cropped.dimensions();
    let nw = (f64::from(w) * f64::from(cfg.scale)).round().max(1.0);
    let nh = (f64::from(h) * f64::from(cfg.scale)).round().max(1.0);
    if nw > f64::from(MAX_GLYPH_SIDE) || nh > f64::from(MAX_GLYPH_SIDE) {
        return Err(GlyphError::OversizedGlyph {
            path: path.to_path_buf(),
            width: nw,
            height: nh,
        });
    }
    Ok(resize_area(&cropped, nw as u32, nh as u32))
}

/// Stretches samples so the brightest one maps to 255, truncating like an
/// integer cast. Alpha takes part in the maximum only when the source
/// carries it. `None` for an all-zero bitmap.
fn normalize_to_rgba8(img: &DynamicImage) -> Option<RgbaImage> {
    let has_alpha = img.color().has_alpha();
    let channels = if has_alpha { 4 } else { 3 };
    let src = img.to_rgba16();

    let max = src
        .pixels()
        .flat_map(|p| p.0[..channels].iter().copied())
        .max()
        .map(u64::from)
        .unwrap_or(0);
    if max == 0 {
        return None;
    }

    let to_u8 = |v: u16| (u64::from(v) * 255 / max).min(255) as u8;
    Some(RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = if has_alpha { to_u8(a) } else { 255 };
        Rgba([to_u8(r), to_u8(g), to_u8(b), a])
    }))
}

fn remove_background(img: &mut RgbaImage, fill: [u8; 3]) {
    for p in img.pixels_mut() {
        if p[0] == 255 && p[1] == 255 && p[2] == 255 {
            *p = Rgba([fill[0], fill[1], fill[2], 0]);
        }
    }
}

fn crop_to_ink(img: &RgbaImage, low: u32, high: u32) -> Option<RgbaImage> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in img.enumerate_pixels() {
        if p[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (min_x, min_y, max_x, max_y) = bounds?;

    let x0 = min_x.saturating_sub(low);
    let y0 = min_y.saturating_sub(low);
    let x1 = (max_x + high).min(img.width());
    let y1 = (max_y + high).min(img.height());
    Some(imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Resamples by averaging every source pixel under each destination pixel,
/// weighted by covered area.
pub fn resize_area(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let xs = area_taps(img.width(), width);
    let ys = area_taps(img.height(), height);

    RgbaImage::from_fn(width, height, |dx, dy| {
        let mut acc = [0f64; 4];
        let mut total = 0f64;
        for &(sy, wy) in &ys[dy as usize] {
            for &(sx, wx) in &xs[dx as usize] {
                let w = wx * wy;
                let p = img.get_pixel(sx, sy);
                for (a, v) in acc.iter_mut().zip(p.0) {
                    *a += f64::from(v) * w;
                }
                total += w;
            }
        }
        if total <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba(acc.map(|a| (a / total).round().clamp(0.0, 255.0) as u8))
    })
}

fn area_taps(src: u32, dst: u32) -> Vec<Vec<(u32, f64)>> {
    let ratio = f64::from(src) / f64::from(dst);
    (0..dst)
        .map(|d| {
            let start = f64::from(d) * ratio;
            let end = start + ratio;
            let mut taps = Vec::new();
            let mut s = start.floor() as u32;
            while f64::from(s) < end && s < src {
                let lo = start.max(f64::from(s));
                let hi = end.min(f64::from(s) + 1.0);
                if hi > lo {
                    taps.push((s, hi - lo));
                }
                s += 1;
            }
            taps
        })
        .collect()
}
