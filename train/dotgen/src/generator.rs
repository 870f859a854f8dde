use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::ValueEnum;
use glyphs::{
    AnnotationLine, GlyphRegistry, Placement, ResolvedGlyph, compose_row, plan_sentence, text,
};
use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{background::BackgroundSource, render::RenderCfg};

/// Which text rows a sample carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Date row, then a clock time and an identifier on the row below.
    #[default]
    DateTime,
    /// Two rows of lot codes `AAA:MM/DD/YYYY`.
    Expiry,
}

impl Preset {
    /// Rows top to bottom, each a list of groups.
    pub fn rows<R: Rng + ?Sized>(self, now: NaiveDateTime, rng: &mut R) -> Vec<Vec<String>> {
        match self {
            Preset::DateTime => {
                let date = text::expiry_date(now, rng);
                let time = text::clock_time(now, rng);
                let id = text::identifier(rng);
                vec![vec![date], vec![time, id]]
            }
            Preset::Expiry => {
                let first = text::expiry_code(now, rng);
                let second = text::expiry_code(now, rng);
                vec![vec![first], vec![second]]
            }
        }
    }
}

pub struct Sample {
    pub id: u32,
    pub seed: u64,
    pub name: String,
    pub background: PathBuf,
    pub canvas: RgbaImage,
    pub rows: Vec<Vec<String>>,
    /// Placements that produced a label, parallel to `lines`.
    pub placements: Vec<Placement>,
    pub lines: Vec<AnnotationLine>,
}

pub struct SampleGenerator<'a> {
    registry: &'a GlyphRegistry,
    backgrounds: &'a BackgroundSource,
    config: &'a RenderCfg,
}

impl<'a> SampleGenerator<'a> {
    pub fn new(
        registry: &'a GlyphRegistry,
        backgrounds: &'a BackgroundSource,
        config: &'a RenderCfg,
    ) -> Self {
        Self {
            registry,
            backgrounds,
            config,
        }
    }

    pub fn generate_with_seed(&self, id: u32, seed: u64) -> anyhow::Result<Sample> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let background = self.backgrounds.pick(&mut rng).to_path_buf();
        let mut canvas = image::open(&background)
            .with_context(|| format!("open background '{}'", background.display()))?
            .to_rgba8();
        let dims = canvas.dimensions();

        let rows = self.config.preset.rows(self.config.now, &mut rng);

        // all variant draws happen before any glyph is pasted
        let mut planned_rows = Vec::with_capacity(rows.len());
        for groups in &rows {
            let mut planned_groups = Vec::with_capacity(groups.len());
            for sentence in groups {
                planned_groups.push(plan_sentence(sentence, self.registry, &mut rng));
            }
            planned_rows.push(planned_groups);
        }

        let mut placements = Vec::new();
        let mut lines = Vec::new();
        for (row, planned_groups) in planned_rows.into_iter().enumerate() {
            let mut groups = Vec::with_capacity(planned_groups.len());
            for planned in planned_groups {
                let resolved = planned
                    .into_iter()
                    .map(|g| ResolvedGlyph::load(g, &self.config.load))
                    .collect::<Result<Vec<_>, _>>()?;
                groups.push(resolved);
            }

            let origin = self.row_origin(dims, row);
            for placement in compose_row(&mut canvas, groups, origin, &self.config.compose, &mut rng)
            {
                if let Some(line) = AnnotationLine::from_placement(&placement, dims) {
                    placements.push(placement);
                    lines.push(line);
                }
            }
        }

        Ok(Sample {
            id,
            seed,
            name: format!("{}_{id}", self.backgrounds.stem()),
            background,
            canvas,
            rows,
            placements,
            lines,
        })
    }

    /// Rows start a quarter in from the left, the first a third of the way down.
    fn row_origin(&self, (w, h): (u32, u32), row: usize) -> (i64, i64) {
        let x = i64::from(w / 4);
        let y = i64::from(h / 3) + self.config.line_dy * row as i64;
        (x, y)
    }
}
