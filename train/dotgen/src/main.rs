use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDateTime;
use clap::Parser;
use glyphs::{GlyphRegistry, LoadCfg};
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::SplitMix64;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    background::BackgroundSource,
    generator::{Preset, SampleGenerator},
    io::OutputWriter,
    render::RenderCfg,
};

mod background;
mod generator;
mod io;
mod record;
mod render;

/// Synthesize dot-matrix text samples with per-glyph box labels.
#[derive(Parser, Debug)]
#[command(name = "dotgen", version)]
struct Cli {
    /// Directory holding one folder of glyph bitmaps per character.
    #[arg(long, default_value = "./Custom_Dot_Matrix_Dataset/Dot_Matrix_Test_1")]
    base_dir: PathBuf,

    /// Directory of background images (or a single image).
    #[arg(long = "background_image_path", alias = "background-image-path", default_value = "./background")]
    background_image_path: PathBuf,

    /// Use `<name>.png` (or `<name>.jpg`) from the background directory for every sample.
    #[arg(long)]
    background_name: Option<String>,

    /// Output root; gets `images/`, the labels folder and `index.jsonl`.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Name of the label folder under the output root.
    #[arg(long, default_value = "annotations")]
    labels_dir: String,

    /// Number of samples; files are numbered from 1.
    #[arg(long, default_value_t = 100)]
    count: u32,

    /// Base seed. Drawn at random and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Text rows drawn on each sample.
    #[arg(long, value_enum, default_value_t = Preset::DateTime)]
    preset: Preset,

    /// Uniform rescale ratio applied to every glyph.
    #[arg(long, default_value_t = 1.0)]
    glyph_scale: f32,

    /// Reference time for generated dates, `YYYY-MM-DDTHH:MM`. Defaults to now.
    #[arg(long, value_parser = parse_base_date)]
    base_date: Option<NaiveDateTime>,
}

fn parse_base_date(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").map_err(|e| format!("'{s}': {e}"))
}

impl Cli {
    fn render_cfg(&self) -> RenderCfg {
        let defaults = RenderCfg::default();
        RenderCfg {
            out_dir: self.output_dir.clone(),
            labels_dir: self.labels_dir.clone(),
            preset: self.preset,
            now: self.base_date.unwrap_or(defaults.now),
            load: LoadCfg {
                scale: self.glyph_scale,
                ..LoadCfg::default()
            },
            ..defaults
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = cli.render_cfg();
    if !cfg.load.scale.is_finite() || cfg.load.scale <= 0.0 {
        anyhow::bail!("--glyph-scale must be finite and > 0, got {}", cfg.load.scale);
    }

    let registry = GlyphRegistry::scan(&cli.base_dir)
        .with_context(|| format!("load glyph assets from '{}'", cli.base_dir.display()))?;
    let backgrounds =
        BackgroundSource::resolve(&cli.background_image_path, cli.background_name.as_deref())
            .context("resolve backgrounds")?;

    let base_seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        base_seed,
        count = cli.count,
        preset = ?cfg.preset,
        now = %cfg.now,
        out = %cfg.out_dir.display(),
        "generating samples"
    );

    let mut out = OutputWriter::init_output(&cfg.out_dir, &cfg.labels_dir)
        .with_context(|| format!("prepare output '{}'", cfg.out_dir.display()))?;
    let generator = SampleGenerator::new(&registry, &backgrounds, &cfg);

    for id in 1..=cli.count {
        let mut sm = SplitMix64::seed_from_u64(base_seed.wrapping_add(u64::from(id)));
        let seed = sm.next_u64();

        let sample = generator
            .generate_with_seed(id, seed)
            .with_context(|| format!("sample {id}"))?;
        out.write_sample(&sample)?;
        info!(id = sample.id, name = %sample.name, labels = sample.lines.len(), "sample written");
    }

    out.finalize_output()?;
    info!("done");
    Ok(())
}
