use std::path::PathBuf;

use chrono::NaiveDateTime;
use glyphs::{ComposeCfg, LoadCfg};

use crate::generator::Preset;

pub struct RenderCfg {
    pub out_dir: PathBuf,     // "output"
    pub labels_dir: String,   // "annotations"
    pub preset: Preset,
    pub now: NaiveDateTime,   // reference time for dates and clocks
    pub load: LoadCfg,
    pub compose: ComposeCfg,
    pub line_dy: i64,         // vertical step between text rows
}

impl Default for RenderCfg {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("output"),
            labels_dir: "annotations".to_string(),
            preset: Preset::default(),
            now: chrono::Local::now().naive_local(),
            load: LoadCfg::default(),
            compose: ComposeCfg::default(),
            line_dy: 77,
        }
    }
}
