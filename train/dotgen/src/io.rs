use std::{
    fs::{self, File},
    io::{BufWriter, Cursor, Error, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use glyphs::render_labels;
use image::ImageFormat;
use tempfile::NamedTempFile;

use crate::{generator::Sample, record::JsonRecord};

pub struct OutputWriter {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    labels_dir_name: String,
    writer: Option<BufWriter<File>>,
}

impl OutputWriter {
    pub fn init_output(out_dir: &Path, labels_dir: &str) -> std::io::Result<Self> {
        let images_dir = out_dir.join("images");
        let labels_path = out_dir.join(labels_dir);
        fs::create_dir_all(&images_dir)?;
        fs::create_dir_all(&labels_path)?;

        let file = File::create(out_dir.join("index.jsonl"))?;
        Ok(Self {
            images_dir,
            labels_dir: labels_path,
            labels_dir_name: labels_dir.to_string(),
            writer: Some(BufWriter::with_capacity(8 << 20, file)),
        })
    }

    /// Image and label file appear together or not at all.
    pub fn write_sample(&mut self, sample: &Sample) -> anyhow::Result<()> {
        let image_path = self.images_dir.join(format!("{}.png", sample.name));
        let label_path = self.labels_dir.join(format!("{}.txt", sample.name));

        let mut png = Cursor::new(Vec::new());
        sample
            .canvas
            .write_to(&mut png, ImageFormat::Png)
            .with_context(|| format!("encode '{}'", image_path.display()))?;
        let mut image_tmp = NamedTempFile::new_in(&self.images_dir)?;
        image_tmp
            .write_all(png.get_ref())
            .with_context(|| format!("write '{}'", image_path.display()))?;

        let mut label_tmp = NamedTempFile::new_in(&self.labels_dir)?;
        label_tmp
            .write_all(render_labels(&sample.lines).as_bytes())
            .with_context(|| format!("write '{}'", label_path.display()))?;

        image_tmp
            .persist(&image_path)
            .with_context(|| format!("persist '{}'", image_path.display()))?;
        if let Err(e) = label_tmp.persist(&label_path) {
            let _ = fs::remove_file(&image_path);
            return Err(e).with_context(|| format!("persist '{}'", label_path.display()));
        }

        self.write_labels_jsonl(sample)?;
        Ok(())
    }

    fn write_labels_jsonl(&mut self, sample: &Sample) -> anyhow::Result<()> {
        let (width, height) = sample.canvas.dimensions();
        let rec = JsonRecord {
            schema: "v1",
            image: format!("images/{}.png", sample.name),
            labels: format!("{}/{}.txt", self.labels_dir_name, sample.name),
            background: sample.background.display().to_string(),
            seed: sample.seed,
            text: &sample.rows,
            classes: sample.placements.iter().map(|p| p.class_id).collect(),
            boxes: sample
                .placements
                .iter()
                .filter_map(|p| p.rect.clip_to(width, height))
                .collect(),
        };
        let json = serde_json::to_string(&rec)?;

        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn finalize_output(&mut self) -> Result<(), Error> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.finalize_output();
    }
}

#[cfg(test)]
mod tests {
    use glyphs::{AnnotationLine, GlyphBox, Placement};
    use image::{Rgba, RgbaImage};

    use super::*;

    fn sample(name: &str) -> Sample {
        let rect = GlyphBox::new(10, 20, 5, 8);
        Sample {
            id: 1,
            seed: 42,
            name: name.to_string(),
            background: PathBuf::from("bg/plain.png"),
            canvas: RgbaImage::from_pixel(100, 80, Rgba([1, 2, 3, 255])),
            rows: vec![vec!["1".to_string()]],
            placements: vec![Placement {
                symbol: '1',
                class_id: 1,
                rect,
            }],
            lines: vec![AnnotationLine::from_rect(1, rect, (100, 80)).unwrap()],
        }
    }

    #[test]
    fn writes_image_label_and_index() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = OutputWriter::init_output(tmp.path(), "labels").unwrap();
        out.write_sample(&sample("random_result_1")).unwrap();
        out.finalize_output().unwrap();

        let img = image::open(tmp.path().join("images/random_result_1.png")).unwrap();
        assert_eq!(img.width(), 100);
        let label = fs::read_to_string(tmp.path().join("labels/random_result_1.txt")).unwrap();
        assert_eq!(label, "1 0.1 0.25 0.15 0.25 0.15 0.35 0.1 0.35\n");

        let index = fs::read_to_string(tmp.path().join("index.jsonl")).unwrap();
        let rec: serde_json::Value = serde_json::from_str(index.lines().next().unwrap()).unwrap();
        assert_eq!(rec["seed"], 42);
        assert_eq!(rec["labels"], "labels/random_result_1.txt");
        assert_eq!(rec["classes"][0], 1);
        assert_eq!(rec["boxes"][0]["x"], 10);
    }

    #[test]
    fn index_boxes_match_clipped_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = OutputWriter::init_output(tmp.path(), "annotations").unwrap();
        let mut s = sample("edge_1");
        let rect = GlyphBox::new(95, 70, 20, 30);
        s.placements[0].rect = rect;
        s.lines = vec![AnnotationLine::from_rect(1, rect, (100, 80)).unwrap()];
        out.write_sample(&s).unwrap();
        out.finalize_output().unwrap();

        let label = fs::read_to_string(tmp.path().join("annotations/edge_1.txt")).unwrap();
        assert_eq!(label, "1 0.95 0.875 1 0.875 1 1 0.95 1\n");
        let index = fs::read_to_string(tmp.path().join("index.jsonl")).unwrap();
        let rec: serde_json::Value = serde_json::from_str(index.lines().next().unwrap()).unwrap();
        let b = &rec["boxes"][0];
        assert_eq!((b["x"].clone(), b["y"].clone()), (95.into(), 70.into()));
        assert_eq!((b["w"].clone(), b["h"].clone()), (5.into(), 10.into()));
    }

    #[test]
    fn failed_label_write_leaves_no_image() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = OutputWriter::init_output(tmp.path(), "annotations").unwrap();
        // a directory squatting on the label path makes the rename fail
        fs::create_dir_all(tmp.path().join("annotations/blocked_1.txt/inner")).unwrap();

        assert!(out.write_sample(&sample("blocked_1")).is_err());
        assert!(!tmp.path().join("images/blocked_1.png").exists());
        let leftovers = fs::read_dir(tmp.path().join("images")).unwrap().count();
        assert_eq!(leftovers, 0);

        out.finalize_output().unwrap();
        let index = fs::read_to_string(tmp.path().join("index.jsonl")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn no_temp_files_are_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = OutputWriter::init_output(tmp.path(), "annotations").unwrap();
        out.write_sample(&sample("shelf_1")).unwrap();
        out.write_sample(&sample("shelf_2")).unwrap();

        let names = |dir: &str| {
            let mut v: Vec<String> = fs::read_dir(tmp.path().join(dir))
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            v.sort();
            v
        };
        assert_eq!(names("images"), vec!["shelf_1.png", "shelf_2.png"]);
        assert_eq!(names("annotations"), vec!["shelf_1.txt", "shelf_2.txt"]);
    }
}
