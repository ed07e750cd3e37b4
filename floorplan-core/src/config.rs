//! Layout constants. Everything the renderer places on a page is tunable here;
//! the defaults reproduce the classic A4 portrait plan at 1:100.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FloorplanError, Result};
use crate::units::{Points, ScaleRatio, fmt_number};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
}

impl PaperSize {
    /// Portrait (width, height) in millimetres.
    pub fn portrait_mm(self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Physical size of a page or sub-region, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PhysicalSize {
    pub fn paper(paper: PaperSize, orientation: Orientation) -> Self {
        let (w, h) = paper.portrait_mm();
        match orientation {
            Orientation::Portrait => PhysicalSize {
                width_mm: w,
                height_mm: h,
            },
            Orientation::Landscape => PhysicalSize {
                width_mm: h,
                height_mm: w,
            },
        }
    }

    pub fn width(&self) -> Points {
        Points::from_mm(self.width_mm)
    }

    pub fn height(&self) -> Points {
        Points::from_mm(self.height_mm)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    pub project_name: String,
    /// Distance from the top edge to the first baseline.
    pub offset_pt: f64,
    pub line_gap_pt: f64,
    pub font_size: f64,
    pub bold: bool,
}

impl Default for TitleConfig {
    fn default() -> Self {
        TitleConfig {
            project_name: "Les Crêts Corniers".to_string(),
            offset_pt: 60.0,
            line_gap_pt: 18.0,
            font_size: 14.0,
            bold: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// `{scale}` is replaced by the scale denominator.
    pub lines: Vec<String>,
    /// Distance from the anchor rectangle's top edge to the first baseline.
    pub offset_pt: f64,
    pub line_gap_pt: f64,
    pub font_size: f64,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        CaptionConfig {
            lines: vec!["Room layout".to_string(), "Scale 1:{scale}".to_string()],
            offset_pt: 36.0,
            line_gap_pt: 18.0,
            font_size: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font_size: f64,
    /// Baseline offset of the usage label from the rectangle center (up is positive).
    pub usage_offset_pt: f64,
    pub area_offset_pt: f64,
    pub area_suffix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            font_size: 8.0,
            usage_offset_pt: 4.0,
            area_offset_pt: -8.0,
            area_suffix: " m²".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page: PhysicalSize,
    /// Denominator of the `1 : n` drawing scale.
    pub scale: f64,
    /// Optional framed sub-region centered on the page; shapes are clipped to it.
    pub drawing_box: Option<PhysicalSize>,
    pub stroke_width_pt: f64,
    pub title: TitleConfig,
    pub caption: CaptionConfig,
    pub labels: LabelConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page: PhysicalSize::paper(PaperSize::A4, Orientation::Portrait),
            scale: ScaleRatio::ARCHITECTURAL.denominator(),
            drawing_box: None,
            stroke_width_pt: 1.0,
            title: TitleConfig::default(),
            caption: CaptionConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

fn positive(name: &str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FloorplanError::Config(format!(
            "{name} must be a positive number, got {v}"
        )))
    }
}

fn finite(name: &str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(FloorplanError::Config(format!(
            "{name} must be a finite number, got {v}"
        )))
    }
}

impl LayoutConfig {
    pub fn from_json_str(s: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Reads and validates a JSON configuration. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).map_err(|source| FloorplanError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json_str(&txt).map_err(|source| FloorplanError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_paper(mut self, paper: PaperSize, orientation: Orientation) -> Self {
        self.page = PhysicalSize::paper(paper, orientation);
        self
    }

    pub fn validate(&self) -> Result<()> {
        positive("page.width_mm", self.page.width_mm)?;
        positive("page.height_mm", self.page.height_mm)?;
        positive("scale", self.scale)?;
        positive("stroke_width_pt", self.stroke_width_pt)?;
        positive("title.font_size", self.title.font_size)?;
        positive("caption.font_size", self.caption.font_size)?;
        positive("labels.font_size", self.labels.font_size)?;
        finite("title.offset_pt", self.title.offset_pt)?;
        finite("title.line_gap_pt", self.title.line_gap_pt)?;
        finite("caption.offset_pt", self.caption.offset_pt)?;
        finite("caption.line_gap_pt", self.caption.line_gap_pt)?;
        finite("labels.usage_offset_pt", self.labels.usage_offset_pt)?;
        finite("labels.area_offset_pt", self.labels.area_offset_pt)?;
        if let Some(b) = &self.drawing_box {
            positive("drawing_box.width_mm", b.width_mm)?;
            positive("drawing_box.height_mm", b.height_mm)?;
            if b.width_mm > self.page.width_mm || b.height_mm > self.page.height_mm {
                return Err(FloorplanError::Config(format!(
                    "drawing box {}x{} mm does not fit on a {}x{} mm page",
                    fmt_number(b.width_mm),
                    fmt_number(b.height_mm),
                    fmt_number(self.page.width_mm),
                    fmt_number(self.page.height_mm)
                )));
            }
        }
        Ok(())
    }

    pub fn scale_ratio(&self) -> Result<ScaleRatio> {
        ScaleRatio::new(self.scale).ok_or_else(|| {
            FloorplanError::Config(format!(
                "scale must be a positive number, got {}",
                self.scale
            ))
        })
    }

    /// Caption lines with the `{scale}` placeholder filled in.
    pub fn caption_lines(&self) -> Vec<String> {
        let scale = fmt_number(self.scale);
        self.caption
            .lines
            .iter()
            .map(|l| l.replace("{scale}", &scale))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a4_portrait_at_1_100() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.page.width_mm, 210.0);
        assert_eq!(cfg.page.height_mm, 297.0);
        assert_eq!(cfg.scale, 100.0);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.caption_lines(), vec!["Room layout", "Scale 1:100"]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LayoutConfig::from_json_str(
            r#"{ "scale": 50, "title": { "project_name": "Chalet" }, "drawing_box": { "width_mm": 130, "height_mm": 130 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.scale, 50.0);
        assert_eq!(cfg.title.project_name, "Chalet");
        assert_eq!(cfg.title.font_size, 14.0);
        assert_eq!(cfg.labels.area_offset_pt, -8.0);
        assert_eq!(
            cfg.drawing_box,
            Some(PhysicalSize {
                width_mm: 130.0,
                height_mm: 130.0
            })
        );
        assert_eq!(cfg.caption_lines()[1], "Scale 1:50");
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let cfg = LayoutConfig::default().with_paper(PaperSize::A3, Orientation::Landscape);
        assert_eq!(cfg.page.width_mm, 420.0);
        assert_eq!(cfg.page.height_mm, 297.0);
    }

    #[test]
    fn validation_rejects_nonsense() {
        let cfg = LayoutConfig {
            scale: 0.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(FloorplanError::Config(_))));

        let cfg = LayoutConfig {
            drawing_box: Some(PhysicalSize {
                width_mm: 250.0,
                height_mm: 100.0,
            }),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(FloorplanError::Config(_))));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{ "labels": { "area_suffix": " m2" } }"#).unwrap();
        let cfg = LayoutConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.labels.area_suffix, " m2");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LayoutConfig::from_json_file(&path),
            Err(FloorplanError::ConfigParse { .. })
        ));
        assert!(matches!(
            LayoutConfig::from_json_file(&dir.path().join("missing.json")),
            Err(FloorplanError::ConfigRead { .. })
        ));
    }
}
