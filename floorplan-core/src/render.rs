use crate::config::LayoutConfig;
use crate::model::GeometryRecord;
use crate::surface::{PagePoint, PageSurface, TextStyle};
use crate::transform::PageLayout;
use crate::units::Points;

/// How a single room is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub line_width: f64,
    pub label: TextStyle,
    pub usage_offset: Points,
    pub area_offset: Points,
    pub area_suffix: String,
}

impl ShapeStyle {
    pub fn from_config(cfg: &LayoutConfig) -> Self {
        ShapeStyle {
            line_width: cfg.stroke_width_pt,
            label: TextStyle::regular(cfg.labels.font_size),
            usage_offset: Points(cfg.labels.usage_offset_pt),
            area_offset: Points(cfg.labels.area_offset_pt),
            area_suffix: cfg.labels.area_suffix.clone(),
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        ShapeStyle::from_config(&LayoutConfig::default())
    }
}

/// `12.0 m²`
pub fn format_area(area: f64, suffix: &str) -> String {
    format!("{:.1}{}", area, suffix)
}

/// Draws the record's outline with its usage label above the center and its
/// area below it.
pub fn render_shape(
    surface: &mut PageSurface,
    record: &GeometryRecord,
    layout: &PageLayout<'_>,
    style: &ShapeStyle,
) {
    let rect = layout.record_rect(record);
    surface.stroke_rect(rect, style.line_width);

    let center = rect.center();
    if let Some(usage) = record.usage_label() {
        surface.centered_text(
            PagePoint {
                x: center.x,
                y: center.y + style.usage_offset,
            },
            usage,
            style.label,
        );
    }
    if let Some(area) = record.area() {
        surface.centered_text(
            PagePoint {
                x: center.x,
                y: center.y + style.area_offset,
            },
            format_area(area, &style.area_suffix),
            style.label,
        );
    }
}
