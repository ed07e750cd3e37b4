use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::error::{FloorplanError, Result};
use crate::model::Dataset;
use crate::render::{ShapeStyle, render_shape};
use crate::surface::{Page, PagePoint, PageRect, PageSurface, TextStyle};
use crate::transform::PageLayout;
use crate::units::{Points, UnitConverter};

fn draw_lines(
    surface: &mut PageSurface,
    x: Points,
    first_baseline: Points,
    line_gap: Points,
    lines: &[String],
    style: TextStyle,
) {
    for (i, line) in lines.iter().enumerate() {
        surface.centered_text(
            PagePoint {
                x,
                y: first_baseline - line_gap * i as f64,
            },
            line.as_str(),
            style,
        );
    }
}

/// Lays out one dataset on a fresh page: title block, caption block, optional
/// drawing box, then every record in source order.
pub fn compose_page(
    dataset: &Dataset,
    config: &LayoutConfig,
    converter: &UnitConverter,
) -> Result<Page> {
    let anchor = dataset
        .anchor()
        .ok_or_else(|| FloorplanError::DatasetEmpty {
            dataset: dataset.name().to_string(),
        })?;

    let (width, height) = (config.page.width(), config.page.height());
    let layout = PageLayout::for_anchor(anchor, width, height, converter);
    let mut surface = PageSurface::new(width, height);
    let mid_x = width / 2.0;

    let title_style = if config.title.bold {
        TextStyle::bold(config.title.font_size)
    } else {
        TextStyle::regular(config.title.font_size)
    };
    let title = [config.title.project_name.clone(), dataset.name().to_string()];
    draw_lines(
        &mut surface,
        mid_x,
        height - Points(config.title.offset_pt),
        Points(config.title.line_gap_pt),
        &title,
        title_style,
    );

    // The caption sits just above the anchor, wherever the shift put it.
    let anchor_top = layout.record_rect(anchor).top();
    draw_lines(
        &mut surface,
        mid_x,
        anchor_top + Points(config.caption.offset_pt),
        Points(config.caption.line_gap_pt),
        &config.caption_lines(),
        TextStyle::regular(config.caption.font_size),
    );

    if let Some(b) = &config.drawing_box {
        let frame = PageRect::centered_on(surface.center(), b.width(), b.height());
        surface.stroke_rect(frame, config.stroke_width_pt / 2.0);
        surface.push_clip(frame);
    }

    let style = ShapeStyle::from_config(config);
    for record in dataset.records() {
        render_shape(&mut surface, record, &layout, &style);
    }
    if config.drawing_box.is_some() {
        surface.pop_clip();
    }

    debug!(
        dataset = dataset.name(),
        anchor_top = anchor_top.raw(),
        "page composed"
    );
    info!(
        dataset = dataset.name(),
        shapes = dataset.len(),
        skipped_rows = dataset.rejected(),
        "rendered page"
    );
    Ok(surface.finish(dataset.name()))
}
