use png::{BitDepth, ColorType, Encoder};
use tracing::debug;

use crate::error::{FloorplanError, Result};

/// CSS pixel density usvg resolves physical units against.
const USVG_DPI: f32 = 96.0;

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input)
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> std::result::Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}

/// Rasterizes a page SVG at `dpi` on an opaque white background.
///
/// The SVG carries its physical size in millimetres, so the output keeps the
/// drawing scale at any resolution.
pub fn svg_to_png(svg: &str, dpi: f32) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Helvetica".to_string();
    let tree = usvg::Tree::from_str(svg, &opt)?;

    let scale = dpi / USVG_DPI;
    let size = tree.size();
    let w_px = (size.width() * scale).ceil().max(1.0) as u32;
    let h_px = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(w_px, h_px).ok_or(FloorplanError::PixmapAlloc)?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    debug!(width = w_px, height = h_px, dpi, "rasterized page");
    Ok(encode_rgba_to_png_bytes(w_px, h_px, pixmap.data())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PageRect, PageSurface};
    use crate::svg::page_to_svg;
    use crate::units::Points;

    #[test]
    fn png_size_follows_paper_and_dpi() {
        let mut s = PageSurface::new(Points::from_mm(210.0), Points::from_mm(297.0));
        s.stroke_rect(
            PageRect {
                x: Points(100.0),
                y: Points(100.0),
                width: Points(200.0),
                height: Points(100.0),
            },
            1.0,
        );
        let png = svg_to_png(&page_to_svg(&s.finish("p")), 72.0).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoder = png::Decoder::new(std::io::Cursor::new(png));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert!((info.width as i64 - 595).abs() <= 1);
        assert!((info.height as i64 - 842).abs() <= 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            svg_to_png("not svg", 96.0),
            Err(FloorplanError::SvgParse(_))
        ));
    }

    #[test]
    fn encoder_output_decodes_back() {
        let rgba = [255, 255, 255, 255, 0, 0, 0, 255];
        let bytes = encode_rgba_to_png_bytes(2, 1, &rgba).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(bytes, encode_rgba_to_png_bytes(2, 1, &rgba).unwrap());

        let mut reader = png::Decoder::new(std::io::Cursor::new(bytes))
            .read_info()
            .unwrap();
        let mut buf = vec![0u8; rgba.len()];
        reader.next_frame(&mut buf).unwrap();
        assert_eq!(buf, rgba);
    }
}
