use crate::surface::{DrawOp, FontFace, Page, PageRect};
use crate::units::{Points, fmt_number};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serializes a page to a standalone SVG document.
///
/// The viewBox is in points so coordinates carry over unchanged except for the
/// y axis, which SVG points down.
pub fn page_to_svg(page: &Page) -> String {
    let (w, h) = (page.width().raw(), page.height().raw());
    let flip = |y: Points, extent: Points| h - y.raw() - extent.raw();
    let rect_attrs = |r: &PageRect| {
        format!(
            "x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"",
            r.x.raw(),
            flip(r.y, r.height),
            r.width.raw(),
            r.height.raw()
        )
    };

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}mm\" height=\"{}mm\" viewBox=\"0 0 {:.2} {:.2}\" stroke=\"#000\" fill=\"none\" font-family=\"{}\">\n",
        fmt_number(page.width().to_mm()),
        fmt_number(page.height().to_mm()),
        w,
        h,
        FONT_FAMILY
    ));
    s.push_str(&format!("<title>{}</title>\n", svg_escape(page.name())));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\" stroke=\"none\"/>\n");

    let mut clip_id = 0;
    for op in page.ops() {
        match op {
            DrawOp::StrokeRect { rect, line_width } => {
                s.push_str(&format!(
                    "<rect {} stroke-width=\"{}\"/>\n",
                    rect_attrs(rect),
                    fmt_number(*line_width)
                ));
            }
            DrawOp::CenteredText { at, text, style } => {
                let weight = match style.face {
                    FontFace::Regular => "",
                    FontFace::Bold => " font-weight=\"bold\"",
                };
                s.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" fill=\"#000\" stroke=\"none\" font-size=\"{}\"{}>{}</text>\n",
                    at.x.raw(),
                    h - at.y.raw(),
                    fmt_number(style.size),
                    weight,
                    svg_escape(text)
                ));
            }
            DrawOp::PushClip(rect) => {
                clip_id += 1;
                s.push_str(&format!(
                    "<clipPath id=\"clip{}\"><rect {}/></clipPath>\n<g clip-path=\"url(#clip{})\">\n",
                    clip_id,
                    rect_attrs(rect),
                    clip_id
                ));
            }
            DrawOp::PopClip => s.push_str("</g>\n"),
        }
    }
    s.push_str("</svg>\n");
    s
}
