//! Multi-page PDF output.
//!
//! Page space is already PDF user space, so the display list is replayed
//! as-is. Text uses the non-embedded Helvetica pair under WinAnsiEncoding.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::metrics::{text_width, to_winansi};
use crate::surface::{DrawOp, FontFace, Page};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

fn font_name(face: FontFace) -> Name<'static> {
    match face {
        FontFace::Regular => REGULAR,
        FontFace::Bold => BOLD,
    }
}

fn page_content(page: &Page) -> Vec<u8> {
    let mut content = Content::new();
    content.set_stroke_gray(0.0);
    content.set_fill_gray(0.0);
    for op in page.ops() {
        match op {
            DrawOp::StrokeRect { rect, line_width } => {
                content
                    .set_line_width(*line_width as f32)
                    .rect(
                        rect.x.raw() as f32,
                        rect.y.raw() as f32,
                        rect.width.raw() as f32,
                        rect.height.raw() as f32,
                    )
                    .stroke();
            }
            DrawOp::CenteredText { at, text, style } => {
                let half = text_width(text, style.face, style.size) / 2.0;
                let bytes = to_winansi(text);
                content
                    .begin_text()
                    .set_font(font_name(style.face), style.size as f32)
                    .next_line((at.x - half).raw() as f32, at.y.raw() as f32)
                    .show(Str(&bytes))
                    .end_text();
            }
            DrawOp::PushClip(rect) => {
                content
                    .save_state()
                    .rect(
                        rect.x.raw() as f32,
                        rect.y.raw() as f32,
                        rect.width.raw() as f32,
                        rect.height.raw() as f32,
                    )
                    .clip_nonzero()
                    .end_path();
            }
            DrawOp::PopClip => {
                content.restore_state();
            }
        }
    }
    content.finish()
}

/// Writes every page, in order, into one PDF file image.
pub fn pages_to_pdf(pages: &[Page]) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (i, page) in pages.iter().enumerate() {
        {
            let mut p = pdf.page(page_ids[i]);
            p.media_box(Rect::new(
                0.0,
                0.0,
                page.width().raw() as f32,
                page.height().raw() as f32,
            ))
            .parent(pages_id)
            .contents(content_ids[i]);
            p.resources()
                .fonts()
                .pair(REGULAR, regular_id)
                .pair(BOLD, bold_id);
        }
        pdf.stream(content_ids[i], &page_content(page));
    }

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PagePoint, PageRect, PageSurface, TextStyle};
    use crate::units::Points;

    fn find(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn sample(name: &str) -> Page {
        let mut s = PageSurface::new(Points::from_mm(210.0), Points::from_mm(297.0));
        s.stroke_rect(
            PageRect {
                x: Points(10.0),
                y: Points(20.0),
                width: Points(30.0),
                height: Points(40.0),
            },
            1.0,
        );
        s.centered_text(
            PagePoint {
                x: Points(100.0),
                y: Points(100.0),
            },
            "12.0 m²",
            TextStyle::regular(8.0),
        );
        s.finish(name)
    }

    #[test]
    fn one_page_per_display_list() {
        let bytes = pages_to_pdf(&[sample("rez"), sample("etage")]);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(find(&bytes, b"/Count 2"));
        assert!(find(&bytes, b"/Helvetica-Bold"));
        assert!(find(&bytes, b"/WinAnsiEncoding"));
        assert!(find(&bytes, b"/MediaBox"));
    }

    #[test]
    fn content_replays_ops() {
        let content = page_content(&sample("rez"));
        assert!(find(&content, b"10 20 30 40 re"));
        assert!(find(&content, b"/F1 8 Tf"));
        assert!(find(&content, b"Tj"));
        let re = content.windows(2).position(|w| w == b"re").unwrap();
        let tj = content.windows(2).position(|w| w == b"Tj").unwrap();
        assert!(re < tj);
    }

    #[test]
    fn clip_is_scoped_by_graphics_state() {
        let mut s = PageSurface::new(Points(100.0), Points(100.0));
        s.push_clip(PageRect {
            x: Points(5.0),
            y: Points(5.0),
            width: Points(90.0),
            height: Points(90.0),
        });
        let content = page_content(&s.finish("p"));
        assert!(find(&content, b"5 5 90 90 re"));
        let saves = content.iter().filter(|&&b| b == b'q').count();
        let restores = content.iter().filter(|&&b| b == b'Q').count();
        assert_eq!((saves, restores), (1, 1));
    }

    #[test]
    fn empty_document_is_still_a_pdf() {
        let bytes = pages_to_pdf(&[]);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(find(&bytes, b"/Count 0"));
    }
}
