use tracing::debug;

use crate::model::{GeometryRecord, Point};
use crate::surface::{PagePoint, PageRect};
use crate::units::{Metres, Points, UnitConverter};

/// Per-dataset translation, in metres, applied to every record's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Shift {
    pub dx: Metres,
    pub dy: Metres,
}

impl Shift {
    pub fn apply(self, p: Point) -> Point {
        Point {
            x: p.x + self.dx,
            y: p.y + self.dy,
        }
    }
}

/// Translation that puts the anchor's geometric center on the page center.
pub fn compute_shift(
    anchor: &GeometryRecord,
    page_width: Points,
    page_height: Points,
    converter: &UnitConverter,
) -> Shift {
    let center = anchor.center();
    let page_w = converter.to_real(page_width);
    let page_h = converter.to_real(page_height);
    Shift {
        dx: page_w / 2.0 - center.x,
        dy: page_h / 2.0 - center.y,
    }
}

/// Everything needed to place one dataset on one page.
#[derive(Clone, Copy, Debug)]
pub struct PageLayout<'a> {
    pub width: Points,
    pub height: Points,
    pub shift: Shift,
    pub converter: &'a UnitConverter,
}

impl<'a> PageLayout<'a> {
    pub fn for_anchor(
        anchor: &GeometryRecord,
        width: Points,
        height: Points,
        converter: &'a UnitConverter,
    ) -> Self {
        let shift = compute_shift(anchor, width, height, converter);
        debug!(dx = shift.dx.raw(), dy = shift.dy.raw(), "computed page shift");
        PageLayout {
            width,
            height,
            shift,
            converter,
        }
    }

    pub fn to_page_point(&self, p: Point) -> PagePoint {
        let p = self.shift.apply(p);
        PagePoint {
            x: self.converter.to_page(p.x),
            y: self.converter.to_page(p.y),
        }
    }

    /// Shifted and converted bounds of a record.
    pub fn record_rect(&self, record: &GeometryRecord) -> PageRect {
        let origin = self.to_page_point(record.origin());
        let size = record.size();
        PageRect {
            x: origin.x,
            y: origin.y,
            width: self.converter.to_page(size.width),
            height: self.converter.to_page(size.height),
        }
    }
}
