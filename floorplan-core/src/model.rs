use tracing::debug;

use crate::error::RecordRejection;
use crate::units::Metres;

/// Real-world position, in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Metres,
    pub y: Metres,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x: Metres(x),
            y: Metres(y),
        }
    }
}

/// Real-world extent, in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: Metres,
    pub height: Metres,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size {
            width: Metres(width),
            height: Metres(height),
        }
    }
}

/// One input row as read from a table, before validation.
///
/// Column names are matched after trimming and lowercasing the header row:
/// `org x`, `org y`, `x`, `y`, `utilisation`, `area`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub org_x: Option<String>,
    pub org_y: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub utilisation: Option<String>,
    pub area: Option<String>,
}

impl From<&GeometryRecord> for RawRecord {
    fn from(r: &GeometryRecord) -> Self {
        // f64 Display is shortest-roundtrip, so parsing these back is exact.
        RawRecord {
            org_x: Some(r.origin.x.raw().to_string()),
            org_y: Some(r.origin.y.raw().to_string()),
            x: Some(r.size.width.raw().to_string()),
            y: Some(r.size.height.raw().to_string()),
            utilisation: r.usage_label.clone(),
            area: r.area.map(|a| a.to_string()),
        }
    }
}

fn required_number(field: &'static str, value: Option<&str>) -> Result<f64, RecordRejection> {
    let v = value.map(str::trim).filter(|s| !s.is_empty());
    let Some(v) = v else {
        return Err(RecordRejection::Missing(field));
    };
    match v.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(RecordRejection::NotNumeric {
            field,
            value: v.to_string(),
        }),
    }
}

fn optional_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// A validated room: finite origin, strictly positive size.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryRecord {
    origin: Point,
    size: Size,
    usage_label: Option<String>,
    area: Option<f64>,
}

impl GeometryRecord {
    pub fn new(
        origin: Point,
        size: Size,
        usage_label: Option<String>,
        area: Option<f64>,
    ) -> Result<Self, RecordRejection> {
        for (field, v) in [("org x", origin.x), ("org y", origin.y)] {
            if !v.is_finite() {
                return Err(RecordRejection::NotNumeric {
                    field,
                    value: v.raw().to_string(),
                });
            }
        }
        for (field, v) in [("x", size.width), ("y", size.height)] {
            if !v.is_finite() {
                return Err(RecordRejection::NotNumeric {
                    field,
                    value: v.raw().to_string(),
                });
            }
            if v.raw() <= 0.0 {
                return Err(RecordRejection::NonPositive {
                    field,
                    value: v.raw(),
                });
            }
        }
        let usage_label = usage_label
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(GeometryRecord {
            origin,
            size,
            usage_label,
            area: area.filter(|a| a.is_finite()),
        })
    }

    /// Validates one raw row. Area is taken verbatim from the `area` column; a
    /// non-numeric area is dropped rather than rejecting the row.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, RecordRejection> {
        let ox = required_number("org x", raw.org_x.as_deref())?;
        let oy = required_number("org y", raw.org_y.as_deref())?;
        let w = required_number("x", raw.x.as_deref())?;
        let h = required_number("y", raw.y.as_deref())?;
        GeometryRecord::new(
            Point::new(ox, oy),
            Size::new(w, h),
            raw.utilisation.clone(),
            optional_number(raw.area.as_deref()),
        )
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn usage_label(&self) -> Option<&str> {
        self.usage_label.as_deref()
    }

    pub fn area(&self) -> Option<f64> {
        self.area
    }

    /// Geometric center in real-world coordinates.
    pub fn center(&self) -> Point {
        Point {
            x: self.origin.x + self.size.width / 2.0,
            y: self.origin.y + self.size.height / 2.0,
        }
    }
}

/// Named, ordered collection of valid records. One dataset becomes one page.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    name: String,
    records: Vec<GeometryRecord>,
    rejected: usize,
}

impl Dataset {
    pub fn new(name: impl Into<String>, records: Vec<GeometryRecord>) -> Self {
        Dataset {
            name: name.into(),
            records,
            rejected: 0,
        }
    }

    /// Keeps the rows that validate, in source order.
    pub fn from_raw_rows<I>(name: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let name = name.into();
        let mut records = Vec::new();
        let mut rejected = 0;
        for (i, raw) in rows.into_iter().enumerate() {
            match GeometryRecord::from_raw(&raw) {
                Ok(r) => records.push(r),
                Err(reason) => {
                    rejected += 1;
                    debug!(dataset = %name, row = i + 1, %reason, "record skipped");
                }
            }
        }
        Dataset {
            name,
            records,
            rejected,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    /// Number of rows dropped during validation.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record centered on the page: the first valid record in source order.
    pub fn anchor(&self) -> Option<&GeometryRecord> {
        self.records.first()
    }
}
