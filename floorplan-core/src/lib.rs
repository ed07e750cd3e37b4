//! Floor plans to scale.
//!
//! Room records (origin and size in metres) are read from CSV files, one file
//! per storey, and drawn at a fixed architectural scale, one page per file.
//! The first valid room of each file is centered on its page; a title block,
//! a caption and per-room labels are added around it.

pub mod config;
pub mod document;
pub mod error;
pub mod load;
pub mod metrics;
pub mod model;
pub mod output;
pub mod page;
pub mod pdf;
pub mod raster;
pub mod render;
pub mod surface;
pub mod svg;
pub mod transform;
pub mod units;

pub use config::{LayoutConfig, Orientation, PaperSize, PhysicalSize};
pub use document::{Document, SkippedSource, assemble};
pub use error::{FloorplanError, RecordRejection, Result};
pub use load::{discover_csv_files, load_dataset};
pub use model::{Dataset, GeometryRecord, Point, RawRecord, Size};
pub use page::compose_page;
pub use render::{ShapeStyle, render_shape};
pub use surface::{DrawOp, Page, PageSurface};
pub use transform::{PageLayout, Shift, compute_shift};
pub use units::{Metres, Points, ScaleRatio, UnitConverter};

/// Output file name used when rendering a whole data directory.
pub const DEFAULT_OUTPUT_NAME: &str = "Plans.pdf";
