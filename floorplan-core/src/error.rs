use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FloorplanError {
    #[error("dataset '{dataset}' has no valid records, nothing to center on the page")]
    DatasetEmpty { dataset: String },
    #[error("dataset source '{}' could not be opened", path.display())]
    SourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset source '{}' could not be parsed", path.display())]
    SourceParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("no dataset could be rendered")]
    NothingToRender,
    #[error("invalid layout configuration: {0}")]
    Config(String),
    #[error("failed to read configuration '{}'", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration '{}'", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write '{}'", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("two pages would both be written to '{}'; rename one of the '{name}' sources", path.display())]
    DuplicatePageName { name: String, path: PathBuf },
    #[error("failed to parse generated SVG")]
    SvgParse(#[from] usvg::Error),
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, FloorplanError>;

/// Why a single input row was left out of its dataset. Never fatal.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RecordRejection {
    #[error("missing required field '{0}'")]
    Missing(&'static str),
    #[error("field '{field}' is not a finite number: '{value}'")]
    NotNumeric { field: &'static str, value: String },
    #[error("field '{field}' must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}
