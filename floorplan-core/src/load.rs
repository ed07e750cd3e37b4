//! Reading datasets from CSV files.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{FloorplanError, Result};
use crate::model::{Dataset, RawRecord};

fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Positions of the known columns in the header row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Columns {
    org_x: Option<usize>,
    org_y: Option<usize>,
    x: Option<usize>,
    y: Option<usize>,
    utilisation: Option<usize>,
    area: Option<usize>,
}

impl Columns {
    fn resolve(headers: &ByteRecord) -> Self {
        let names: Vec<String> = headers
            .iter()
            .map(|h| normalize_header(&String::from_utf8_lossy(h)))
            .collect();
        let find = |name: &str| names.iter().position(|h| h == name);
        Columns {
            org_x: find("org x"),
            org_y: find("org y"),
            x: find("x"),
            y: find("y"),
            utilisation: find("utilisation"),
            area: find("area"),
        }
    }

    /// Short rows leave the trailing fields empty. Cells that are not UTF-8
    /// are decoded lossily.
    fn row(&self, record: &ByteRecord) -> RawRecord {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|b| !b.is_empty())
                .map(|b| String::from_utf8_lossy(b).into_owned())
        };
        RawRecord {
            org_x: cell(self.org_x),
            org_y: cell(self.org_y),
            x: cell(self.x),
            y: cell(self.y),
            utilisation: cell(self.utilisation),
            area: cell(self.area),
        }
    }
}

/// Parses every row of a CSV stream. Unknown columns are ignored and missing
/// cells come back as `None`; validation happens later, per row.
pub fn read_records<R: Read>(reader: R) -> std::result::Result<Vec<RawRecord>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let columns = Columns::resolve(rdr.byte_headers()?);
    rdr.byte_records()
        .map(|r| r.map(|record| columns.row(&record)))
        .collect()
}

/// Page title for a source: its file name without extension.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| FloorplanError::SourceMissing {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_records(file).map_err(|source| FloorplanError::SourceParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = rows.len(), "read dataset source");
    Ok(Dataset::from_raw_rows(dataset_name(path), rows))
}

/// All `*.csv` files directly inside `dir`, sorted by path.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| FloorplanError::SourceMissing {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "discovered dataset sources");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn headers_are_normalized() {
        let csv = "\u{feff} Org X ,ORG Y,x, Y ,Utilisation,Area\n0,0,4,3,Kitchen,12\n";
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].org_x.as_deref(), Some("0"));
        assert_eq!(rows[0].y.as_deref(), Some("3"));
        assert_eq!(rows[0].utilisation.as_deref(), Some("Kitchen"));
        assert_eq!(rows[0].area.as_deref(), Some("12"));
    }

    #[test]
    fn short_rows_and_extra_columns() {
        let csv = "org x,org y,x,y,utilisation,area,comment\n\
                   1,2,3,4,Bath,6,nice\n\
                   5,6,7\n";
        let rows = read_records(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].x.as_deref(), Some("7"));
        assert_eq!(rows[1].y, None);
        let ds = Dataset::from_raw_rows("t", rows);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rejected(), 1);
    }

    #[test]
    fn lone_short_row_is_rejected_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rez.csv");
        fs::write(&path, "org x,org y,x,y,utilisation\n0,0,4\n").unwrap();
        let ds = load_dataset(&path).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.rejected(), 1);
    }

    #[test]
    fn latin1_cells_are_decoded_lossily() {
        let mut csv = b"org x,org y,x,y,utilisation\n0,0,4,3,Kitchen\n4,0,2,3,Pi".to_vec();
        csv.extend_from_slice(&[0xe8]);
        csv.extend_from_slice(b"ce\n");
        let rows = read_records(csv.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].utilisation.as_deref(), Some("Pi\u{fffd}ce"));
        let ds = Dataset::from_raw_rows("rez", rows);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn loads_named_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rez.csv");
        fs::write(&path, "org x,org y,x,y\n0.5,1,4,3\n").unwrap();
        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.name(), "rez");
        assert_eq!(ds.anchor().unwrap().origin(), Point::new(0.5, 1.0));
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, FloorplanError::SourceMissing { .. }));
    }

    #[test]
    fn discovery_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["rez.csv", "etage.CSV", "notes.txt", "attic.csv"] {
            fs::write(dir.path().join(name), "org x,org y,x,y\n").unwrap();
        }
        fs::create_dir(dir.path().join("old.csv")).unwrap();
        let names: Vec<String> = discover_csv_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| dataset_name(p))
            .collect();
        assert_eq!(names, ["attic", "etage", "rez"]);
    }
}
