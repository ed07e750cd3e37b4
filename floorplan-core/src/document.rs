//! Document assembly: one page per dataset, persisted once everything rendered.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, info_span, warn};

use crate::config::LayoutConfig;
use crate::error::{FloorplanError, Result};
use crate::load::load_dataset;
use crate::model::Dataset;
use crate::output::{write_all_or_none, write_atomically};
use crate::page::compose_page;
use crate::pdf::pages_to_pdf;
use crate::raster::svg_to_png;
use crate::surface::Page;
use crate::svg::page_to_svg;
use crate::units::UnitConverter;

/// A dataset source that was left out of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: String,
}

/// Ordered pages plus everything needed to serialize them.
#[derive(Debug)]
pub struct Document {
    config: LayoutConfig,
    converter: UnitConverter,
    pages: Vec<Page>,
    skipped: Vec<SkippedSource>,
}

impl Document {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let converter = UnitConverter::new(config.scale_ratio()?);
        Ok(Document {
            config,
            converter,
            pages: Vec::new(),
            skipped: Vec::new(),
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    /// Composes one page for `dataset` and appends it.
    pub fn add_dataset(&mut self, dataset: &Dataset) -> Result<&Page> {
        let page = compose_page(dataset, &self.config, &self.converter)?;
        self.pages.push(page);
        let idx = self.pages.len() - 1;
        Ok(&self.pages[idx])
    }

    pub fn skip(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.skipped.push(SkippedSource {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn skipped(&self) -> &[SkippedSource] {
        &self.skipped
    }

    pub fn to_pdf(&self) -> Vec<u8> {
        pages_to_pdf(&self.pages)
    }

    pub fn to_svg_pages(&self) -> Vec<(String, String)> {
        self.pages
            .iter()
            .map(|p| (p.name().to_string(), page_to_svg(p)))
            .collect()
    }

    pub fn write_pdf(&self, path: &Path) -> Result<()> {
        write_atomically(path, &self.to_pdf())?;
        info!(path = %path.display(), pages = self.pages.len(), "wrote PDF");
        Ok(())
    }

    /// Destination of every page in `dir`, in page order. Two pages that
    /// would share a file name are refused before anything is written.
    fn page_paths(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::with_capacity(self.pages.len());
        self.pages
            .iter()
            .map(|p| {
                let path = dir.join(format!("{}.{ext}", p.name()));
                if !seen.insert(path.clone()) {
                    return Err(FloorplanError::DuplicatePageName {
                        name: p.name().to_string(),
                        path,
                    });
                }
                Ok(path)
            })
            .collect()
    }

    /// Writes `<dataset>.svg` per page into `dir`, returning the paths in page
    /// order. The set is written all or nothing.
    pub fn write_svg_pages(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let paths = self.page_paths(dir, "svg")?;
        let files: Vec<(PathBuf, Vec<u8>)> = paths
            .iter()
            .cloned()
            .zip(self.to_svg_pages().into_iter().map(|(_, svg)| svg.into_bytes()))
            .collect();
        write_all_or_none(&files)?;
        for path in &paths {
            info!(path = %path.display(), "wrote SVG page");
        }
        Ok(paths)
    }

    /// Writes `<dataset>.png` per page into `dir`. Every page is rasterized
    /// before the first file is written, and the set lands all or nothing.
    pub fn write_png_pages(&self, dir: &Path, dpi: f32) -> Result<Vec<PathBuf>> {
        let paths = self.page_paths(dir, "png")?;
        let files = paths
            .iter()
            .cloned()
            .zip(self.to_svg_pages())
            .map(|(path, (_, svg))| -> Result<(PathBuf, Vec<u8>)> {
                Ok((path, svg_to_png(&svg, dpi)?))
            })
            .collect::<Result<Vec<_>>>()?;
        write_all_or_none(&files)?;
        for path in &paths {
            info!(path = %path.display(), dpi, "wrote PNG page");
        }
        Ok(paths)
    }
}

/// Loads and lays out every source in order.
///
/// Sources that cannot be opened or parsed are skipped with a warning. A
/// source whose records all fail validation aborts the run, as does ending up
/// with no page at all.
pub fn assemble<P: AsRef<Path>>(sources: &[P], config: &LayoutConfig) -> Result<Document> {
    let mut doc = Document::new(config.clone())?;
    for source in sources {
        let path = source.as_ref();
        let _span = info_span!("dataset", path = %path.display()).entered();
        let dataset = match load_dataset(path) {
            Ok(ds) => ds,
            Err(e @ (FloorplanError::SourceMissing { .. } | FloorplanError::SourceParse { .. })) => {
                warn!(path = %path.display(), error = %e, "skipping dataset source");
                let reason = match std::error::Error::source(&e) {
                    Some(cause) => format!("{e}: {cause}"),
                    None => e.to_string(),
                };
                doc.skip(path, reason);
                continue;
            }
            Err(e) => return Err(e),
        };
        doc.add_dataset(&dataset)?;
    }
    if doc.pages().is_empty() {
        return Err(FloorplanError::NothingToRender);
    }
    info!(
        pages = doc.pages().len(),
        skipped = doc.skipped().len(),
        "document assembled"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeometryRecord, Point, Size};
    use std::fs;

    fn room(ox: f64) -> GeometryRecord {
        GeometryRecord::new(Point::new(ox, 0.0), Size::new(2.0, 2.0), None, None).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = LayoutConfig {
            scale: -1.0,
            ..Default::default()
        };
        assert!(matches!(Document::new(cfg), Err(FloorplanError::Config(_))));
    }

    #[test]
    fn pages_follow_insertion_order() {
        let mut doc = Document::new(LayoutConfig::default()).unwrap();
        doc.add_dataset(&Dataset::new("rez", vec![room(0.0)])).unwrap();
        doc.add_dataset(&Dataset::new("etage", vec![room(3.0)])).unwrap();
        let names: Vec<&str> = doc.pages().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["rez", "etage"]);
        assert!(doc.add_dataset(&Dataset::new("void", Vec::new())).is_err());
        assert_eq!(doc.pages().len(), 2);
    }

    #[test]
    fn nothing_to_render() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.csv");
        let err = assemble(&[missing], &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, FloorplanError::NothingToRender));
    }

    #[test]
    fn writes_one_svg_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("rez.csv");
        fs::write(&src, "org x,org y,x,y,utilisation\n0,0,4,3,Kitchen\n").unwrap();
        let doc = assemble(&[&src], &LayoutConfig::default()).unwrap();
        let out = dir.path().join("svg");
        let written = doc.write_svg_pages(&out).unwrap();
        assert_eq!(written, vec![out.join("rez.svg")]);
        let svg = fs::read_to_string(&written[0]).unwrap();
        assert!(svg.contains(">Kitchen</text>"));
    }

    #[test]
    fn same_named_sources_are_refused_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let body = "org x,org y,x,y,utilisation\n0,0,4,3,Kitchen\n";
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        fs::write(a.join("rez.csv"), body).unwrap();
        fs::write(b.join("rez.csv"), body).unwrap();
        let doc = assemble(&[a.join("rez.csv"), b.join("rez.csv")], &LayoutConfig::default())
            .unwrap();
        assert_eq!(doc.pages().len(), 2);

        let out = dir.path().join("svg");
        let err = doc.write_svg_pages(&out).unwrap_err();
        match err {
            FloorplanError::DuplicatePageName { name, path } => {
                assert_eq!(name, "rez");
                assert_eq!(path, out.join("rez.svg"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out.exists());
        assert!(matches!(
            doc.write_png_pages(&out, 72.0),
            Err(FloorplanError::DuplicatePageName { .. })
        ));
        assert!(!out.exists());
    }
}
