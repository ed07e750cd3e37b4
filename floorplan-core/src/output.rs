use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{FloorplanError, Result};

fn output_error(path: &Path) -> impl Fn(std::io::Error) -> FloorplanError + '_ {
    move |source| FloorplanError::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Fully written and synced temporary file next to `path`.
fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let err = output_error(path);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(&err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(&err)?;
    tmp.write_all(bytes).map_err(&err)?;
    tmp.as_file().sync_all().map_err(&err)?;
    Ok(tmp)
}

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// renamed into place once fully written. On failure the destination is left
/// untouched and the temporary file is removed.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = stage(path, bytes)?;
    tmp.persist(path).map_err(|e| output_error(path)(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

/// Writes a set of files so that either all of them land or none of the new
/// ones stay behind. Every file is staged before the first rename; if a
/// rename fails, the files already moved into place are removed again. A file
/// that existed before and was already replaced is not restored.
pub fn write_all_or_none(files: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    let staged = files
        .iter()
        .map(|(path, bytes)| -> Result<(NamedTempFile, &PathBuf)> {
            Ok((stage(path, bytes)?, path))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut placed: Vec<&PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in &placed {
                if let Err(cleanup) = fs::remove_file(done) {
                    warn!(path = %done.display(), error = %cleanup, "could not remove partial output");
                }
            }
            return Err(output_error(path)(e.error));
        }
        placed.push(path);
    }
    debug!(files = files.len(), "wrote output set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Plans.pdf");
        fs::write(&path, b"old").unwrap();
        write_atomically(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/sub/a.svg");
        write_atomically(&path, b"<svg/>").unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn failed_set_removes_the_files_it_placed() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("etage.svg");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), b"x").unwrap();
        let files = vec![
            (dir.path().join("rez.svg"), b"<svg/>".to_vec()),
            (blocked.clone(), b"<svg/>".to_vec()),
            (dir.path().join("attic.svg"), b"<svg/>".to_vec()),
        ];
        let err = write_all_or_none(&files).unwrap_err();
        assert!(matches!(err, FloorplanError::OutputWrite { .. }));
        assert!(!dir.path().join("rez.svg").exists());
        assert!(!dir.path().join("attic.svg").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn set_lands_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            (dir.path().join("a.svg"), b"a".to_vec()),
            (dir.path().join("b.svg"), b"b".to_vec()),
        ];
        write_all_or_none(&files).unwrap();
        assert_eq!(fs::read(dir.path().join("a.svg")).unwrap(), b"a");
        assert_eq!(fs::read(dir.path().join("b.svg")).unwrap(), b"b");
    }

    #[test]
    fn failure_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        // The destination is a directory, so the final rename fails.
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();
        let err = write_atomically(&path, b"data").unwrap_err();
        assert!(matches!(err, FloorplanError::OutputWrite { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(path.join("keep").is_file());
    }
}
