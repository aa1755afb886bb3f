//! Proceedings folder persistence: one JSON array of records per year.
//!
//! Files are named `<year>.json`. Writes overwrite the whole file; there is no
//! merge or incremental update.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::record::PaperRecord;

/// Default folder holding per-year proceedings files.
pub const DEFAULT_PROCEEDINGS_DIR: &str = "proceedings";

const JSON_INDENT: &[u8] = b"    ";

/// Errors produced by proceedings file I/O.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing, or listing failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// File or folder involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A file did not contain a JSON array of paper records.
    #[error("invalid proceedings JSON in {path}: {source}")]
    Json {
        /// File that failed to parse or serialize.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The proceedings folder does not exist.
    #[error("proceedings folder not found: {path}")]
    MissingDirectory {
        /// Folder that was expected.
        path: PathBuf,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A year file found in the proceedings folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    /// Year parsed from the file stem.
    pub year: i32,
    /// Full path to the file.
    pub path: PathBuf,
}

/// Handle on a proceedings folder.
#[derive(Debug, Clone)]
pub struct ProceedingsStore {
    dir: PathBuf,
}

impl ProceedingsStore {
    /// Creates a store rooted at `dir`. The folder is created lazily on save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root folder of this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `year`.
    #[must_use]
    pub fn year_path(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{year}.json"))
    }

    /// Loads the records for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file is missing, unreadable, or malformed.
    pub fn load(&self, year: i32) -> Result<Vec<PaperRecord>, StoreError> {
        self.load_path(&self.year_path(year))
    }

    /// Loads records from an arbitrary proceedings file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file is unreadable or malformed.
    pub fn load_path(&self, path: &Path) -> Result<Vec<PaperRecord>, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::json(path, e))
    }

    /// Writes `records` as the file for `year`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the folder or file cannot be written.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn save(&self, year: i32, records: &[PaperRecord]) -> Result<PathBuf, StoreError> {
        let path = self.year_path(year);
        self.save_path(&path, records)?;
        Ok(path)
    }

    /// Writes `records` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the folder or file cannot be written.
    pub fn save_path(&self, path: &Path, records: &[PaperRecord]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        write_pretty_json(path, records)?;
        debug!(path = %path.display(), count = records.len(), "Saved proceedings file");
        Ok(())
    }

    /// Lists `<year>.json` files in the folder, sorted by year.
    ///
    /// Files whose stem is not a year are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingDirectory`] when the folder does not exist,
    /// or [`StoreError::Io`] when it cannot be listed.
    pub fn list_year_files(&self) -> Result<Vec<YearFile>, StoreError> {
        if !self.dir.is_dir() {
            return Err(StoreError::MissingDirectory {
                path: self.dir.clone(),
            });
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(year) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<i32>().ok())
            else {
                debug!(path = %path.display(), "Skipping non-year JSON file");
                continue;
            };
            files.push(YearFile { year, path });
        }
        files.sort_by_key(|file| file.year);
        Ok(files)
    }
}

/// Writes any serializable value as 4-space indented JSON.
///
/// # Errors
///
/// Returns [`StoreError`] on IO or serialization failure.
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let file = fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(JSON_INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|e| StoreError::json(path, e))?;
    writer.flush().map_err(|e| StoreError::io(path, e))
}
