// src/sink.rs

use anyhow::Context;
use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::report::{ReportTable, ReportType};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("{}: header {found:?} does not match {expected:?}", path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Appends report tables to `<root>/<ReportType>_report.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    root: PathBuf,
}

impl CsvSink {
    /// Creates `root` if it does not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating output directory {:?}", &root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, report: ReportType) -> PathBuf {
        self.root.join(report.file_name())
    }

    /// Append `table` to the report's file, writing the header only when the
    /// file is new (or empty). Returns the number of data rows written.
    pub fn append(&self, report: ReportType, table: &ReportTable) -> Result<usize, SinkError> {
        if table.is_empty() {
            return Ok(0);
        }

        // 1) Inspect what is already on disk
        let path = self.path_for(report);
        let existing = read_header(&path)?;
        if let Some(found) = &existing {
            if *found != table.columns {
                return Err(SinkError::HeaderMismatch {
                    path,
                    expected: table.columns.clone(),
                    found: found.clone(),
                });
            }
        }

        // 2) Open for append; the handle only lives for this call
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        // 3) Header on first creation, then rows in order
        if existing.is_none() {
            writer.write_record(&table.columns)?;
        }
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), rows = table.len(), new_file = existing.is_none(), "appended");
        Ok(table.len())
    }
}

/// First record of `path`, or `None` when the file is absent or empty.
fn read_header(path: &Path) -> Result<Option<Vec<String>>, SinkError> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => return Ok(None),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SinkError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(Some(record.iter().map(str::to_string).collect()))
    } else {
        Ok(None)
    }
}
