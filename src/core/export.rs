//! CSV export of filtered records
//!
//! Exports operate on the filtered and sorted sequence, never on a single
//! page. The serialized bytes are handed to an [`ExportSink`] as a
//! downloadable [`ExportArtifact`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// MIME type of CSV artifacts
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// A record that can be written as one CSV row
pub trait Exportable {
    /// Header row, in column order
    fn export_headers() -> Vec<&'static str>;

    /// One value per header, already formatted for display
    fn export_row(&self) -> Vec<String>;
}

/// Quote a field when it contains a delimiter, quote, CR or LF; inner quotes are doubled
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_line(out: &mut String, fields: impl IntoIterator<Item = impl AsRef<str>>) {
    let line = fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Header row plus one row per record, `\n`-terminated
pub fn to_csv<R: Exportable>(records: &[R]) -> String {
    let mut out = String::new();
    write_line(&mut out, R::export_headers());
    for record in records {
        write_line(&mut out, record.export_row());
    }
    out
}

/// A finished file ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Serialize `records` as a CSV artifact
    pub fn csv<R: Exportable>(file_name: impl Into<String>, records: &[R]) -> Self {
        Self::new(file_name, CSV_CONTENT_TYPE, to_csv(records).into_bytes())
    }

    /// The bytes as text, when they are valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Receives export artifacts
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn deliver(&self, artifact: ExportArtifact) -> Result<()>;
}

/// Writes artifacts into a directory, one file per artifact
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn deliver(&self, artifact: ExportArtifact) -> Result<()> {
        // File names come from configuration, never from record data
        let name = Path::new(&artifact.file_name)
            .file_name()
            .with_context(|| format!("invalid export file name '{}'", artifact.file_name))?;
        let path = self.dir.join(name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            "export written"
        );
        Ok(())
    }
}

/// Keeps delivered artifacts in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryExportSink {
    delivered: Arc<Mutex<Vec<ExportArtifact>>>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<ExportArtifact> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExportSink for MemoryExportSink {
    async fn deliver(&self, artifact: ExportArtifact) -> Result<()> {
        self.delivered
            .lock()
            .map_err(|_| anyhow::anyhow!("export buffer poisoned"))?
            .push(artifact);
        Ok(())
    }
}
