use super::{HarReader, Page, enrich_entries, extract_entries, extract_pages};
use crate::Result;
use crate::record::Record;
use serde_json::Value;
use std::path::Path;

/// The extracted and enriched contents of one HAR file
#[derive(Debug, Clone)]
pub struct CaptureFile {
    pub name: String,
    pub pages: Vec<Page>,
    pub entries: Vec<Record>,
}

impl CaptureFile {
    /// Read a HAR file and extract its pages and enriched entries
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Processing {}", path.display());

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let har = HarReader::from_file(path)?;
        let capture = Self::from_har(name, &har)?;

        tracing::info!(
            "Processing {} done, {} entries",
            path.display(),
            capture.entries.len()
        );

        Ok(capture)
    }

    /// Extract a capture from an already parsed HAR document
    pub fn from_har(name: impl Into<String>, har: &Value) -> Result<Self> {
        let name = name.into();
        let pages = extract_pages(har)?;
        let mut entries = extract_entries(har)?;
        enrich_entries(&pages, &mut entries, &name);

        Ok(Self {
            name,
            pages,
            entries,
        })
    }
}
