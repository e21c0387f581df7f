use crate::record::{FieldValue, Record};
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const DELIMITER: u8 = b'\t';

/// Union of field names across `records`, in first-seen order
pub fn collect_headers<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.iter().any(|header| header == key) {
                headers.push(key.to_string());
            }
        }
    }
    headers
}

/// Tab-separated writer with a fixed column order
pub struct TableWriter<W: Write> {
    sink: Sink<W>,
    headers: Vec<String>,
    rows: usize,
}

// csv writes `""` for a record without fields; a column-less table is bare newlines
enum Sink<W: Write> {
    Table(csv::Writer<W>),
    Bare(W),
}

impl TableWriter<File> {
    /// Create (or truncate) `path` and write the header row
    pub fn create(path: &Path, headers: Vec<String>) -> Result<Self> {
        tracing::debug!("Writing table to: {}", path.display());
        let file = File::create(path)?;
        Self::new(file, headers)
    }
}

impl<W: Write> TableWriter<W> {
    pub fn new(mut inner: W, headers: Vec<String>) -> Result<Self> {
        let sink = if headers.is_empty() {
            inner.write_all(b"\n")?;
            Sink::Bare(inner)
        } else {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(DELIMITER)
                .from_writer(inner);
            writer.write_record(&headers)?;
            Sink::Table(writer)
        };
        Ok(Self {
            sink,
            headers,
            rows: 0,
        })
    }

    /// Write one row; fields missing from `record` become empty cells
    pub fn write(&mut self, record: &Record) -> Result<()> {
        let row: Vec<String> = self
            .headers
            .iter()
            .map(|header| record.get(header).map(FieldValue::to_string).unwrap_or_default())
            .collect();
        match &mut self.sink {
            Sink::Table(writer) => writer.write_record(&row)?,
            Sink::Bare(inner) => inner.write_all(b"\n")?,
        }
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        match self.sink {
            Sink::Table(writer) => writer.into_inner().map_err(|e| Error::Io(e.into_error())),
            Sink::Bare(mut inner) => {
                inner.flush()?;
                Ok(inner)
            }
        }
    }
}

/// Write `records` as a header row plus one row each
pub fn write_table<W: Write>(inner: W, records: &[Record]) -> Result<W> {
    let mut table = TableWriter::new(inner, collect_headers(records))?;
    for record in records {
        table.write(record)?;
    }
    table.into_inner()
}

/// Export `records` to `path`, returning the number of rows written
pub fn export_table(path: &Path, records: &[Record]) -> Result<usize> {
    let mut table = TableWriter::create(path, collect_headers(records))?;
    for record in records {
        table.write(record)?;
    }
    let rows = table.rows();
    table.into_inner()?.sync_all()?;

    tracing::info!("Export done, {} rows to {}", rows, path.display());
    Ok(rows)
}
