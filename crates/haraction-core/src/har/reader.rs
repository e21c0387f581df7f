use crate::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Value> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let har: Value = serde_json::from_reader(reader)?;

        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Value> {
        tracing::debug!("Parsing HAR from string");

        let har: Value = serde_json::from_str(content)?;

        Ok(har)
    }
}

/// Look up a required member of a JSON object
pub(crate) fn require<'a>(value: &'a Value, key: &str, context: &str) -> Result<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| Error::InvalidStructure(format!("{} is missing '{}'", context, key)))
}

/// Borrow `log.<key>` as an array
pub(crate) fn log_array<'a>(har: &'a Value, key: &str) -> Result<&'a [Value]> {
    let log = require(har, "log", "HAR document")?;
    require(log, key, "log")?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::InvalidStructure(format!("log.{} is not an array", key)))
}
