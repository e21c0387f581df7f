//! Batch-relative timing.
//!
//! All entries of a run share one anchor: the earliest `startMs` or `endMs`
//! across every processed file. Files are never normalized independently.

use crate::record::{Record, fields};
use crate::{Error, Result};

/// Earliest `startMs`/`endMs` over the given entries, `None` when empty
pub fn batch_anchor<'a, I>(entries: I) -> Result<Option<i64>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut min: Option<i64> = None;
    for entry in entries {
        let start = epoch_field(entry, fields::START_MS)?;
        let end = epoch_field(entry, fields::END_MS)?;
        let earliest = start.min(end);
        min = Some(min.map_or(earliest, |current| current.min(earliest)));
    }
    Ok(min)
}

/// Set `startMs_rel`/`endMs_rel` as offsets from `anchor`
pub fn with_relative_time(mut entries: Vec<Record>, anchor: i64) -> Result<Vec<Record>> {
    for entry in entries.iter_mut() {
        let start = epoch_field(entry, fields::START_MS)?;
        let end = epoch_field(entry, fields::END_MS)?;
        entry.set(fields::START_MS_REL, offset_from(start, anchor)?);
        entry.set(fields::END_MS_REL, offset_from(end, anchor)?);
    }
    Ok(entries)
}

/// Normalize a combined entry sequence against its own earliest timestamp
pub fn normalize(entries: Vec<Record>) -> Result<Vec<Record>> {
    match batch_anchor(&entries)? {
        Some(anchor) => {
            tracing::debug!("Relative time anchor: {} ms", anchor);
            with_relative_time(entries, anchor)
        }
        None => Ok(entries),
    }
}

fn offset_from(value: i64, anchor: i64) -> Result<i64> {
    value.checked_sub(anchor).ok_or_else(|| {
        Error::InvalidStructure(format!("{} ms is out of range from anchor {} ms", value, anchor))
    })
}

fn epoch_field(entry: &Record, key: &str) -> Result<i64> {
    entry
        .get(key)
        .and_then(|value| value.as_i64())
        .ok_or_else(|| Error::InvalidStructure(format!("entry has no numeric '{}'", key)))
}
