use super::reader::{log_array, require};
use super::timestamp::parse_timestamp;
use crate::record::{FieldValue, Record, fields};
use crate::{Error, Result};
use serde_json::Value;

/// Flatten `log.entries` into one record per request, in source order.
///
/// Every key of the `timings` object is copied verbatim after the request and
/// response fields, so a timing key that collides with an earlier field wins.
pub fn extract_entries(har: &Value) -> Result<Vec<Record>> {
    log_array(har, "entries")?
        .iter()
        .enumerate()
        .map(|(idx, raw)| extract_entry(idx, raw))
        .collect()
}

fn extract_entry(idx: usize, raw: &Value) -> Result<Record> {
    let context = format!("entry {}", idx);
    let mut record = Record::new();

    record.set(fields::PAGE_REF, raw.get("pageref"));
    record.set(fields::STARTED_DATE_TIME, raw.get("startedDateTime"));
    record.set(fields::TIME, raw.get("time"));

    let request = require(raw, "request", &context)?;
    record.set(fields::METHOD, request.get("method"));
    record.set(fields::URL, request.get("url"));

    let response = require(raw, "response", &context)?;
    record.set(fields::STATUS, response.get("status"));

    let timings = require(raw, "timings", &context)?
        .as_object()
        .ok_or_else(|| Error::InvalidStructure(format!("{} timings is not an object", context)))?;
    for (key, value) in timings {
        record.set(key.as_str(), value);
    }

    // Derive from the source entry; a timing key may have overwritten the copies
    let start_ms = parse_timestamp(&FieldValue::from(raw.get("startedDateTime")).to_string())?;
    let time = elapsed_ms(raw.get("time"));
    let end_ms = start_ms.checked_add(time).ok_or_else(|| {
        Error::InvalidStructure(format!("{} time {} overflows endMs", context, time))
    })?;
    record.set(fields::START_MS, start_ms);
    record.set(fields::END_MS, end_ms);

    Ok(record)
}

/// Whole milliseconds of a `time` value, truncated toward zero.
///
/// Numeric text counts as its number and booleans as 1/0; anything else
/// (absent, null, non-numeric text) is 0.
fn elapsed_ms(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(_)) => FieldValue::from(value).as_i64().unwrap_or(0),
        Some(Value::String(text)) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Some(Value::Bool(flag)) => i64::from(*flag),
        _ => 0,
    }
}
