use crate::{Error, Result};
use chrono::{Local, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parse a HAR timestamp of the exact form `YYYY-MM-DDTHH:MM:SS.mmmZ` into
/// epoch milliseconds.
///
/// The wall-clock value is read in the local system timezone; the trailing `Z`
/// is treated as a literal, not as a UTC designator.
pub fn parse_timestamp(value: &str) -> Result<i64> {
    let naive = parse_naive(value).ok_or_else(|| Error::Timestamp {
        value: value.to_string(),
    })?;
    Ok(local_epoch_millis(&naive))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    if !has_millisecond_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

// `d` is any ASCII digit, every other byte is a literal
const SHAPE: &[u8; 24] = b"dddd-dd-ddTdd:dd:dd.dddZ";

/// Byte-exact `YYYY-MM-DDTHH:MM:SS.mmmZ`; chrono alone accepts padding, signs
/// and leap seconds
fn has_millisecond_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE).all(|(byte, expected)| match expected {
            b'd' => byte.is_ascii_digit(),
            literal => byte == literal,
        })
        && &bytes[17..19] != b"60"
}

fn local_epoch_millis(naive: &NaiveDateTime) -> i64 {
    match Local.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            // Inside a DST gap: use the offset in effect before the transition
            let before = *naive - TimeDelta::days(1);
            let offset = Local.offset_from_utc_datetime(&before).fix();
            naive.and_utc().timestamp_millis() - i64::from(offset.local_minus_utc()) * 1000
        }
    }
}
